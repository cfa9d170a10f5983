//! Filtering and ordering of the activity log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::activity::{ActivityEvent, newest_first};
use crate::types::{Email, ValidationError};

/// Whose activities to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActorFilter {
    #[default]
    All,
    Email(Email),
}

impl ActorFilter {
    fn matches(&self, event: &ActivityEvent) -> bool {
        match self {
            Self::All => true,
            Self::Email(email) => event.actor_email == *email,
        }
    }
}

impl FromStr for ActorFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Email::new(s).map(Self::Email)
        }
    }
}

impl fmt::Display for ActorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Email(email) => write!(f, "{email}"),
        }
    }
}

/// Criteria for [`filter_activities`].
///
/// Dates are calendar days in the caller's time zone. `to` only applies when
/// `from` is set; the upper bound is widened by one day so the whole `to` day
/// is included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    /// Case-insensitive substring matched against description and actor name.
    pub search: String,
    pub actor: ActorFilter,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Resolved instant bounds of a date filter, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

impl ActivityFilter {
    fn bounds<Tz: TimeZone>(&self, tz: &Tz) -> Option<Bounds> {
        let from = self.from?;
        let end = self
            .to
            .and_then(|to| to.checked_add_days(Days::new(1)))
            .map(|day_after| start_of_day(day_after, tz));
        Some(Bounds {
            start: start_of_day(from, tz),
            end,
        })
    }
}

/// Converts a local calendar date at midnight to UTC.
/// Ambiguous midnights pick the earlier instant.
fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // DST spring-forward gap at midnight; 1am exists in every zone that has one.
            let one_am = date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap_or(NaiveTime::MIN));
            tz.from_local_datetime(&one_am)
                .earliest()
                .map_or_else(|| midnight.and_utc(), |dt| dt.with_timezone(&Utc))
        }
    }
}

/// Applies `filter` to the log and returns the matches, most recent first.
///
/// Ordering is total (timestamp, then insertion sequence), so filtering an
/// already-filtered result with the same criteria returns it unchanged.
pub fn filter_activities<Tz: TimeZone>(
    events: &[ActivityEvent],
    filter: &ActivityFilter,
    tz: &Tz,
) -> Vec<ActivityEvent> {
    let term = filter.search.to_lowercase();
    let bounds = filter.bounds(tz);

    let mut matched: Vec<ActivityEvent> = events
        .iter()
        .filter(|event| {
            let matches_search = event.description.to_lowercase().contains(&term)
                || event.actor_name.to_lowercase().contains(&term);
            let matches_date = bounds.is_none_or(|bounds| {
                event.timestamp >= bounds.start
                    && bounds.end.is_none_or(|end| event.timestamp <= end)
            });
            matches_search && filter.actor.matches(event) && matches_date
        })
        .cloned()
        .collect();

    matched.sort_by(newest_first);
    tracing::debug!(
        total = events.len(),
        matched = matched.len(),
        "filtered activities"
    );
    matched
}
