//! End-to-end tests for the `bt` binary.
//!
//! Tests the full flow: register → clock → leave → approve → export,
//! each step a separate process sharing one database file.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn bt_binary() -> String {
    env!("CARGO_BIN_EXE_bt").to_string()
}

struct Env {
    temp: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn db_path(&self) -> PathBuf {
        self.temp.path().join("data").join("bt.db")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(bt_binary())
            .env("HOME", self.temp.path())
            .env("XDG_CONFIG_HOME", self.temp.path().join("config"))
            .env("BT_DATABASE_PATH", self.db_path())
            .env("BT_EXPORT_DIR", self.temp.path().join("exports"))
            .env("BT_WATCH_INTERVAL_MS", "10")
            .env_remove("BT_ACTOR")
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("failed to run bt")
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "bt {args:?} should succeed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    fn fails(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "bt {args:?} should fail: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8(output.stderr).unwrap()
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        serde_json::from_str(&self.ok(args)).unwrap()
    }

    fn register_staff(&self) {
        self.ok(&[
            "personnel",
            "add",
            "--name",
            "Patron",
            "--email",
            "patron@example.com",
            "--role",
            "admin",
        ]);
        self.ok(&[
            "personnel",
            "add",
            "--name",
            "Ahmet Kaya",
            "--email",
            "ahmet@example.com",
        ]);
    }
}

fn presence_of(roster: &serde_json::Value, email: &str) -> String {
    roster
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["email"] == email)
        .map(|entry| entry["presence"].as_str().unwrap().to_string())
        .unwrap()
}

#[test]
fn test_clock_in_and_out_drive_presence() {
    let env = Env::new();
    env.register_staff();

    let roster = env.json(&["personnel", "list", "--json"]);
    assert_eq!(presence_of(&roster, "ahmet@example.com"), "absent");

    let output = env.ok(&["--as", "ahmet@example.com", "clock", "in"]);
    assert!(output.starts_with("Ahmet Kaya clocked in."), "{output}");
    let roster = env.json(&["personnel", "list", "--json"]);
    assert_eq!(presence_of(&roster, "ahmet@example.com"), "present");
    assert_eq!(presence_of(&roster, "patron@example.com"), "absent");

    env.ok(&["--as", "ahmet@example.com", "clock", "out"]);
    let roster = env.json(&["personnel", "list", "--json"]);
    assert_eq!(presence_of(&roster, "ahmet@example.com"), "absent");
    let ahmet = roster
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["email"] == "ahmet@example.com")
        .unwrap();
    assert_eq!(ahmet["last_event_type"], "EXIT");
}

#[test]
fn test_clock_requires_known_actor() {
    let env = Env::new();
    env.register_staff();

    let stderr = env.fails(&["clock", "in"]);
    assert!(stderr.contains("logged-in user"), "{stderr}");

    let stderr = env.fails(&["--as", "stranger@example.com", "clock", "in"]);
    assert!(stderr.contains("logged-in user"), "{stderr}");

    let activities = env.json(&["activity", "--json"]);
    assert_eq!(activities.as_array().unwrap().len(), 0);
}

#[test]
fn test_leave_request_lifecycle() {
    let env = Env::new();
    env.register_staff();
    let request = [
        "leave",
        "request",
        "--start",
        "2024-08-05",
        "--end",
        "2024-08-09",
        "--reason",
        "Family visit in Izmir",
    ];

    let stderr = env.fails(&request);
    assert!(stderr.contains("logged-in user"), "{stderr}");
    assert_eq!(
        env.json(&["leave", "list", "--json"]).as_array().unwrap().len(),
        0
    );

    let mut as_ahmet = vec!["--as", "ahmet@example.com"];
    as_ahmet.extend(request);
    env.ok(&as_ahmet);

    let requests = env.json(&["leave", "list", "--json"]);
    let id = requests[0]["id"].as_str().unwrap().to_string();
    assert_eq!(requests[0]["status"], "pending");
    assert_eq!(requests[0]["actor_email"], "ahmet@example.com");

    let stderr = env.fails(&["--as", "ahmet@example.com", "leave", "approve", &id]);
    assert!(stderr.contains("not allowed"), "{stderr}");

    let output = env.ok(&["--as", "patron@example.com", "leave", "approve", &id]);
    assert!(output.contains("is now approved"), "{output}");

    let stderr = env.fails(&["--as", "patron@example.com", "leave", "reject", &id]);
    assert!(stderr.contains("already approved"), "{stderr}");

    let requests = env.json(&["leave", "list", "--json"]);
    assert_eq!(requests[0]["status"], "approved");
}

#[test]
fn test_export_writes_csv_to_export_dir() {
    let env = Env::new();
    env.register_staff();
    env.ok(&["--as", "ahmet@example.com", "clock", "in"]);
    env.ok(&[
        "--as",
        "ahmet@example.com",
        "task",
        "--description",
        "He said \"hi\"",
        "--status",
        "in_progress",
    ]);

    let output = env.ok(&["export"]);
    assert!(output.starts_with("Exported 2 activities to "), "{output}");

    let exports: Vec<PathBuf> = std::fs::read_dir(env.temp.path().join("exports"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(exports.len(), 1);
    let name = file_name(&exports[0]);
    assert!(name.starts_with("activities_") && name.ends_with(".csv"), "{name}");

    let csv = std::fs::read_to_string(&exports[0]).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Timestamp,Employee Name,Employee Email,Description,Event Type,Status,Duration"
    );
    assert!(
        lines[1].ends_with(r#","He said ""hi""","TASK","in_progress","""#),
        "{csv}"
    );
    assert!(lines[2].ends_with(r#","ENTRY","","""#), "{csv}");
}

#[test]
fn test_members_add_and_search() {
    let env = Env::new();
    env.ok(&[
        "members",
        "add",
        "--code",
        "MEM001",
        "--name",
        "Ali Veli",
        "--email",
        "ali.veli@example.com",
    ]);
    let stderr = env.fails(&[
        "members",
        "add",
        "--code",
        "MEM001",
        "--name",
        "Ali Tekrar",
        "--email",
        "ali.tekrar@example.com",
    ]);
    assert!(stderr.contains("member code already in use"), "{stderr}");

    let members = env.json(&["members", "list", "--search", "veli", "--json"]);
    assert_eq!(members.as_array().unwrap().len(), 1);
    assert_eq!(members[0]["status"], "active");
}

#[test]
fn test_watch_with_iterations_terminates() {
    let env = Env::new();
    env.register_staff();
    let output = env.ok(&["watch", "--iterations", "1"]);
    assert!(output.starts_with("NAME"), "{output}");
    assert!(output.contains("Ahmet Kaya"), "{output}");
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}
