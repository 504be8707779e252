//! Black-box tests for the `classplan` binary.

use predicates::prelude::*;

mod helpers;
use helpers::{assertions, CliTestHarness, TestFixtures};

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("timetable"));
    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("classplan"));
    harness
        .run_failure(&["invalid-command"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_add_and_show_session() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&TestFixtures::monday_session())
        .stdout(assertions::session_created())
        .stdout(predicate::str::contains("on 2024-03-04"));

    let entry = harness.run_json(&["show", "1"]);
    assert_eq!(entry["class_id"], "SE1801");
    assert_eq!(entry["room_id"], 204);
    assert_eq!(entry["status"], "not_yet");
    assert_eq!(entry["specific_date"], "2024-03-04");

    harness
        .run_success(&["show", "1"])
        .stdout(predicate::str::contains("SE1801"));
    harness
        .run_failure(&["show", "99"])
        .stderr(assertions::has_error())
        .stderr(predicate::str::contains("99"));
}

#[test]
fn test_conflicting_session_is_rejected() {
    let harness = CliTestHarness::new();
    harness.run_success(&TestFixtures::monday_session());

    // same lecturer, overlapping window, another class and room
    harness
        .run_failure(&[
            "add", "--subject", "12", "--class", "SE1802", "--lecturer", "7",
            "--start", "10:00", "--end", "11:00", "--date", "2024-03-04",
        ])
        .stderr(assertions::has_error())
        .stderr(predicate::str::contains("lecturer"));

    // back to back is allowed
    harness
        .run_success(&[
            "add", "--subject", "12", "--class", "SE1802", "--lecturer", "7",
            "--start", "10:30", "--end", "11:30", "--date", "2024-03-04",
        ])
        .stdout(assertions::session_created());
}

#[test]
fn test_missing_fields_are_reported() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["add", "--class", "SE1801", "--start", "09:00", "--end", "10:30"])
        .stderr(predicate::str::contains("subject_id"))
        .stderr(predicate::str::contains("lecturer_id"));
}

#[test]
fn test_inverted_window_is_rejected() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&[
            "add", "--subject", "12", "--class", "SE1801", "--lecturer", "7",
            "--start", "11:00", "--end", "10:00",
        ])
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_check_reports_each_dimension() {
    let harness = CliTestHarness::new();
    harness.run_success(&TestFixtures::monday_session());

    let outcome = harness.run_json(&[
        "check", "--subject", "30", "--class", "SE1801", "--lecturer", "9",
        "--start", "10:00", "--end", "11:00", "--date", "2024-03-04", "--room", "204",
    ]);
    assert_eq!(outcome["missing_fields"], false);
    assert_eq!(outcome["lecturer_conflict"], false);
    assert_eq!(outcome["class_conflict"], true);
    assert_eq!(outcome["room_conflict"], true);

    // excluding the booked session clears everything
    let outcome = harness.run_json(&[
        "check", "--subject", "30", "--class", "SE1801", "--lecturer", "9",
        "--start", "10:00", "--end", "11:00", "--date", "2024-03-04", "--room", "204",
        "--exclude", "1",
    ]);
    assert_eq!(outcome["class_conflict"], false);
    assert_eq!(outcome["room_conflict"], false);

    harness
        .run_success(&["check", "--class", "SE1801"])
        .stdout(predicate::str::contains("missing"));
}

#[test]
fn test_edit_session() {
    let harness = CliTestHarness::new();
    harness.run_success(&TestFixtures::monday_session());

    harness
        .run_success(&["edit", "1", "--status", "attended", "--room-clear", "--building", "Alpha"])
        .stdout(predicate::str::contains("Updated session #1"));

    let entry = harness.run_json(&["show", "1"]);
    assert_eq!(entry["status"], "attended");
    assert!(entry["room_id"].is_null());
    assert_eq!(entry["building"], "Alpha");
    assert_eq!(entry["start_time"], "09:00:00");

    harness
        .run_success(&["edit", "1"])
        .stdout(predicate::str::contains("Nothing to change"));
    harness
        .run_failure(&["edit", "42", "--status", "absent"])
        .stderr(predicate::str::contains("42"));
    harness.run_failure(&["edit", "1", "--status", "sleeping"]);
}

#[test]
fn test_list_and_terms() {
    let harness = CliTestHarness::new();
    harness.run_success(&TestFixtures::monday_session());
    harness.run_success(&TestFixtures::weekly_template());

    harness
        .run_success(&["list", "--class", "SE1801"])
        .stdout(assertions::has_session_table_headers());

    let listed = harness.run_json(&["list", "--lecturer", "7"]);
    let ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    // ordered by start time
    assert_eq!(ids, vec![1, 2]);

    let by_term = harness.run_json(&["list", "--class", "SE1801", "--term", "3"]);
    assert_eq!(by_term.as_array().unwrap().len(), 1);

    assert_eq!(harness.run_json(&["terms"]), serde_json::json!([3]));

    harness
        .run_success(&["list", "--class", "NOPE"])
        .stdout(predicate::str::contains("No sessions found"));
}

#[test]
fn test_day_and_range_materialize_templates() {
    let harness = CliTestHarness::new();
    harness.run_success(&TestFixtures::monday_session());
    harness.run_success(&TestFixtures::weekly_template());

    let monday = harness.run_json(&["day", "--class", "SE1801", "2024-03-04"]);
    let monday = monday.as_array().unwrap();
    assert_eq!(monday.len(), 2);
    assert!(monday.iter().all(|e| e["specific_date"] == "2024-03-04"));

    let week = harness.run_json(&["range", "--class", "SE1801", "2024-03-04", "2024-03-10"]);
    assert_eq!(week.as_array().unwrap().len(), 8);

    let inverted = harness.run_json(&["range", "--class", "SE1801", "2024-03-10", "2024-03-04"]);
    assert!(inverted.as_array().unwrap().is_empty());
}

#[test]
fn test_repeat_creates_weekly_instances() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "add", "--subject", "12", "--class", "SE1801", "--lecturer", "7",
            "--start", "09:00", "--end", "10:30", "--repeat", "3",
        ])
        .stdout(predicate::str::contains("Created 3 weekly sessions"));

    let listed = harness.run_json(&["list", "--class", "SE1801"]);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|e| e["is_recurring"] == true && e["recurrence_count"] == 3));
}

#[test]
fn test_delete_session() {
    let harness = CliTestHarness::new();
    harness.run_success(&TestFixtures::monday_session());

    harness
        .run_success(&["delete", "1", "--force"])
        .stdout(predicate::str::contains("Deleted session #1"));
    harness
        .run_failure(&["delete", "1", "--force"])
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_week_view_combines_calendars() {
    let harness = CliTestHarness::new();
    harness.run_success(&TestFixtures::monday_session());
    harness
        .run_success(&[
            "personal", "add", "Midterm", "--start", "2024-03-06 13:00",
            "--end", "2024-03-06 15:00", "--type", "exam",
        ])
        .stdout(predicate::str::contains("Added"));

    let view = harness.run_json(&["week", "--class", "SE1801", "--start", "2024-03-04"]);
    assert_eq!(view["week_start"], "2024-03-04");
    assert_eq!(view["class_by_day"]["1"][0]["class_id"], "SE1801");
    assert_eq!(view["personal_by_day"]["3"][0]["title"], "Midterm");
    assert_eq!(view["personal_by_day"]["3"][0]["entry_type"], "EXAM");

    harness
        .run_success(&["week", "--class", "SE1801", "--start", "2024-03-04"])
        .stdout(predicate::str::contains("Midterm"));
    harness
        .run_success(&["week", "--class", "SE1801", "--start", "2030-01-07"])
        .stdout(predicate::str::contains("Nothing scheduled"));
}

#[test]
fn test_personal_entry_commands() {
    let harness = CliTestHarness::new();

    harness.run_success(&[
        "personal", "add", "Reading group", "--start", "2024-03-05 18:00",
        "--end", "2024-03-05 19:00", "--type", "meeting", "--location", "Library",
    ]);
    harness.run_success(&[
        "personal", "add", "Essay", "--start", "2024-03-08 09:00",
        "--end", "2024-03-08 12:00", "--type", "assignment",
    ]);

    let meetings = harness.run_json(&["personal", "list", "--type", "meeting"]);
    assert_eq!(meetings.as_array().unwrap().len(), 1);
    assert_eq!(meetings[0]["color"], "#3B82F6");
    assert_eq!(meetings[0]["reminder_minutes"], 15);

    let ranged = harness.run_json(&[
        "personal", "list", "--from", "2024-03-07 00:00", "--to", "2024-03-09 00:00",
    ]);
    assert_eq!(ranged.as_array().unwrap().len(), 1);
    assert_eq!(ranged[0]["title"], "Essay");

    harness
        .run_success(&["personal", "edit", "1", "--location-clear", "--reminder", "30"])
        .stdout(predicate::str::contains("Updated"));
    let all = harness.run_json(&["personal", "list"]);
    assert!(all[0]["location"].is_null());
    assert_eq!(all[0]["reminder_minutes"], 30);

    harness
        .run_failure(&[
            "personal", "add", "Backwards", "--start", "2024-03-05 18:00",
            "--end", "2024-03-05 17:00",
        ])
        .stderr(predicate::str::contains("Invalid input"));

    harness
        .run_success(&["personal", "delete", "2", "--force"])
        .stdout(predicate::str::contains("Deleted"));
    assert_eq!(harness.run_json(&["personal", "list"]).as_array().unwrap().len(), 1);

    // both entries are in the past
    assert!(harness.run_json(&["personal", "upcoming"]).as_array().unwrap().is_empty());
}

#[test]
fn test_config_file_is_read_from_working_directory() {
    let harness = CliTestHarness::new();
    std::fs::write(
        harness.dir().join("classplan.toml"),
        "[schedule]\ntimezone = \"Not/AZone\"\n",
    )
    .unwrap();

    // the environment overrides the file
    harness.run_success(&["terms"]);

    harness
        .command()
        .env_remove("CLASSPLAN_SCHEDULE__TIMEZONE")
        .args(["terms"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_term_filter_needs_a_class() {
    let harness = CliTestHarness::new();
    harness.run_success(&TestFixtures::weekly_template());

    harness
        .run_failure(&["list", "--lecturer", "7", "--term", "3"])
        .stderr(predicate::str::contains("error"));
    harness
        .run_success(&["list", "--class", "SE1801", "--term", "3"])
        .stdout(predicate::str::contains("SE1801"));
}

#[test]
fn test_sessions_persist_between_invocations() {
    let harness = CliTestHarness::new();
    harness.run_success(&TestFixtures::monday_session());

    harness
        .run_failure(&[
            "add", "--subject", "12", "--class", "SE1802", "--lecturer", "7",
            "--start", "10:00", "--end", "11:00", "--date", "2024-03-04",
        ])
        .stderr(predicate::str::contains("lecturer"));

    let listed = harness.run_json(&["list", "--lecturer", "7"]);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["class_id"], "SE1801");
}

#[test]
fn test_repeat_count_is_capped() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&[
            "add", "--subject", "12", "--class", "SE1801", "--lecturer", "7",
            "--start", "09:00", "--end", "10:30", "--repeat", "100000000",
        ])
        .stderr(predicate::str::contains("Invalid input"));
    assert!(harness.run_json(&["list", "--class", "SE1801"]).as_array().unwrap().is_empty());
}
