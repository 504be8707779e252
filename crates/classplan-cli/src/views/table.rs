use chrono::{Datelike, NaiveDate, NaiveDateTime};
use chrono_humanize::{HumanTime, Humanize};
use classplan_core::materialization::WeeklyView;
use classplan_core::models::{PersonalEntry, PersonalEntryType, ScheduleEntry, ScheduleStatus};
use classplan_core::validation::ValidationOutcome;
use comfy_table::{Attribute, Cell, Color, Row, Table};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn weekday_name(iso_day: u32) -> &'static str {
    WEEKDAYS
        .get(iso_day.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

fn window(entry: &ScheduleEntry) -> String {
    format!(
        "{}-{}",
        entry.start_time.format("%H:%M"),
        entry.end_time.format("%H:%M")
    )
}

fn status_cell(status: ScheduleStatus) -> Cell {
    let cell = Cell::new(status.to_string());
    match status {
        ScheduleStatus::Attended => cell.fg(Color::Green),
        ScheduleStatus::Online => cell.fg(Color::Cyan),
        ScheduleStatus::Absent => cell.fg(Color::Red),
        ScheduleStatus::NotYet => cell,
    }
}

fn date_cell(entry: &ScheduleEntry, today: NaiveDate) -> Cell {
    match entry.specific_date {
        None => Cell::new("↻ weekly").fg(Color::Blue),
        Some(date) => {
            let text = format!("{} {}", date, weekday_name(entry.day_of_week().unwrap_or(0)));
            if date < today {
                Cell::new(text).fg(Color::DarkGrey)
            } else if date == today {
                Cell::new(text).fg(Color::Yellow)
            } else {
                Cell::new(text)
            }
        }
    }
}

fn room_text(entry: &ScheduleEntry) -> String {
    match (&entry.building, entry.room_id) {
        (Some(building), Some(room)) => format!("{} / {}", building, room),
        (None, Some(room)) => room.to_string(),
        (Some(building), None) => building.clone(),
        (None, None) => "None".to_string(),
    }
}

pub fn display_schedules(entries: &[ScheduleEntry], today: NaiveDate) {
    if entries.is_empty() {
        println!("No sessions found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Time", "Class", "Subject", "Lecturer", "Room", "Status", "Term"]);

    for entry in entries {
        let mut row = Row::new();
        let mut id_cell = Cell::new(entry.id);
        if !entry.is_active {
            id_cell = id_cell.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey);
        }
        row.add_cell(id_cell);
        row.add_cell(date_cell(entry, today));

        let mut time = window(entry);
        if let Some(index) = entry.occurrence_index {
            time.push_str(&format!(" ({}/{})", index + 1, entry.recurrence_count));
        }
        row.add_cell(Cell::new(time));
        row.add_cell(Cell::new(&entry.class_id));
        row.add_cell(Cell::new(entry.subject_id));
        row.add_cell(Cell::new(entry.lecturer_id));
        row.add_cell(Cell::new(room_text(entry)));
        row.add_cell(status_cell(entry.status));
        row.add_cell(Cell::new(
            entry.term_id.map_or_else(|| "None".to_string(), |t| t.to_string()),
        ));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_schedule_detail(entry: &ScheduleEntry) {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    let date = entry
        .specific_date
        .map_or_else(|| "weekly template".to_string(), |d| d.to_string());
    let occurrence = entry.occurrence_index.map_or_else(
        || "None".to_string(),
        |i| format!("{} of {}", i + 1, entry.recurrence_count),
    );

    let rows: Vec<(&str, String)> = vec![
        ("ID", entry.id.to_string()),
        ("Class", entry.class_id.clone()),
        ("Subject", entry.subject_id.to_string()),
        ("Lecturer", entry.lecturer_id.to_string()),
        ("Date", date),
        ("Time", window(entry)),
        ("Room", room_text(entry)),
        ("Status", entry.status.to_string()),
        ("Term", entry.term_id.map_or_else(|| "None".to_string(), |t| t.to_string())),
        ("Active", entry.is_active.to_string()),
        ("Recurring", entry.is_recurring.to_string()),
        ("Occurrence", occurrence),
        ("Updated", entry.updated_at.humanize()),
    ];
    for (field, value) in rows {
        table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
    }

    println!("{table}");
}

pub fn display_outcome(outcome: &ValidationOutcome) {
    let mut table = Table::new();
    table.set_header(vec!["Check", "Result"]);

    let flag = |hit: bool, bad: &str| {
        if hit {
            Cell::new(bad).fg(Color::Red).add_attribute(Attribute::Bold)
        } else {
            Cell::new("ok").fg(Color::Green)
        }
    };
    table.add_row(vec![Cell::new("Required fields"), flag(outcome.missing_fields, "missing")]);
    table.add_row(vec![Cell::new("Lecturer"), flag(outcome.lecturer_conflict, "conflict")]);
    table.add_row(vec![Cell::new("Class"), flag(outcome.class_conflict, "conflict")]);
    table.add_row(vec![Cell::new("Room"), flag(outcome.room_conflict, "conflict")]);

    println!("{table}");
}

fn type_cell(entry_type: PersonalEntryType) -> Cell {
    let cell = Cell::new(entry_type.to_string());
    match entry_type {
        PersonalEntryType::Exam => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        PersonalEntryType::Assignment => cell.fg(Color::Yellow),
        PersonalEntryType::Class => cell.fg(Color::Blue),
        PersonalEntryType::Meeting => cell.fg(Color::Magenta),
        PersonalEntryType::Personal | PersonalEntryType::Other => cell,
    }
}

pub fn display_personal(entries: &[PersonalEntry], now: NaiveDateTime) {
    if entries.is_empty() {
        println!("No personal entries found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Type", "Start", "End", "Location", "When"]);

    for entry in entries {
        let mut title = entry.title.clone();
        if entry.is_recurring {
            title.insert_str(0, "↻ ");
        }
        let when = HumanTime::from(entry.start_time - now).to_string();
        let when_cell = if entry.end_time < now {
            Cell::new(when).fg(Color::DarkGrey)
        } else {
            Cell::new(when)
        };

        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(title),
            type_cell(entry.entry_type),
            Cell::new(entry.start_time.format("%Y-%m-%d %H:%M")),
            Cell::new(entry.end_time.format("%Y-%m-%d %H:%M")),
            Cell::new(entry.location.as_deref().unwrap_or("None")),
            when_cell,
        ]);
    }

    println!("{table}");
}

pub fn display_weekly(view: &WeeklyView) {
    if view.is_empty() {
        println!(
            "Nothing scheduled between {} and {}.",
            view.week_start,
            view.week_end()
        );
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Day", "Time", "Item", "Details"]);

    for day in 1..=7u32 {
        let date = view.date_of(day);
        let iso_day = date.weekday().number_from_monday();
        let label = format!("{} {}", weekday_name(iso_day), date);

        let mut items: Vec<(String, Cell, String)> = Vec::new();
        for session in view.class_by_day.get(&day).into_iter().flatten() {
            items.push((
                window(session),
                Cell::new(format!("{} (subject {})", session.class_id, session.subject_id)).fg(Color::Blue),
                format!("lecturer {}, {}", session.lecturer_id, room_text(session)),
            ));
        }
        for entry in view.personal_by_day.get(&iso_day).into_iter().flatten() {
            items.push((
                format!("{}-{}", entry.start_time.format("%H:%M"), entry.end_time.format("%H:%M")),
                Cell::new(&entry.title),
                format!("{}{}", entry.entry_type, entry.location.as_ref().map(|l| format!(", {}", l)).unwrap_or_default()),
            ));
        }
        items.sort_by(|a, b| a.0.cmp(&b.0));

        for (i, (time, item, details)) in items.into_iter().enumerate() {
            let day_cell = if i == 0 {
                Cell::new(&label).add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            };
            table.add_row(vec![day_cell, Cell::new(time), item, Cell::new(details)]);
        }
    }

    println!("{table}");
}

pub fn display_terms(terms: &[i64]) {
    if terms.is_empty() {
        println!("No terms found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Term"]);
    for term in terms {
        table.add_row(vec![Cell::new(term)]);
    }

    println!("{table}");
}
