use clap::{Args, Parser, Subcommand};

/// Class timetable manager: conflict-checked sessions, weekly recurrence and calendar views
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a class session (dated, one-time or weekly recurring)
    Add(AddCommand),
    /// Check a proposed session for conflicts without saving it
    Check(CheckCommand),
    /// Edit a class session
    Edit(EditCommand),
    /// Show a single class session
    Show(ShowCommand),
    /// Delete a class session
    Delete(DeleteCommand),
    /// List active sessions of a class, lecturer or subject
    List(ListCommand),
    /// Sessions of a class on one day, templates included
    Day(DayCommand),
    /// Sessions of a class over a date range, templates included
    Range(RangeCommand),
    /// Weekly view of a class and a user's personal calendar
    Week(WeekCommand),
    /// The seven days starting today
    Today(TodayCommand),
    /// List the terms that have active sessions
    Terms(OutputArgs),
    /// Manage personal calendar entries
    Personal(PersonalCommand),
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Fields describing a proposed session.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    #[arg(long)]
    pub subject: Option<i64>,
    /// Class-section identifier (e.g. SE1801)
    #[arg(long = "class")]
    pub class_id: Option<String>,
    #[arg(long)]
    pub lecturer: Option<i64>,
    /// Start time (e.g. '09:00', '2:30 PM')
    #[arg(long)]
    pub start: Option<String>,
    /// End time (e.g. '10:30', '4 PM')
    #[arg(long)]
    pub end: Option<String>,
    /// Session date; omit for a weekly template
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub room: Option<i64>,
    #[arg(long)]
    pub building: Option<String>,
    #[arg(long)]
    pub term: Option<i64>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Attendance status (not_yet, attended, online, absent)
    #[arg(long)]
    pub status: Option<String>,
    /// Date the session today when --date is omitted
    #[arg(long, conflicts_with = "repeat")]
    pub one_time: bool,
    /// Create N weekly sessions starting today
    #[arg(long, value_name = "N")]
    pub repeat: Option<i32>,
    /// Store the session as inactive
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckCommand {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Ignore this session id (when previewing an edit)
    #[arg(long)]
    pub exclude: Option<i64>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the session to edit
    pub id: i64,

    #[arg(long)]
    pub subject: Option<i64>,
    #[arg(long = "class")]
    pub class_id: Option<String>,
    #[arg(long)]
    pub lecturer: Option<i64>,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,

    #[arg(long)]
    pub date: Option<String>,
    /// Turn the session into a weekly template
    #[arg(long, conflicts_with = "date")]
    pub date_clear: bool,

    #[arg(long)]
    pub room: Option<i64>,
    #[arg(long, conflicts_with = "room")]
    pub room_clear: bool,

    #[arg(long)]
    pub building: Option<String>,
    #[arg(long, conflicts_with = "building")]
    pub building_clear: bool,

    #[arg(long)]
    pub term: Option<i64>,
    #[arg(long, conflicts_with = "term")]
    pub term_clear: bool,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long, conflicts_with = "deactivate")]
    pub activate: bool,
    #[arg(long)]
    pub deactivate: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    pub id: i64,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the session to delete
    pub id: i64,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(group(
    clap::ArgGroup::new("owner")
        .required(true)
        .args(["class_id", "lecturer", "subject"]),
))]
pub struct ListCommand {
    #[arg(long = "class")]
    pub class_id: Option<String>,
    #[arg(long)]
    pub lecturer: Option<i64>,
    #[arg(long)]
    pub subject: Option<i64>,
    /// Restrict a class listing to one term
    #[arg(long, requires = "class_id", conflicts_with_all = ["lecturer", "subject"])]
    pub term: Option<i64>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct DayCommand {
    #[arg(long = "class")]
    pub class_id: String,
    /// Day to show (default: today)
    pub date: Option<String>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct RangeCommand {
    #[arg(long = "class")]
    pub class_id: String,
    pub from: String,
    pub to: String,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct WeekCommand {
    #[arg(long = "class")]
    pub class_id: String,
    /// First day of the week (default: Monday of the current week)
    #[arg(long)]
    pub start: Option<String>,
    /// Whose personal entries to include (default: configured user)
    #[arg(long)]
    pub user: Option<i64>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct TodayCommand {
    #[arg(long = "class")]
    pub class_id: String,
    #[arg(long)]
    pub user: Option<i64>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct PersonalCommand {
    #[command(subcommand)]
    pub command: PersonalSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PersonalSubcommand {
    /// Add a personal entry
    Add(PersonalAddCommand),
    /// List personal entries
    List(PersonalListCommand),
    /// Edit a personal entry
    Edit(PersonalEditCommand),
    /// Delete a personal entry
    Delete(DeleteCommand),
    /// Show the next few entries
    Upcoming(PersonalUpcomingCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct PersonalAddCommand {
    pub title: String,
    /// Start (e.g. '2024-03-04 14:00', 'tomorrow 9am')
    #[arg(long)]
    pub start: String,
    #[arg(long)]
    pub end: String,
    /// class, exam, assignment, meeting, personal or other
    #[arg(long = "type")]
    pub entry_type: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Display color (hex)
    #[arg(long)]
    pub color: Option<String>,
    /// Recurrence pattern, stored as given
    #[arg(long)]
    pub recurring: Option<String>,
    /// Minutes before start to remind
    #[arg(long)]
    pub reminder: Option<i32>,
    #[arg(long)]
    pub user: Option<i64>,
}

#[derive(Parser, Debug, Clone)]
pub struct PersonalListCommand {
    #[arg(long)]
    pub user: Option<i64>,
    #[arg(long = "type", conflicts_with_all = ["from", "to"])]
    pub entry_type: Option<String>,
    #[arg(long, requires = "to")]
    pub from: Option<String>,
    #[arg(long, requires = "from")]
    pub to: Option<String>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct PersonalEditCommand {
    pub id: i64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,

    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,

    #[arg(long = "type")]
    pub entry_type: Option<String>,

    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, conflicts_with = "location")]
    pub location_clear: bool,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub recurring: Option<String>,
    #[arg(long, conflicts_with = "recurring")]
    pub recurring_clear: bool,

    #[arg(long)]
    pub reminder: Option<i32>,
}

#[derive(Parser, Debug, Clone)]
pub struct PersonalUpcomingCommand {
    #[arg(long)]
    pub user: Option<i64>,
    #[command(flatten)]
    pub output: OutputArgs,
}
