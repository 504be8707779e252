use clap::Parser;
use classplan_core::db;
use classplan_core::error::CoreError;
use classplan_core::repository::SqliteRepository;
use classplan_core::service::ScheduleService;
use owo_colors::{OwoColorize, Style};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod util;
mod views;

use cli::{Cli, Commands};

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("CLASSPLAN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Failed to load configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level);
    debug!(
        database = %config.database_path,
        timezone = %config.schedule.timezone,
        user_id = config.user_id,
        "configuration loaded"
    );

    let pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            handle_error(e.into());
            std::process::exit(1);
        }
    };
    let service = match ScheduleService::new(SqliteRepository::new(pool.clone()), &config.schedule) {
        Ok(service) => service,
        Err(e) => {
            handle_error(e.into());
            std::process::exit(1);
        }
    };

    let user_id = config.user_id;
    debug!(command = ?cli.command, "dispatching");
    let result = match cli.command {
        Commands::Add(command) => commands::add::add_schedule(&service, command).await,
        Commands::Check(command) => commands::check::check_schedule(&service, command).await,
        Commands::Edit(command) => commands::edit::edit_schedule(&service, command).await,
        Commands::Show(command) => commands::show::show_schedule(&service, command).await,
        Commands::Delete(command) => commands::delete::delete_schedule(&service, command).await,
        Commands::List(command) => commands::list::list_schedules(&service, command).await,
        Commands::Day(command) => commands::list::day_schedules(&service, command).await,
        Commands::Range(command) => commands::list::range_schedules(&service, command).await,
        Commands::Terms(output) => commands::list::list_terms(&service, output).await,
        Commands::Week(command) => commands::calendar::week_view(&service, command, user_id).await,
        Commands::Today(command) => commands::calendar::today_view(&service, command, user_id).await,
        Commands::Personal(command) => {
            commands::personal::personal_command(&service, command.command, user_id).await
        }
    };

    pool.close().await;
    info!(ok = result.is_ok(), "command finished");

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::MissingFields(fields) => {
                eprintln!("{} Missing required fields:", "Error:".style(error_style));
                for field in fields {
                    eprintln!("  {} {}", "-".yellow(), field);
                }
            }
            CoreError::ScheduleConflict(dimensions) => {
                eprintln!(
                    "{} Session conflicts with an existing session:",
                    "Error:".style(error_style)
                );
                for dimension in dimensions {
                    eprintln!("  {} {} is already booked", "-".yellow(), dimension.to_string().yellow());
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidTimezone(s) => {
                eprintln!("{} Invalid timezone: {}", "Error:".style(error_style), s);
                eprintln!("Set schedule.timezone in classplan.toml or CLASSPLAN_SCHEDULE__TIMEZONE.");
            }
            CoreError::Database(source) => {
                eprintln!("{} Database error: {}", "Error:".style(error_style), source);
            }
            _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
