//! CLI argument parsing and command handling.
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use dialoguer::Password;
use rusqlite::Connection;

use crate::config::Config;
use crate::error::KronosError;
use crate::managers::{CategoryManager, ProjectManager, TaskManager, TimerManager};
use crate::report::{self, GoalStatus};
use crate::store::{self, auth};
use crate::types::{Goals, Project, Record, Task, Timer, TimerTags, User};
use crate::{dates, goals, stopwatch};

#[derive(Parser)]
#[command(
    name = "kronos",
    version,
    about = "Kronos - A terminal-based time tracker"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account. Prompts for the password unless --password is given
    Signup {
        email: String,
        /// For scripts; skips the prompt and the confirmation
        #[arg(long = "password")]
        password: Option<String>,
    },
    /// Sign in and remember the session. Prompts for the password unless --password is given
    Login {
        email: String,
        #[arg(long = "password")]
        password: Option<String>,
    },
    Logout,
    Whoami,
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    Timer {
        #[command(subcommand)]
        command: TimerCommand,
    },
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    Goals {
        #[command(subcommand)]
        command: GoalsCommand,
    },
    /// Hours per weekday for the week starting at --start
    Report {
        /// First day of the week, d/M/yyyy (defaults to this week's Monday)
        #[arg(short = 's', long = "start")]
        start: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    Add {
        name: String,
        #[arg(short = 'c', long = "client")]
        client: String,
        #[arg(short = 'd', long = "description")]
        description: String,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    Add { name: String, color_opt: Option<String> },
    /// Categories with hours logged between --from and --to
    List {
        #[arg(short = 'f', long = "from")]
        from: Option<String>,
        #[arg(short = 't', long = "to")]
        to: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TimerCommand {
    Add {
        project: String,
        category: String,
        description: String,
        #[arg(short = 's', long = "start")]
        start: String,
        #[arg(short = 'e', long = "end")]
        end: String,
        /// d/M/yyyy, defaults to today
        #[arg(long = "date")]
        date: Option<String>,
        /// Defaults to the project's client
        #[arg(short = 'c', long = "client")]
        client: Option<String>,
        #[arg(short = 'i', long = "image")]
        image: Option<PathBuf>,
    },
    List {
        #[arg(short = 'f', long = "from")]
        from: Option<String>,
        #[arg(short = 't', long = "to")]
        to: Option<String>,
        #[arg(long = "category")]
        category: Option<String>,
    },
    /// Start the stopwatch
    Start,
    /// Stop the stopwatch and record the elapsed time as a timer
    Stop {
        project: String,
        category: String,
        description: String,
        #[arg(short = 'c', long = "client")]
        client: Option<String>,
    },
    /// Discard the running stopwatch without recording it
    Cancel,
    /// Write a timer's attached image to a file
    Image {
        id: u32,
        #[arg(short = 'o', long = "out")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    Add { title: String, description: String },
    List,
    /// Mark the task at the listed position as completed
    Done { position: usize },
    Remove { position: usize },
}

#[derive(Subcommand, Debug)]
pub enum GoalsCommand {
    Set { min: String, max: String },
    Show,
}

/// Execute a CLI command.
pub fn run(command: Command, config: &Config, conn: &Connection) -> Result<()> {
    match command {
        Command::Signup { email, password } => {
            let (password, confirm_password) = match password {
                Some(password) => (password.clone(), password),
                None => (
                    prompt_password("Password")?,
                    prompt_password("Confirm password")?,
                ),
            };
            let user = auth::sign_up(&email, &password, &confirm_password, conn)?;
            auth::sign_in(&email, &password, conn)?;
            println!("Account created for {}.", user.email);
        }
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password("Password")?,
            };
            let user = auth::sign_in(&email, &password, conn)?;
            println!("Signed in as {}.", user.email);
        }
        Command::Logout => {
            auth::sign_out(conn)?;
            println!("Signed out.");
        }
        Command::Whoami => match auth::current_user(conn)? {
            Some(user) => println!("{}", user.email),
            None => println!("Not signed in."),
        },
        Command::Project { command } => handle_project(command, &require_user(conn)?, conn)?,
        Command::Category { command } => handle_category(command, &require_user(conn)?, conn)?,
        Command::Timer { command } => handle_timer(command, &require_user(conn)?, conn)?,
        Command::Task { command } => handle_task(command, &require_user(conn)?, conn)?,
        Command::Goals { command } => handle_goals(command, &require_user(conn)?, conn)?,
        Command::Report { start } => handle_report(start, &require_user(conn)?, config, conn)?,
    }
    Ok(())
}

fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .context("failed to read password")
}

fn require_user(conn: &Connection) -> Result<User> {
    auth::current_user(conn)?.ok_or_else(|| KronosError::NotSignedIn.into())
}

fn handle_project(command: ProjectCommand, user: &User, conn: &Connection) -> Result<()> {
    let mut projects = ProjectManager::new(Some(user.id));
    projects.fetch(conn)?;
    match command {
        ProjectCommand::Add {
            name,
            client,
            description,
        } => {
            let record = projects.add_project(
                Project {
                    project_name: name,
                    client,
                    description,
                },
                conn,
            )?;
            println!("Project '{}' created.", record.data.project_name);
        }
        ProjectCommand::List => {
            if projects.items().is_empty() {
                println!("No projects yet.");
            }
            for project in projects.values() {
                println!(
                    "{:<24} {:<16} {}",
                    project.project_name, project.client, project.description
                );
            }
        }
    }
    Ok(())
}

fn handle_category(command: CategoryCommand, user: &User, conn: &Connection) -> Result<()> {
    let mut categories = CategoryManager::new(Some(user.id));
    categories.fetch(conn)?;
    match command {
        CategoryCommand::Add { name, color_opt } => {
            let record = categories.add_category(&name, color_opt, conn)?;
            println!("Category '{}' created ({}).", record.data.name, record.data.color);
        }
        CategoryCommand::List { from, to } => {
            let (start, end) = parse_range(from, to)?;
            let mut timers = TimerManager::new(Some(user.id));
            timers.fetch(conn)?;
            let totals =
                report::category_totals(&categories.values(), &timers.values(), start, end);
            if totals.is_empty() {
                println!("No categories yet.");
            }
            for category in totals {
                println!("{:<24} {:>6.2}h", category.name, category.total_hours);
            }
        }
    }
    Ok(())
}

fn handle_timer(command: TimerCommand, user: &User, conn: &Connection) -> Result<()> {
    match command {
        TimerCommand::Add {
            project,
            category,
            description,
            start,
            end,
            date,
            client,
            image,
        } => {
            let tags = build_tags(project, category, description, client, user, conn)?;
            let date = date.unwrap_or_else(|| dates::format_date(Local::now().date_naive()));
            let mut timer = Timer::from_times(tags, &date, &start, &end)?;
            if let Some(path) = image {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("failed to read image `{}`", path.display()))?;
                timer.attach_image(&bytes);
            }
            save_timer(timer, user, conn)?;
        }
        TimerCommand::List { from, to, category } => {
            let (start, end) = parse_range(from, to)?;
            let timers = match category {
                Some(name) => {
                    store::query_documents_by_field::<Timer>(user.id, "category", &name, conn)?
                }
                None => {
                    let mut manager = TimerManager::new(Some(user.id));
                    manager.fetch(conn)?;
                    manager.items().to_vec()
                }
            };
            let mut shown = 0;
            for record in &timers {
                let timer = &record.data;
                let in_range = dates::parse_date(&timer.date)
                    .map(|date| date >= start && date <= end)
                    .unwrap_or(false);
                if !in_range {
                    continue;
                }
                shown += 1;
                println!(
                    "#{:<4} {:<10} {}-{} {:>5.2}h  {} / {} [{}]{}  {}",
                    record.id.unwrap_or_default(),
                    timer.date,
                    timer.start_time,
                    timer.end_time,
                    timer.hours,
                    timer.project,
                    timer.client,
                    timer.category,
                    if timer.image_base64.is_some() { " +image" } else { "" },
                    timer.description
                );
            }
            if shown == 0 {
                println!("No timers between {} and {}.", dates::format_date(start), dates::format_date(end));
            }
        }
        TimerCommand::Start => {
            stopwatch::start(user, Local::now(), conn)?;
            println!("Stopwatch started.");
        }
        TimerCommand::Stop {
            project,
            category,
            description,
            client,
        } => {
            let tags = build_tags(project, category, description, client, user, conn)?;
            let mut timers = TimerManager::new(Some(user.id));
            let record = stopwatch::stop_and_save(user, tags, Local::now(), &mut timers, conn)?;
            print_recorded(record);
        }
        TimerCommand::Cancel => {
            stopwatch::cancel(user, conn)?;
            println!("Stopwatch discarded.");
        }
        TimerCommand::Image { id, out } => {
            let record = store::query_document_by_id::<Timer>(user.id, id, conn)?
                .ok_or_else(|| anyhow::anyhow!("Timer #{id} not found"))?;
            match record.data.image_bytes()? {
                Some(bytes) => {
                    std::fs::write(&out, bytes)
                        .with_context(|| format!("failed to write `{}`", out.display()))?;
                    println!("Image written to {}.", out.display());
                }
                None => println!("Timer #{id} has no image."),
            }
        }
    }
    Ok(())
}

/// Fills the client from the named project unless one is given.
fn build_tags(
    project: String,
    category: String,
    description: String,
    client: Option<String>,
    user: &User,
    conn: &Connection,
) -> Result<TimerTags> {
    let mut projects = ProjectManager::new(Some(user.id));
    projects.fetch(conn)?;
    let Some(known) = projects.find_by_name(&project) else {
        anyhow::bail!("Project '{project}' not found");
    };
    let mut categories = CategoryManager::new(Some(user.id));
    categories.fetch(conn)?;
    if categories.find_by_name(&category).is_none() {
        anyhow::bail!("Category '{category}' not found");
    }
    if description.trim().is_empty() {
        anyhow::bail!("Please enter a description.");
    }
    Ok(TimerTags {
        client: client.unwrap_or_else(|| known.client.clone()),
        project,
        category,
        description,
    })
}

fn save_timer(timer: Timer, user: &User, conn: &Connection) -> Result<()> {
    let mut timers = TimerManager::new(Some(user.id));
    print_recorded(timers.add_timer(timer, conn)?);
    Ok(())
}

fn print_recorded(record: &Record<Timer>) {
    println!(
        "Timer #{} recorded: {:.2}h on {}.",
        record.id.unwrap_or_default(),
        record.data.hours,
        record.data.date
    );
}

fn handle_task(command: TaskCommand, user: &User, conn: &Connection) -> Result<()> {
    let mut tasks = TaskManager::new(Some(user.id));
    tasks.fetch(conn)?;
    match command {
        TaskCommand::Add { title, description } => {
            tasks.add_task(
                Task {
                    title,
                    description,
                    is_completed: false,
                },
                conn,
            )?;
            println!("Task added.");
        }
        TaskCommand::List => {
            if tasks.items().is_empty() {
                println!("No tasks.");
            }
            for (index, task) in tasks.values().iter().enumerate() {
                let mark = if task.is_completed { "x" } else { " " };
                println!("{:>3}. [{mark}] {} - {}", index + 1, task.title, task.description);
            }
        }
        TaskCommand::Done { position } => {
            tasks.set_completed(position_to_index(position)?, true, conn)?;
            println!("Task {position} completed.");
        }
        TaskCommand::Remove { position } => {
            let removed = tasks.remove_task(position_to_index(position)?, conn)?;
            println!("Removed task '{}'.", removed.data.title);
        }
    }
    Ok(())
}

fn position_to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))
}

fn handle_goals(command: GoalsCommand, user: &User, conn: &Connection) -> Result<()> {
    match command {
        GoalsCommand::Set { min, max } => {
            goals::save_goals(
                user,
                &Goals {
                    min_goal: min,
                    max_goal: max,
                },
                conn,
            )?;
            println!("Hours saved successfully.");
        }
        GoalsCommand::Show => {
            let goals = goals::load_goals(user, conn)?;
            let (min, max) = goals.thresholds();
            println!("Min goal: {}", describe_goal(&goals.min_goal, min));
            println!("Max goal: {}", describe_goal(&goals.max_goal, max));
        }
    }
    Ok(())
}

fn describe_goal(raw: &str, parsed: Option<f64>) -> String {
    match parsed {
        Some(hours) => format!("{hours}h"),
        None if raw.trim().is_empty() => "not set".to_string(),
        None => format!("'{raw}' (not a number, ignored)"),
    }
}

fn handle_report(start: Option<String>, user: &User, config: &Config, conn: &Connection) -> Result<()> {
    let start = match start {
        Some(value) => dates::parse_date(&value)?,
        None => start_of_week(Local::now().date_naive()),
    };
    let (start, end) = report::week_range(start);
    let mut timers = TimerManager::new(Some(user.id));
    timers.fetch(conn)?;
    let weekly = report::weekday_totals(&timers.values(), start, end);
    let (min, max) = goals::load_goals(user, conn)?.thresholds();

    println!(
        "Selected Range: {} - {}",
        dates::format_date(start),
        dates::format_date(end)
    );
    if weekly.is_empty() {
        println!("No data available for the selected week.");
        return Ok(());
    }
    for day in &weekly.days {
        let status = match GoalStatus::classify(day.hours, min, max) {
            GoalStatus::Unset | GoalStatus::Within => "",
            GoalStatus::Below => "  below min",
            GoalStatus::Above => "  above max",
        };
        println!(
            "{:<10} {:<20} {:>5.2}h{status}",
            report::weekday_name(day.weekday),
            text_bar(day.hours, config.chart_max_hours, 20),
            day.hours
        );
    }
    println!("{:<10} {:<20} {:>5.2}h", "Total", "", weekly.total_hours());
    Ok(())
}

fn text_bar(hours: f64, max_hours: f64, width: usize) -> String {
    "█".repeat(report::bar_cells(hours, max_hours, width))
}

fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Inclusive date range from optional bounds. Missing bounds default to
/// today; a missing start with a given end defaults to the end.
fn parse_range(from: Option<String>, to: Option<String>) -> Result<(NaiveDate, NaiveDate)> {
    let today = Local::now().date_naive();
    let end = match to {
        Some(value) => dates::parse_date(&value)?,
        None => today,
    };
    let start = match from {
        Some(value) => dates::parse_date(&value)?,
        None => end.min(today),
    };
    if start > end {
        anyhow::bail!("Start date must not be after end date");
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_starts_on_monday() {
        let thursday = NaiveDate::from_ymd_opt(2024, 6, 6).unwrap();
        assert_eq!(start_of_week(thursday), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn range_bounds_are_validated() {
        let (start, end) = parse_range(Some("1/6/2024".into()), Some("7/6/2024".into())).unwrap();
        assert!(start < end);
        assert!(parse_range(Some("7/6/2024".into()), Some("1/6/2024".into())).is_err());
        assert!(parse_range(Some("June".into()), None).is_err());
    }

    #[test]
    fn bar_width_is_clamped() {
        assert_eq!(text_bar(5.0, 10.0, 20).chars().count(), 10);
        assert_eq!(text_bar(25.0, 10.0, 20).chars().count(), 20);
        assert_eq!(text_bar(0.1, 10.0, 20), "");
    }

    #[test]
    fn task_positions_are_one_based() {
        assert_eq!(position_to_index(1).unwrap(), 0);
        assert!(position_to_index(0).is_err());
    }

    #[test]
    fn cli_parses_timer_add() {
        let cli = Cli::try_parse_from([
            "kronos", "timer", "add", "Website", "Design", "Mockups", "-s", "09:00", "-e", "10:30",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Timer {
                command: TimerCommand::Add { .. }
            })
        ));
    }

    #[test]
    fn passwords_are_not_positional() {
        assert!(Cli::try_parse_from(["kronos", "login", "jo@example.com", "secret"]).is_err());
        let cli = Cli::try_parse_from(["kronos", "login", "jo@example.com", "--password", "secret"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Login { password: Some(ref p), .. }) if p == "secret"
        ));
        let cli = Cli::try_parse_from(["kronos", "signup", "jo@example.com"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Signup { password: None, .. })));
    }
}
