//! `evermind` command-line host.
//!
//! # Responsibility
//! - Wire `evermind_core` to SQLite collaborators, a static identity and a
//!   stdout notifier.
//! - Run one mutation or projection per invocation and print the result.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use evermind_core::{
    default_log_level, init_logging, open_db, AssignmentDraft, AssignmentFilter, AssignmentId,
    AssignmentService, EngineConfig, LocalCache, Notice, NoticeLevel, Notifier, Priority,
    SqliteDocumentStore, SqliteLocalCache, StaticIdentity, SyncBridge, SystemClock, UserId,
    ViewEntry, ViewState, WeekView,
};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "evermind", version, about = "Assignment planner with due-date reminders")]
struct Cli {
    /// Local cache database
    #[arg(long, env = "EVERMIND_DB", default_value = "evermind.db")]
    db: PathBuf,

    /// Per-user document database acting as the remote store
    #[arg(long, env = "EVERMIND_REMOTE_DB")]
    remote_db: Option<PathBuf>,

    /// Signed-in user id; remote sync is skipped without one
    #[arg(long, env = "EVERMIND_USER")]
    user: Option<String>,

    /// JSON engine config file
    #[arg(long, env = "EVERMIND_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "EVERMIND_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enables file logging in this directory
    #[arg(long, env = "EVERMIND_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn reminder notifications on or off
    Notifications { state: Switch },
    #[command(flatten)]
    Session(SessionCommand),
}

/// Commands that run against a loaded session.
#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Add a new assignment
    Add(DraftArgs),
    /// Flip an assignment between pending and completed
    Toggle { id: String },
    /// Delete an assignment
    Delete { id: String },
    /// Replace an assignment; omitted fields keep their current values
    Edit {
        id: String,
        #[command(flatten)]
        changes: EditArgs,
    },
    /// Assignments due today
    Today,
    /// All assignments, soonest first
    List {
        #[arg(long, default_value = "all")]
        filter: AssignmentFilter,
    },
    /// Week grid relative to the current week
    Week {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },
    /// Reminders planned for the next window
    Reminders,
    /// Poll and print reminders as they come due
    Watch {
        /// Seconds between polls
        #[arg(long, default_value_t = 60)]
        interval: u64,
        /// Stop after this many polls
        #[arg(long)]
        polls: Option<u64>,
    },
}

#[derive(Args, Debug)]
struct DraftArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    course: String,
    /// YYYY-MM-DD
    #[arg(long)]
    due_date: String,
    /// HH:MM, defaults to 23:59
    #[arg(long)]
    due_time: Option<String>,
    #[arg(long, default_value = "medium")]
    priority: String,
    #[arg(long, default_value = "")]
    description: String,
}

impl DraftArgs {
    fn into_draft(self) -> AssignmentDraft {
        AssignmentDraft {
            title: self.title,
            course: self.course,
            description: self.description,
            due_date: self.due_date,
            due_time: self.due_time,
            priority: Priority::parse(&self.priority),
        }
    }
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    course: Option<String>,
    #[arg(long)]
    due_date: Option<String>,
    #[arg(long)]
    due_time: Option<String>,
    #[arg(long)]
    priority: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl EditArgs {
    fn apply(self, mut draft: AssignmentDraft) -> AssignmentDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(course) = self.course {
            draft.course = course;
        }
        if let Some(due_date) = self.due_date {
            draft.due_date = due_date;
        }
        if let Some(due_time) = self.due_time {
            draft.due_time = Some(due_time);
        }
        if let Some(priority) = self.priority {
            draft.priority = Priority::parse(&priority);
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        draft
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Switch {
    On,
    Off,
}

/// Prints reminders to stdout; the terminal always grants permission.
struct StdoutNotifier {
    enabled: bool,
}

impl Notifier for StdoutNotifier {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_permitted(&self) -> bool {
        true
    }

    fn fire(&self, title: &str, body: &str) {
        println!("[{title}] {body}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(dir) = &cli.log_dir {
        start_logging(cli.log_level.as_deref(), dir)?;
    }

    let config = load_config(cli.config.as_deref())?;
    let cache_conn =
        open_db(&cli.db).with_context(|| format!("opening {}", cli.db.display()))?;
    let cache = SqliteLocalCache::with_keys(
        cache_conn,
        config.assignments_key.as_str(),
        config.notifications_key.as_str(),
    );

    let command = match cli.command {
        Command::Notifications { state } => {
            let enabled = matches!(state, Switch::On);
            cache.set_notifications_enabled(enabled)?;
            println!(
                "notifications {}",
                if enabled { "enabled" } else { "disabled" }
            );
            return Ok(());
        }
        Command::Session(command) => command,
    };

    let notifier = StdoutNotifier {
        enabled: cache.notifications_enabled()?,
    };
    let bridge = build_bridge(cli.remote_db.as_deref(), cli.user.as_deref(), cache)?;
    let mut service =
        AssignmentService::new(bridge, Box::new(notifier), SystemClock, &config);
    let outcome = service.start_session();
    info!("event=cli_session module=cli status=ok outcome={outcome:?}");

    let result = run(&mut service, command);
    print_notices(service.take_notices());
    result
}

fn run(service: &mut AssignmentService<SystemClock>, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Add(args) => {
            let id = service.add(&args.into_draft())?;
            println!("{id}");
        }
        SessionCommand::Toggle { id } => {
            match service.toggle_complete(&AssignmentId::from(id.as_str())) {
                Some(true) => println!("{id} completed"),
                Some(false) => println!("{id} pending"),
                None => println!("{id} not found"),
            }
        }
        SessionCommand::Delete { id } => match service.delete(&AssignmentId::from(id.as_str())) {
            Some(_) => println!("{id} deleted"),
            None => println!("{id} not found"),
        },
        SessionCommand::Edit { id, changes } => {
            let id = AssignmentId::from(id);
            let Some(current) = service.edit_draft(&id) else {
                bail!("assignment {id} not found");
            };
            let result = service.edit(&id, &changes.apply(current))?;
            println!("{}", result.new_id);
        }
        SessionCommand::Today => print_entries(
            &service.views().today,
            "No assignments due today. Great job staying on top of your work!",
        ),
        SessionCommand::List { filter } => {
            service.set_filter(filter);
            print_entries(
                &service.views().all,
                "No assignments found. Add your first assignment to get started.",
            );
        }
        SessionCommand::Week { offset } => {
            let Some(window) = service.navigate_week(offset) else {
                bail!("week offset {offset} is out of range");
            };
            match &service.views().week {
                ViewState::Ready(week) => print_week(week),
                _ => println!("{}\n  no assignments this week", window.range_label()),
            }
        }
        SessionCommand::Reminders => {
            if !service.notifier().can_notify() {
                println!("notifications are off; run `evermind notifications on`");
            }
            for intent in service.planned_reminders() {
                println!(
                    "{}  {}  {}",
                    intent.fire_at.format("%Y-%m-%d %H:%M"),
                    intent.assignment_id,
                    intent.body
                );
            }
        }
        SessionCommand::Watch { interval, polls } => {
            let mut remaining = polls;
            loop {
                service.reload();
                service.tick();
                print_notices(service.take_notices());
                if let Some(left) = remaining.as_mut() {
                    *left = left.saturating_sub(1);
                    if *left == 0 {
                        break;
                    }
                }
                std::thread::sleep(Duration::from_secs(interval));
            }
        }
    }
    Ok(())
}

fn start_logging(level: Option<&str>, dir: &Path) -> Result<()> {
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(dir)
    };
    let dir = dir
        .to_str()
        .with_context(|| format!("log dir {} is not valid UTF-8", dir.display()))?;
    init_logging(level.unwrap_or(default_log_level()), dir).map_err(anyhow::Error::msg)
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn build_bridge<C: LocalCache + 'static>(
    remote_db: Option<&Path>,
    user: Option<&str>,
    cache: C,
) -> Result<SyncBridge> {
    let Some(remote_path) = remote_db else {
        return Ok(SyncBridge::local_only(Box::new(cache)));
    };
    let identity = match user.and_then(UserId::new) {
        Some(user) => StaticIdentity::signed_in(user),
        None => StaticIdentity::anonymous(),
    };
    let remote = SqliteDocumentStore::open(remote_path)
        .with_context(|| format!("opening {}", remote_path.display()))?;
    Ok(SyncBridge::new(
        Box::new(identity),
        Box::new(remote),
        Box::new(cache),
    ))
}

fn print_entries(view: &ViewState<Vec<ViewEntry>>, empty_text: &str) {
    match view {
        ViewState::Ready(entries) => {
            for entry in entries {
                let a = &entry.assignment;
                let badge = entry
                    .status
                    .badge()
                    .map(|badge| format!(" [{}]", badge.as_str()))
                    .unwrap_or_default();
                let overdue = if entry.status.overdue { " [overdue]" } else { "" };
                println!(
                    "[{}] {}  {} ({})  due {} {}  {}{badge}{overdue}",
                    if a.completed { "x" } else { " " },
                    a.id,
                    a.title,
                    a.course,
                    a.due_date_text(),
                    a.due_time_text(),
                    a.priority,
                );
            }
        }
        _ => println!("{empty_text}"),
    }
}

fn print_week(week: &WeekView) {
    println!("{}", week.range_label);
    for slot in &week.slots {
        let marker = if slot.is_today { "*" } else { " " };
        println!("{marker}{} {}", slot.label(), slot.date.format("%m-%d"));
        for a in &slot.assignments {
            println!("    {} ({}) {}", a.title, a.course, a.due_time_text());
        }
    }
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.text),
            NoticeLevel::Error => eprintln!("{}", notice.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Command, DraftArgs, SessionCommand, Switch};
    use clap::Parser;
    use evermind_core::{
        AssignmentService, DisabledNotifier, EngineConfig, InMemoryCache, SyncBridge, SystemClock,
    };

    fn service() -> AssignmentService<SystemClock> {
        let mut service = AssignmentService::new(
            SyncBridge::local_only(Box::new(InMemoryCache::new())),
            Box::new(DisabledNotifier),
            SystemClock,
            &EngineConfig::default(),
        );
        service.start_session();
        service
    }

    fn draft(title: &str) -> DraftArgs {
        DraftArgs {
            title: title.to_string(),
            course: "ENG101".to_string(),
            due_date: "2025-03-10".to_string(),
            due_time: None,
            priority: "high".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn rejected_add_returns_error() {
        let mut service = service();
        assert!(run(&mut service, SessionCommand::Add(draft(""))).is_err());
        assert!(service.store().is_empty());
        assert_eq!(
            service.take_notices()[0].text,
            "please fill in all required fields."
        );

        assert!(run(&mut service, SessionCommand::Add(draft("Essay"))).is_ok());
        assert_eq!(service.store().len(), 1);
    }

    #[test]
    fn notifications_parse_outside_session_commands() {
        let cli = Cli::try_parse_from(["evermind", "notifications", "off"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Notifications { state: Switch::Off }
        ));

        let cli = Cli::try_parse_from(["evermind", "week", "--offset", "-2"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Session(SessionCommand::Week { offset: -2 })
        ));
    }

    #[test]
    fn out_of_range_week_offset_is_an_error() {
        let mut service = service();
        let command = SessionCommand::Week { offset: i32::MAX };
        assert!(run(&mut service, command).is_err());
    }
}
