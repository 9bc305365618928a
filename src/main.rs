use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use you_first_tracker::config::Config;
use you_first_tracker::day::{self, format_day_key};
use you_first_tracker::formation::{days_to_next_stage, stage_for_streak};
use you_first_tracker::{Category, Dashboard, EntityKind, EntityStats, Result, db};

#[derive(Parser, Debug)]
#[command(name = "yft")]
#[command(about = "You First tracker: habits, streaks and formation stages")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file (overrides config)
    #[arg(long, env = "YFT_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a habit, rule or goal
    Add {
        name: String,
        #[arg(long, default_value = "habit", value_parser = parse_kind)]
        kind: EntityKind,
        #[arg(long, value_parser = parse_category)]
        category: Category,
    },
    /// Flip an entity's completion for a day (default today)
    Toggle {
        id: i64,
        #[arg(long)]
        date: Option<String>,
    },
    /// List entities
    List,
    /// Streaks, formation windows and health grade
    Stats {
        /// Evaluate as of this day instead of today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Write settings to the config file
    Config {
        /// Database file to use by default
        #[arg(long)]
        db_path: Option<PathBuf>,
        /// Default log filter, e.g. "info"
        #[arg(long)]
        log_filter: Option<String>,
    },
    /// Formation stage for a streak length
    Stage {
        #[arg(allow_hyphen_values = true)]
        streak: i64,
    },
}

fn parse_kind(s: &str) -> std::result::Result<EntityKind, String> {
    EntityKind::parse(s).ok_or_else(|| format!("unknown kind {:?} (habit, rule, goal)", s))
}

fn parse_category(s: &str) -> std::result::Result<Category, String> {
    Category::parse(s).ok_or_else(|| format!("unknown category {:?} (body, mind, spirit)", s))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args, config, &config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn day_or_today(date: Option<&str>) -> Result<chrono::NaiveDate> {
    match date {
        Some(s) => day::day_key(s),
        None => Ok(day::today()),
    }
}

fn run(args: Args, mut config: Config, config_path: &Path) -> Result<()> {
    let db_path = args.db.clone().unwrap_or_else(|| config.resolved_db_path());
    let open = || db::open_db(&db_path);

    match args.command {
        Command::Config { db_path, log_filter } => {
            if let Some(path) = db_path {
                config.db_path = Some(path);
            }
            if let Some(filter) = log_filter {
                config.log_filter = filter;
            }
            config.save(config_path)?;
            info!(path = %config_path.display(), "config saved");
            println!("Saved {}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Stage { streak } => {
            let stage = stage_for_streak(streak)?;
            println!("{}", stage.label());
            if let Some(days) = u32::try_from(streak).ok().and_then(days_to_next_stage) {
                println!("{} day(s) to next stage", days);
            }
        }
        Command::Add { name, kind, category } => {
            let conn = open()?;
            let entity = db::add_entity(&conn, &name, kind, category, day::today())?;
            info!(id = entity.id, "entity created");
            println!("Added {} #{}: {} [{}]", entity.kind.label(), entity.id, entity.name, entity.category.label());
        }
        Command::Toggle { id, date } => {
            let day = day_or_today(date.as_deref())?;
            let conn = open()?;
            let completed = db::toggle_completion(&conn, id, day)?;
            let state = if completed { "done" } else { "not done" };
            println!("#{} on {}: {}", id, format_day_key(day), state);
        }
        Command::List => {
            let conn = open()?;
            let entities = db::list_entities(&conn)?;
            if entities.is_empty() {
                println!("Nothing tracked yet.");
            }
            for e in entities {
                println!(
                    "#{:<4} {:<6} {:<7} {}  (since {})",
                    e.id,
                    e.kind.label(),
                    e.category.label(),
                    e.name,
                    format_day_key(e.created_at)
                );
            }
        }
        Command::Stats { date, json } => {
            let today = day_or_today(date.as_deref())?;
            let conn = open()?;
            let entities = db::list_entities(&conn)?;
            let ids: Vec<i64> = entities.iter().map(|e| e.id).collect();
            let logs = db::load_logs(&conn, &ids)?;
            let dashboard = Dashboard::build(&entities, &logs, today);

            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                print_dashboard(&dashboard);
            }
        }
    }
    Ok(())
}

fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

fn print_entity(e: &EntityStats) {
    let check = if e.completed_today { "x" } else { " " };
    println!("[{}] #{} {} ({}, {})", check, e.id, e.name, e.kind.label(), e.category.label());
    println!(
        "    🔥 {} day(s), best {} | {}",
        e.current_streak,
        e.longest_streak,
        e.stage.label()
    );
    if let Some(days) = e.days_to_next_stage {
        println!("    {} day(s) to next stage", days);
    }
    let w = &e.window;
    println!(
        "    67-day window {} {}% (S1 {}/{}, S2 {}/{}, S3 {}/{}, bonus {}/{})",
        progress_bar(w.percent(), 20),
        w.percent(),
        w.stage_one.completed,
        w.stage_one.total,
        w.stage_two.completed,
        w.stage_two.total,
        w.stage_three.completed,
        w.stage_three.total,
        w.bonus.completed,
        w.bonus.total,
    );
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("You First: {}", format_day_key(dashboard.today));
    println!();
    for e in &dashboard.entities {
        print_entity(e);
    }

    let h = &dashboard.health;
    if !dashboard.entities.is_empty() {
        println!();
    }
    if !h.has_data() {
        println!("{}", h.message);
        return;
    }
    println!("Grade {} ({}/100)", h.grade.label(), h.overall);
    println!("  Consistency {:>3.0}  {}", h.consistency, progress_bar(h.consistency.round() as u32, 20));
    println!("  Momentum    {:>3.0}  {}", h.momentum, progress_bar(h.momentum.round() as u32, 20));
    println!("  Balance     {:>3.0}  {}", h.balance, progress_bar(h.balance.round() as u32, 20));
    println!("  Engagement  {:>3.0}  {}", h.engagement, progress_bar(h.engagement.round() as u32, 20));
    println!("{}", h.message);
}
