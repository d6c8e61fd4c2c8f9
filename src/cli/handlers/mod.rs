mod init;
pub use init::cmd_init;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{config_path, load_config, resolve_db_path};
use crate::io::state::state_path;
use crate::io::{SqliteStore, Store};
use crate::logging;
use crate::model::{Config, NewLead, Stage, parse_due_date};
use crate::tui::input::ValidationError;
use crate::tui::theme::Theme;

type CmdResult = Result<(), Box<dyn Error>>;

/// Settings every entry point needs: the loaded config and the database
/// file it resolves to.
pub struct Context {
    pub config: Config,
    pub db_path: PathBuf,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let config = load_config(config_path(cli.config.as_deref()).as_deref())?;
        let db_path = resolve_db_path(cli.db.as_deref(), &config);
        Ok(Context { config, db_path })
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Start the interactive board. Logs go to a file beside the database
/// unless `[log] file` says otherwise.
pub fn run_tui(cli: &Cli) -> CmdResult {
    let ctx = Context::from_cli(cli)?;
    let store = SqliteStore::open(&ctx.db_path)?;

    let log_dir = match ctx.db_path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let _guard = logging::init_file(&ctx.config.log, &log_dir);
    logging::install_panic_logging();
    tracing::info!(db = %ctx.db_path.display(), "starting board");

    let theme = Theme::from_config(&ctx.config.ui);
    crate::tui::run(Arc::new(store), theme, &state_path(&ctx.db_path))
}

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let ctx = Context::from_cli(&cli)?;
    let Some(command) = cli.command else {
        return Ok(());
    };

    let store = || open_store(&ctx.db_path);
    match command {
        Commands::Init => cmd_init(&ctx.db_path, json),
        Commands::Stages => cmd_stages(&store()?, json),
        Commands::Lead(LeadCmd { action }) => match action {
            LeadAction::Add(args) => cmd_lead_add(&store()?, args, json),
            LeadAction::List(args) => cmd_lead_list(&store()?, args, json),
            LeadAction::Move(args) => cmd_lead_move(&store()?, args, json),
        },
        Commands::Note(NoteCmd { action }) => match action {
            NoteAction::Add(args) => cmd_note_add(&store()?, args, json),
        },
        Commands::Task(TaskCmd { action }) => match action {
            TaskAction::Add(args) => cmd_task_add(&store()?, args, json),
            TaskAction::Done(args) => cmd_task_done(&store()?, args, json),
        },
        Commands::Followups(args) => cmd_followups(&store()?, args, json),
    }
}

fn open_store(db_path: &Path) -> Result<SqliteStore, Box<dyn Error>> {
    tracing::debug!(db = %db_path.display(), "opening store");
    SqliteStore::open(db_path)
        .map_err(|e| format!("cannot open {}: {}", db_path.display(), e).into())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Find a stage by id, or by name ignoring case.
fn resolve_stage<'a>(stages: &'a [Stage], arg: &str) -> Result<&'a Stage, String> {
    let arg = arg.trim();
    if let Ok(id) = arg.parse::<i64>()
        && let Some(stage) = stages.iter().find(|s| s.id.0 == id)
    {
        return Ok(stage);
    }
    stages
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(arg))
        .ok_or_else(|| format!("no stage named or numbered '{}'", arg))
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

fn cmd_stages(store: &dyn Store, json: bool) -> CmdResult {
    let stages = store.list_stages()?;
    let by_stage = store.list_leads_by_stage()?;
    let count = |stage: &Stage| by_stage.get(&stage.id).map_or(0, Vec::len);

    if json {
        let out: Vec<StageJson> = stages
            .iter()
            .map(|stage| StageJson {
                stage,
                leads: count(stage),
            })
            .collect();
        return print_json(&out);
    }
    for stage in &stages {
        println!("{}", format_stage_line(stage, count(stage)));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

fn cmd_lead_add(store: &dyn Store, args: LeadAddArgs, json: bool) -> CmdResult {
    let lead = NewLead {
        full_name: args.name,
        phone: args.phone,
        email: args.email,
        lead_type: args.lead_type,
        source: args.source,
    }
    .normalized();
    if lead.full_name.is_empty() {
        return Err(ValidationError::NameRequired.into());
    }

    let stages = store.list_stages()?;
    let stage = match args.stage.as_deref() {
        Some(arg) => resolve_stage(&stages, arg)?,
        None => stages.first().ok_or(ValidationError::NoStages)?,
    };

    let id = store.create_lead(&lead, stage.id)?;
    tracing::info!(lead = %id, stage = %stage.id, "lead created");
    if json {
        return print_json(&IdJson { id: id.0 });
    }
    println!("Created lead {} ({}) in {}", id, lead.full_name, stage.name);
    Ok(())
}

fn cmd_lead_list(store: &dyn Store, args: LeadListArgs, json: bool) -> CmdResult {
    let query = args.query.unwrap_or_default();
    let leads = store.list_leads(&query)?;
    if json {
        return print_json(&leads);
    }
    if leads.is_empty() {
        if query.trim().is_empty() {
            println!("No leads yet.");
        } else {
            println!("No leads match \"{}\".", query.trim());
        }
        return Ok(());
    }
    for lead in &leads {
        println!("{}", format_lead_line(lead));
    }
    Ok(())
}

fn cmd_lead_move(store: &dyn Store, args: LeadMoveArgs, json: bool) -> CmdResult {
    let stages = store.list_stages()?;
    let stage = resolve_stage(&stages, &args.stage)?;
    store.move_lead_stage(args.lead_id, stage.id)?;
    tracing::info!(lead = %args.lead_id, stage = %stage.id, "lead moved");
    if json {
        return print_json(&MovedJson {
            lead_id: args.lead_id.0,
            stage_id: stage.id.0,
            stage: &stage.name,
        });
    }
    println!("Moved lead {} to {}", args.lead_id, stage.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Notes and tasks
// ---------------------------------------------------------------------------

fn cmd_note_add(store: &dyn Store, args: NoteAddArgs, json: bool) -> CmdResult {
    let body = args.body.trim();
    if body.is_empty() {
        return Err(ValidationError::NoteRequired.into());
    }
    // Surface a missing lead as "not found" rather than a foreign key error
    let lead = store.get_lead(args.lead_id)?;
    let id = store.add_note(lead.id, body)?;
    if json {
        return print_json(&IdJson { id: id.0 });
    }
    println!("Added note {} to {}", id, lead.full_name);
    Ok(())
}

fn cmd_task_add(store: &dyn Store, args: TaskAddArgs, json: bool) -> CmdResult {
    let title = args.title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired.into());
    }
    let raw_due = args.due.unwrap_or_default();
    let due = parse_due_date(&raw_due)
        .map_err(|_| ValidationError::InvalidDueDate(raw_due.trim().to_string()))?;

    let lead = store.get_lead(args.lead_id)?;
    let id = store.create_task(lead.id, title, due)?;
    if json {
        return print_json(&IdJson { id: id.0 });
    }
    match due {
        Some(d) => println!("Created task {} for {} (due {})", id, lead.full_name, d),
        None => println!("Created task {} for {}", id, lead.full_name),
    }
    Ok(())
}

fn cmd_task_done(store: &dyn Store, args: TaskDoneArgs, json: bool) -> CmdResult {
    store.complete_task(args.task_id)?;
    if json {
        return print_json(&IdJson { id: args.task_id.0 });
    }
    println!("Completed task {}", args.task_id);
    Ok(())
}

fn cmd_followups(store: &dyn Store, args: FollowupsArgs, json: bool) -> CmdResult {
    let today = Local::now().date_naive();
    let tasks: Vec<_> = store
        .list_open_tasks()?
        .into_iter()
        .filter(|t| args.all || t.is_due_by(today))
        .collect();
    if json {
        return print_json(&tasks);
    }
    if tasks.is_empty() {
        println!(
            "{}",
            if args.all {
                "No open tasks."
            } else {
                "Nothing due today."
            }
        );
        return Ok(());
    }
    for task in &tasks {
        println!("{}", format_task_line(task, today));
    }
    Ok(())
}
