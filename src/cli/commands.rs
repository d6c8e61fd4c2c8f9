use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::{LeadId, TaskId};

#[derive(Parser)]
#[command(name = "pb", about = concat!("pipeboard v", env!("CARGO_PKG_VERSION"), " - leads, stages and follow-ups in your terminal"), version)]
pub struct Cli {
    /// Subcommand; without one the interactive board starts
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Database file (default: [database] path, ./data, or the user data dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file (default: <config dir>/pipeboard/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create and migrate the database, then print its path
    Init,
    /// List stages with their lead counts
    Stages,
    /// Add, list or move leads
    Lead(LeadCmd),
    /// Add notes to a lead
    Note(NoteCmd),
    /// Add or complete follow-up tasks
    Task(TaskCmd),
    /// Show open tasks due today or earlier
    Followups(FollowupsArgs),
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LeadCmd {
    #[command(subcommand)]
    pub action: LeadAction,
}

#[derive(Subcommand)]
pub enum LeadAction {
    /// Add a lead
    Add(LeadAddArgs),
    /// List leads, optionally filtered by a search query
    List(LeadListArgs),
    /// Move a lead to another stage
    Move(LeadMoveArgs),
}

#[derive(Args)]
pub struct LeadAddArgs {
    /// Full name
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    /// Classification (buyer, seller, ...)
    #[arg(long = "type", default_value = "buyer")]
    pub lead_type: String,
    /// Where the lead came from
    #[arg(long, default_value = "")]
    pub source: String,
    /// Stage name or id (default: the first stage)
    #[arg(long)]
    pub stage: Option<String>,
}

#[derive(Args)]
pub struct LeadListArgs {
    /// Matches name, phone, email or source, ignoring case
    pub query: Option<String>,
}

#[derive(Args)]
pub struct LeadMoveArgs {
    pub lead_id: LeadId,
    /// Stage name or id
    pub stage: String,
}

// ---------------------------------------------------------------------------
// Notes and tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NoteCmd {
    #[command(subcommand)]
    pub action: NoteAction,
}

#[derive(Subcommand)]
pub enum NoteAction {
    /// Append a note to a lead
    Add(NoteAddArgs),
}

#[derive(Args)]
pub struct NoteAddArgs {
    pub lead_id: LeadId,
    pub body: String,
}

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a follow-up task for a lead
    Add(TaskAddArgs),
    /// Mark a task done
    Done(TaskDoneArgs),
}

#[derive(Args)]
pub struct TaskAddArgs {
    pub lead_id: LeadId,
    pub title: String,
    /// Due date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct TaskDoneArgs {
    pub task_id: TaskId,
}

#[derive(Args)]
pub struct FollowupsArgs {
    /// Include open tasks that are not due yet or have no due date
    #[arg(long)]
    pub all: bool,
}
