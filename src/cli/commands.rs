use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dq", about = concat!("dueq v", env!("CARGO_PKG_VERSION"), " - earliest deadline first, one task at a time"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a board in a different directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new board in the current directory
    Init(InitArgs),
    /// Add a task
    Add(AddArgs),
    /// Change fields of a task
    Edit(EditArgs),
    /// Delete a task without completing it
    Rm(RmArgs),
    /// Show the execution order
    List,
    /// Show the task to work on now
    Next,
    /// Complete a task (only the current one)
    Done(DoneArgs),
    /// Show task details
    Show(ShowArgs),
    /// Show tasks grouped by due date
    Cal,
    /// Get or set a board setting
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Prefix for task IDs
    #[arg(long, default_value = "T")]
    pub prefix: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Longer description
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// Deadline: YYYY-MM-DD, YYYY-MM-DDTHH:MM (local), or RFC 3339
    #[arg(long)]
    pub due: Option<String>,
    /// Priority, 1 = most urgent (default from board.toml)
    #[arg(long, short)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long = "desc", conflicts_with = "clear_desc")]
    pub description: Option<String>,
    /// Remove the description
    #[arg(long)]
    pub clear_desc: bool,
    /// New deadline
    #[arg(long, conflicts_with = "no_due")]
    pub due: Option<String>,
    /// Remove the deadline
    #[arg(long)]
    pub no_due: bool,
    /// New priority
    #[arg(long, short)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task ID (must be the current task)
    pub id: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Setting key, e.g. defaults.priority
    pub key: String,
    /// New value (omit to print the current one)
    pub value: Option<String>,
}
