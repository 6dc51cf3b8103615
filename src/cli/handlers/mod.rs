mod init;
pub use init::cmd_init;

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io::{self, BOARD_DIR};
use crate::io::config_io;
use crate::io::lock::BoardLock;
use crate::model::board::Board;
use crate::model::task::TaskPatch;
use crate::ops::calendar::calendar;
use crate::ops::task_ops::{self, NewTask};
use crate::sched::{ScheduleError, Scheduler};

type CmdResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let start = match cli.board_dir {
        Some(ref dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init(args) => cmd_init(args, &start),

        // Read commands
        Commands::List => cmd_list(&start, json),
        Commands::Next => cmd_next(&start, json),
        Commands::Show(args) => cmd_show(args, &start, json),
        Commands::Cal => cmd_cal(&start, json),

        // Write commands
        Commands::Add(args) => cmd_add(args, &start, json),
        Commands::Edit(args) => cmd_edit(args, &start, json),
        Commands::Rm(args) => cmd_rm(args, &start, json),
        Commands::Done(args) => cmd_done(args, &start, json),

        Commands::Config(args) => cmd_config(args, &start, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_board_from(start: &Path) -> Result<Board, board_io::BoardError> {
    let root = board_io::discover_board(start)?;
    board_io::load_board(&root)
}

/// Run a mutation under the board lock: load, hand the scheduler to `f`,
/// and save the task set if `f` succeeds.
fn with_scheduler<T>(
    start: &Path,
    f: impl FnOnce(&mut Scheduler, &Board) -> Result<T, Box<dyn Error>>,
) -> Result<T, Box<dyn Error>> {
    let root = board_io::discover_board(start)?;
    let _lock = BoardLock::acquire_default(&root.join(BOARD_DIR))?;
    let mut board = board_io::load_board(&root)?;
    let mut scheduler = Scheduler::new(std::mem::take(&mut board.tasks));
    let out = f(&mut scheduler, &board)?;
    board_io::save_tasks(&board.board_dir, scheduler.tasks())?;
    Ok(out)
}

fn position_of(scheduler: &Scheduler, id: &str) -> Option<usize> {
    scheduler.ordered().position(|t| t.id == id).map(|i| i + 1)
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(start: &Path, json: bool) -> CmdResult {
    let board = load_board_from(start)?;
    let scheduler = Scheduler::new(board.tasks);
    if json {
        return print_json(&queue_to_json(scheduler.ordered()));
    }
    for line in format_queue_listing(scheduler.ordered(), &board.config.display) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_next(start: &Path, json: bool) -> CmdResult {
    let board = load_board_from(start)?;
    let scheduler = Scheduler::new(board.tasks);
    match scheduler.peek_current() {
        Ok(task) if json => print_json(&task_to_json(task)),
        Ok(task) => {
            for line in format_task_detail(task, &board.config.display) {
                println!("{}", line);
            }
            Ok(())
        }
        Err(ScheduleError::EmptyQueue) if json => print_json(&serde_json::Value::Null),
        Err(ScheduleError::EmptyQueue) => {
            println!("No tasks scheduled.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_show(args: ShowArgs, start: &Path, json: bool) -> CmdResult {
    let board = load_board_from(start)?;
    let scheduler = Scheduler::new(board.tasks);
    let task = scheduler
        .find(&args.id)
        .ok_or_else(|| ScheduleError::NotFound(args.id.clone()))?;
    if json {
        return print_json(&task_to_json(task));
    }
    for line in format_task_detail(task, &board.config.display) {
        println!("{}", line);
    }
    if let Some(pos) = position_of(&scheduler, &task.id) {
        println!("position: {} of {}", pos, scheduler.queue().len());
    }
    Ok(())
}

fn cmd_cal(start: &Path, json: bool) -> CmdResult {
    let board = load_board_from(start)?;
    let days = calendar(&board.tasks);
    if json {
        return print_json(&calendar_to_json(&days));
    }
    for line in format_calendar(&days) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, start: &Path, json: bool) -> CmdResult {
    let fields = NewTask {
        title: args.title,
        description: args.description,
        due: args.due.as_deref().map(task_ops::parse_due_arg).transpose()?,
        priority: args
            .priority
            .as_deref()
            .map(task_ops::parse_priority_arg)
            .transpose()?,
    };

    let (task, position) = with_scheduler(start, |scheduler, board| {
        let task = task_ops::new_task(
            scheduler.tasks(),
            &board.config.ids.prefix,
            fields,
            board.config.defaults.priority(),
        )?;
        scheduler.add(task.clone());
        let position = position_of(scheduler, &task.id);
        Ok((task, position))
    })?;

    if json {
        return print_json(&task_to_json(&task));
    }
    match position {
        Some(pos) => println!("{} (position {})", task.id, pos),
        None => println!("{}", task.id),
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, start: &Path, json: bool) -> CmdResult {
    let patch = TaskPatch {
        title: args.title,
        description: if args.clear_desc {
            Some(None)
        } else {
            args.description.map(Some)
        },
        due: if args.no_due {
            Some(None)
        } else {
            args.due
                .as_deref()
                .map(task_ops::parse_due_arg)
                .transpose()?
                .map(Some)
        },
        priority: args
            .priority
            .as_deref()
            .map(task_ops::parse_priority_arg)
            .transpose()?,
    };
    let patch = task_ops::clean_patch(patch)?;

    let task = with_scheduler(start, |scheduler, _| {
        Ok(scheduler.edit(&args.id, patch)?.clone())
    })?;

    if json {
        return print_json(&task_to_json(&task));
    }
    println!("Updated {}", task.id);
    Ok(())
}

fn cmd_rm(args: RmArgs, start: &Path, json: bool) -> CmdResult {
    let task = with_scheduler(start, |scheduler, _| Ok(scheduler.delete(&args.id)?))?;
    if json {
        return print_json(&task_to_json(&task));
    }
    println!("Deleted {} \"{}\"", task.id, task.title);
    Ok(())
}

fn cmd_done(args: DoneArgs, start: &Path, json: bool) -> CmdResult {
    let (done, next) = with_scheduler(start, |scheduler, _| {
        let done = scheduler.complete(&args.id)?;
        Ok((done, scheduler.peek_current().ok().cloned()))
    })?;

    if json {
        return print_json(&serde_json::json!({
            "completed": task_to_json(&done),
            "next": next.as_ref().map(task_to_json),
        }));
    }
    println!("Completed {} \"{}\"", done.id, done.title);
    match next {
        Some(task) => println!("Next: {} \"{}\"", task.id, task.title),
        None => println!("Queue is empty."),
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, start: &Path, json: bool) -> CmdResult {
    let root: PathBuf = board_io::discover_board(start)?;
    let board_dir = root.join(BOARD_DIR);

    let value = match args.value {
        None => {
            let (config, _) = config_io::read_config(&board_dir)?;
            config_io::get_value(&config, &args.key)?
        }
        Some(raw) => {
            let _lock = BoardLock::acquire_default(&board_dir)?;
            let (_, mut doc) = config_io::read_config(&board_dir)?;
            config_io::set_value(&mut doc, &args.key, &raw)?;
            config_io::write_config(&board_dir, &doc)?;
            // Re-read so the printed value is what a later load will see
            let (config, _) = config_io::read_config(&board_dir)?;
            log::info!("set {} = {}", args.key, raw);
            config_io::get_value(&config, &args.key)?
        }
    };

    if json {
        return print_json(&ConfigValueJson {
            key: &args.key,
            value,
        });
    }
    println!("{}", value);
    Ok(())
}
