//! Line-oriented terminal front end.
//!
//! # Responsibility
//! - Act as a presentation surface: print rows and notifications.
//! - Translate typed commands into view actions addressed by row id.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use taskboard_core::db::open_db;
use taskboard_core::{
    init_logging_from_config, CoreConfig, PresentationSurface, SqliteStorage, TaskRow,
    TaskService, TaskStore, TaskView, ViewAction,
};

const HELP: &str = "commands: add <text> | done <n> | rm <n> | list | help | quit";

/// Terminal rendering of the task list.
#[derive(Default)]
struct TerminalSurface {
    rows: Vec<TaskRow>,
}

impl TerminalSurface {
    fn print_rows(&self) {
        if self.rows.is_empty() {
            println!("  (no tasks)");
        }
        for (index, row) in self.rows.iter().enumerate() {
            let mark = if row.completed { "x" } else { " " };
            println!(
                "  {:>2}. [{mark}] {}  ({} | {})",
                index + 1,
                row.text,
                row.toggle_label,
                row.delete_label
            );
        }
    }
}

impl PresentationSurface for TerminalSurface {
    fn clear_rows(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: &TaskRow) {
        self.rows.push(row.clone());
    }

    fn notify(&mut self, message: &str) {
        println!("! {message}");
    }

    fn clear_input(&mut self) {}
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Action(ViewAction),
    List,
    Help,
    Quit,
}

fn parse_command(line: &str, rows: &[TaskRow]) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    match verb {
        "add" => Ok(Command::Action(ViewAction::SubmitNewTask(rest.to_string()))),
        "done" => row_id(rest, rows).map(|id| Command::Action(ViewAction::ToggleTask(id))),
        "rm" => row_id(rest, rows).map(|id| Command::Action(ViewAction::DeleteTask(id))),
        "list" | "" => Ok(Command::List),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command `{other}`")),
    }
}

fn row_id(raw: &str, rows: &[TaskRow]) -> Result<taskboard_core::TaskId, String> {
    let index: usize = raw
        .trim()
        .parse()
        .map_err(|_| format!("expected a row number, got `{}`", raw.trim()))?;
    index
        .checked_sub(1)
        .and_then(|i| rows.get(i))
        .map(|row| row.id.clone())
        .ok_or_else(|| format!("no row {index}"))
}

fn main() -> ExitCode {
    let config = CoreConfig::from_env();
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("cannot open `{}`: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let store = TaskStore::new(SqliteStorage::new(&conn), config.storage_key.as_str());
    let mut view = TaskView::new(TaskService::new(store), TerminalSurface::default());

    println!("taskboard {}", taskboard_core::core_version());
    println!("{HELP}");
    view.load();
    view.surface().print_rows();

    let stdin = io::stdin();
    loop {
        print!("> ");
        if let Err(err) = io::stdout().flush() {
            eprintln!("write failed: {err}");
            return ExitCode::FAILURE;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("read failed: {err}");
                return ExitCode::FAILURE;
            }
        }

        match parse_command(&line, &view.surface().rows) {
            Ok(Command::Action(action)) => {
                view.handle(action);
                view.surface().print_rows();
            }
            Ok(Command::List) => view.surface().print_rows(),
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Err(message) => println!("! {message}"),
        }
    }

    ExitCode::SUCCESS
}
