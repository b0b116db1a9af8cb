mod commands;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use runtime::Section;
use students_client::{HttpTransport, StudentsStore, StudentsView, Submission};
use tokio::io::{AsyncBufReadExt, BufReader};

use commands::{Command, CommandError, HELP};

/// Terminal front end for the student records API
#[derive(Parser)]
#[command(name = "students-console")]
#[command(about = "Terminal front end for the student records API")]
#[command(version)]
struct Cli {
    /// GraphQL endpoint of the students server
    #[arg(long, default_value = "http://127.0.0.1:3000/students")]
    endpoint: String,

    /// Log verbosity level (-v info, -vv debug, -vvv trace); logs go to the console
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "off",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let mut cfg = HashMap::new();
    cfg.insert(
        "default".to_string(),
        Section {
            console_level: level.to_string(),
            file: String::new(),
            file_level: String::new(),
            max_backups: None,
            max_size_mb: None,
        },
    );
    runtime::logging::init_logging_from_config(&cfg, Path::new("."));
}

/// Apply one command to the view. Returns `false` when the session should end.
async fn execute(view: &mut StudentsView, command: Command) -> bool {
    match command {
        Command::List => {
            // A failed fetch is shown by the render as `Error: ...`.
            let _ = view.refresh().await;
        }
        Command::Set(field, value) => view.set_field(field, value),
        Command::Submit => match view.submit().await {
            Ok(Submission::Rejected) => {
                eprintln!("All four fields are required before submitting.");
                return true;
            }
            Ok(_) => {}
            Err(e) => eprintln!("Submit failed: {e}"),
        },
        Command::Edit(n) => match view.student_at(n) {
            Some(student) => view.edit(&student),
            None => {
                eprintln!("No student #{n} in the current list.");
                return true;
            }
        },
        Command::Delete(n) => match view.student_at(n) {
            Some(student) => {
                if let Err(e) = view.delete(&student).await {
                    eprintln!("Delete failed: {e}");
                }
            }
            None => {
                eprintln!("No student #{n} in the current list.");
                return true;
            }
        },
        Command::Cancel => view.cancel_edit(),
        Command::Help => {
            println!("{HELP}");
            return true;
        }
        Command::Quit => return false,
    }
    println!("{}\n", view.render());
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::info!(endpoint = %cli.endpoint, "students console starting");

    let transport = Arc::new(HttpTransport::new(cli.endpoint));
    let store = Arc::new(StudentsStore::new(transport));
    let mut view = StudentsView::new(store);

    execute(&mut view, Command::List).await;
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        if !execute(&mut view, command).await {
            break;
        }
    }
    Ok(())
}
