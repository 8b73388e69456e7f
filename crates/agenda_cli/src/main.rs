//! Command-line front end for the contact agenda.
//!
//! # Responsibility
//! - Map a closed set of subcommands onto core use-cases.
//! - Render records and outcomes; the core holds no presentation state.

mod config;

use agenda_core::db::open_db;
use agenda_core::{
    core_version, export_csv_file, import_csv_file, init_logging, ping, AgendaService,
    ImportError, Record, SqliteRecordRepository, WriteOutcome, DEFAULT_EXPORT_FILE,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{AgendaConfig, GlobalArgs};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "agenda", author, version, about = "Local contact agenda", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Check core linkage.
    Ping,
    #[command(flatten)]
    Storage(StorageCmd),
}

/// Subcommands that open the agenda database.
#[derive(Subcommand)]
enum StorageCmd {
    /// Add a contact.
    Add { name: String, number: String },
    /// List every contact.
    List {
        /// Print records as a JSON array of {id, name, number}.
        #[arg(long)]
        json: bool,
    },
    /// Replace name and number of a contact.
    Update {
        id: String,
        name: String,
        number: String,
    },
    /// Remove one contact.
    Remove { id: String },
    /// Remove every contact.
    RemoveAll,
    /// Import contacts from a CSV file with NOMBRE,TELEFONO headers.
    Import { file: PathBuf },
    /// Export every contact to CSV, overwriting the target.
    Export {
        #[arg(long, short, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("{}", render_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let config = AgendaConfig::resolve(cli.global, &cwd);

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }

    match cli.cmd {
        Cmd::Ping => {
            println!("agenda_core ping={}", ping());
            println!("agenda_core version={}", core_version());
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Storage(cmd) => run_with_storage(cmd, &config),
    }
}

fn run_with_storage(cmd: StorageCmd, config: &AgendaConfig) -> Result<ExitCode> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let repo = SqliteRecordRepository::try_new(&conn)?;
    let service = AgendaService::new(repo);

    match cmd {
        StorageCmd::Add { name, number } => {
            let record = service.add_contact(&name, &number)?;
            println!("added {}", render(&record));
        }
        StorageCmd::List { json } => {
            let records = service.list_contacts()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("no contacts");
            } else {
                for record in &records {
                    println!("{}", render(record));
                }
            }
        }
        StorageCmd::Update { id, name, number } => {
            match service.update_contact(&id, &name, &number)? {
                WriteOutcome::Applied => println!("updated {id}"),
                WriteOutcome::NotFound(missing) => {
                    eprintln!("no contact with id {missing}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        StorageCmd::Remove { id } => match service.remove_contact(&id)? {
            WriteOutcome::Applied => println!("removed {id}"),
            WriteOutcome::NotFound(missing) => {
                println!("no contact with id {missing}; nothing removed")
            }
        },
        StorageCmd::RemoveAll => {
            let report = service.remove_all()?;
            println!("removed {} contacts", report.removed);
            if !report.is_complete() {
                for (id, reason) in &report.failed {
                    eprintln!("failed to remove {id}: {reason}");
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        StorageCmd::Import { file } => match import_csv_file(&file, &service) {
            Ok(report) => {
                println!("imported {} contacts", report.inserted.len());
                for rejected in &report.rejected {
                    eprintln!("line {}: {}", rejected.line, rejected.reason);
                }
            }
            Err(err @ ImportError::Format { .. }) => {
                eprintln!("invalid format: {err}");
                return Ok(ExitCode::FAILURE);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to import `{}`", file.display()))
            }
        },
        StorageCmd::Export { output } => {
            let written = export_csv_file(&output, &service)
                .with_context(|| format!("failed to export to `{}`", output.display()))?;
            println!("exported {written} contacts to {}", output.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn render(record: &Record) -> String {
    format!("{:>4}  {:<30}  {}", record.id, record.name, record.number)
}

/// One line per failure: context first, then each distinct cause.
fn render_error(err: &anyhow::Error) -> String {
    format!("error: {err:#}")
}
