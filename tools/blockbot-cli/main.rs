use blockbot::prelude::*;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Compile block programs and send them to robots
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the block definitions for a robot model
    Schema {
        #[arg(short, long)]
        model: String,
        /// Catalog JSON for the model; empty categories get placeholder options
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print the block palette, optionally extended for a robot model
    Toolbox {
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Compile a workspace and print the resulting action list
    Compile {
        #[arg(short, long)]
        model: String,
        #[arg(short, long, default_value = "")]
        serial: String,
        /// Saved workspace JSON; defaults to the model's stored program
        workspace: Option<PathBuf>,
        /// Also print the generated program listing
        #[arg(long)]
        emit: bool,
    },
    /// Compile a workspace and send it to a robot through the relay
    Run {
        #[arg(short, long)]
        model: String,
        #[arg(short, long)]
        serial: String,
        /// Saved workspace JSON; defaults to the model's stored program
        workspace: Option<PathBuf>,
        /// Store the workspace as the model's program before sending
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\nError: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Schema { model, catalog } => {
            let catalog = match catalog {
                Some(path) => Catalog::from_json(&fs::read_to_string(&path)?)?,
                None => Catalog::default(),
            };
            let schema = build_schema(&model, &catalog);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Toolbox { model } => {
            let toolbox = match model {
                Some(model) => toolbox_for_model(&model),
                None => default_toolbox(),
            };
            println!("{}", serde_json::to_string_pretty(&toolbox)?);
        }
        Command::Compile {
            model,
            serial,
            workspace,
            emit,
        } => {
            let session = open_session(&settings, &model, &serial, workspace)?;
            let start = Instant::now();
            let Some(program) = session.program() else {
                return Ok(ExitCode::FAILURE);
            };
            if emit {
                print!("{}", program);
            }
            let result = Executor::new(settings.executor.max_actions).run(&program);
            println!("{}", serde_json::to_string_pretty(&result)?);
            println!("Compiled in {:?}", start.elapsed());
            if !result.success {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Run {
            model,
            serial,
            workspace,
            save,
        } => {
            let mut session = open_session(&settings, &model, &serial, workspace)?;
            if save {
                session.save()?;
            }
            let dispatcher = Dispatcher::new(HttpRelay::from_settings(&settings.relay)?);
            let outcome = session.run(&dispatcher).await;
            println!("{}", outcome.message());
            if !outcome.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Opens a session for the robot, loading the workspace from `path` or, when
/// no path is given, from the model's stored program. Nothing is written to
/// the store here.
fn open_session(
    settings: &Settings,
    model: &str,
    serial: &str,
    path: Option<PathBuf>,
) -> Result<Session<FileStore>> {
    let store = FileStore::new(&settings.storage.directory);
    let mut session = Session::new(settings.clone(), store);
    session.select_robot(model, serial);

    match path {
        Some(path) => {
            let document = WorkspaceDocument::from_json(&fs::read_to_string(&path)?)?;
            session.workspace_mut().load(document);
        }
        None => {
            if !session.restore()? {
                println!("No stored program for model '{}'.", model);
            }
        }
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_a_workspace_file_leaves_the_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.storage.directory = dir.path().join("programs").display().to_string();

        let mut store = FileStore::new(&settings.storage.directory);
        store.set("program.alpha", r#"{"kept": true}"#.to_string()).unwrap();

        let file = dir.path().join("workspace.json");
        fs::write(&file, r#"{"blocks": {"blocks": [{"type": "alpha.action", "fields": {"ACTION": "wave"}}]}}"#)
            .unwrap();

        let session = open_session(&settings, "alpha", "R-001", Some(file)).unwrap();
        assert_eq!(session.workspace().top_blocks().len(), 1);
        assert_eq!(
            store.get("program.alpha").unwrap().as_deref(),
            Some(r#"{"kept": true}"#)
        );
    }
}
