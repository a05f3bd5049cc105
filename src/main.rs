use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use log::{LevelFilter, info, warn};
use simplelog::{Config, WriteLogger};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::mpsc;
use tokio::time::sleep_until;

use svschem::app::action::Action;
use svschem::app::controller::Controller;
use svschem::app::effect::Effect;
use svschem::app::message::options_from_pairs;
use svschem::app::orchestrator::{RenderOutcome, RenderRequest, Renderer};
use svschem::app::pipeline::RenderPipeline;
use svschem::app::ports::{OptionsStore, ViewerLauncher, WorkspaceConfig};
use svschem::domain::{RenderOptions, RenderResult, RenderTarget};
use svschem::error;
use svschem::infra::adapters::{SystemViewer, TokioCommandExecutor, TomlOptionsStore};
use svschem::infra::config::FileWorkspaceConfig;
use svschem::infra::config::cache::{get_cache_dir, preview_file_name};
use svschem::ui::event::HostEvent;
use svschem::ui::event::handler::{handle_request, parse_request};
use svschem::ui::preview::render_document;

const LOG_ENV: &str = "SVSCHEM_LOG";

/// SystemVerilog schematic previews through an external SVG renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a file to SVG
    Render {
        file: PathBuf,
        /// Output file; stdout when omitted or `-`
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override a render option, e.g. `--set theme=blueprint`
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        set: Vec<(String, String)>,
        /// Treat the workspace as untrusted (nothing is executed)
        #[arg(long)]
        untrusted: bool,
    },
    /// Write an interactive HTML preview and open it
    Preview {
        file: PathBuf,
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        set: Vec<(String, String)>,
        /// Only print the document path
        #[arg(long)]
        no_open: bool,
    },
    /// Serve an editor over JSON lines on stdin/stdout
    Serve,
    /// Show or reset the options saved for a workspace
    Options {
        workspace: PathBuf,
        #[arg(long)]
        reset: bool,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, _)) if key.trim().is_empty() => Err(format!("missing key in '{}'", s)),
        Some((key, value)) => Ok((key.trim().to_string(), value.trim().to_string())),
        // A bare key switches a flag on
        None if !s.trim().is_empty() => Ok((s.trim().to_string(), "true".to_string())),
        None => Err("expected KEY=VALUE".to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    error::install_hooks()?;

    let args = Args::parse();
    init_logging()?;

    match args.command {
        Command::Render {
            file,
            output,
            set,
            untrusted,
        } => render(&file, output.as_deref(), &set, !untrusted).await,
        Command::Preview { file, set, no_open } => preview(&file, &set, no_open).await,
        Command::Serve => serve().await,
        Command::Options { workspace, reset } => options(&workspace, reset),
    }
}

fn init_logging() -> Result<()> {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    let log_path = get_cache_dir()?.join("svschem.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("Could not open log file {}", log_path.display()))?;
    WriteLogger::init(level, Config::default(), log_file)?;

    info!("svschem {} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn new_renderer() -> Renderer {
    Renderer::new(RenderPipeline::new(Arc::new(TokioCommandExecutor::new())))
}

/// Persisted options for the file's workspace with `--set` overrides applied.
fn request_for(file: &Path, set: &[(String, String)], trusted: bool) -> Result<RenderRequest> {
    let file = std::path::absolute(file)?;
    let config = FileWorkspaceConfig::new();
    let workspace = config.workspace_root(&file);
    let settings = config.load_settings(&workspace)?;

    let store = TomlOptionsStore::new()?;
    let saved = store.load(&workspace).unwrap_or_else(|e| {
        warn!("ignoring saved options: {}", e);
        None
    });
    let options = options_from_pairs(
        saved.unwrap_or_default(),
        set.iter().map(|(key, value)| (key.as_str(), value.as_str())),
    );

    Ok(RenderRequest {
        settings,
        options,
        target: Some(RenderTarget::File(file)),
        trusted,
    })
}

async fn render(
    file: &Path,
    output: Option<&Path>,
    set: &[(String, String)],
    trusted: bool,
) -> Result<()> {
    let request = request_for(file, set, trusted)?;

    let svg = match new_renderer().render(&request).await {
        RenderOutcome::Rendered(RenderResult::Success { svg }) => svg,
        RenderOutcome::Rendered(RenderResult::Failure(failure)) => return Err(failure.into()),
        RenderOutcome::Skipped(notice) => return Err(eyre!("{}", notice)),
    };

    match output.filter(|path| *path != Path::new("-")) {
        Some(path) => {
            fs::write(path, &svg)
                .wrap_err_with(|| format!("Could not write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(svg.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

async fn preview(file: &Path, set: &[(String, String)], no_open: bool) -> Result<()> {
    let request = request_for(file, set, true)?;
    let outcome = new_renderer().render(&request).await;

    let document = render_document(&outcome, &request.options, file);
    let document_path = get_cache_dir()?.join(preview_file_name(file));
    fs::write(&document_path, document)
        .wrap_err_with(|| format!("Could not write {}", document_path.display()))?;

    writeln!(std::io::stdout().lock(), "{}", document_path.display())?;
    if !no_open {
        SystemViewer::new().open_file(&document_path)?;
    }
    Ok(())
}

fn options(workspace: &Path, reset: bool) -> Result<()> {
    let workspace = std::path::absolute(workspace)?;
    let store = TomlOptionsStore::new()?;

    if reset {
        store.save(&workspace, &RenderOptions::default())?;
        info!("reset options for {}", workspace.display());
    }

    let options = store.load(&workspace)?.unwrap_or_default();
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&options)?)?;
    writeln!(stdout, "# stored in {}", store.storage_path().display())?;
    Ok(())
}

async fn serve() -> Result<()> {
    let config: Arc<dyn WorkspaceConfig> = Arc::new(FileWorkspaceConfig::new());
    let store: Arc<dyn OptionsStore> = Arc::new(TomlOptionsStore::new()?);
    let renderer = Arc::new(new_renderer());
    let mut controller = Controller::new(config, store);

    let (action_tx, mut action_rx) = mpsc::channel::<Action>(256);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("serving on stdin/stdout");

    loop {
        let deadline = controller.next_deadline();

        let action = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => match parse_request(&line) {
                    Ok(request) => handle_request(request),
                    Err(e) => {
                        warn!("invalid request: {}", e);
                        let notice = HostEvent::Notice {
                            path: None,
                            message: format!("Invalid request: {}", e),
                        };
                        emit(&mut stdout, &notice).await?;
                        continue;
                    }
                },
                // Editor went away
                None => Action::Quit,
            },
            Some(action) = action_rx.recv() => action,
            // Debounce deadline reached
            () = async {
                match deadline {
                    Some(d) => sleep_until(d.into()).await,
                    None => std::future::pending::<()>().await,
                }
            } => Action::DebounceElapsed,
        };

        let effects = controller.handle(action, Instant::now());
        if run_effects(effects, &renderer, &action_tx, &mut stdout).await? {
            break;
        }
    }

    info!("shutting down");
    Ok(())
}

/// Returns `true` once the loop should exit.
async fn run_effects(
    effects: Vec<Effect>,
    renderer: &Arc<Renderer>,
    action_tx: &mpsc::Sender<Action>,
    stdout: &mut Stdout,
) -> Result<bool> {
    for effect in effects {
        match effect {
            Effect::Render(ticket) => {
                let renderer = Arc::clone(renderer);
                let tx = action_tx.clone();
                tokio::spawn(async move {
                    let outcome = renderer.render(&ticket.request).await;
                    let _ = tx
                        .send(Action::RenderFinished {
                            path: ticket.path,
                            generation: ticket.generation,
                            outcome,
                        })
                        .await;
                });
            }
            Effect::ShowDocument {
                path,
                generation,
                outcome,
                options,
            } => {
                let event = HostEvent::document(&path, generation, &outcome, &options);
                emit(stdout, &event).await?;
            }
            Effect::Notify { path, message } => {
                emit(stdout, &HostEvent::Notice { path, message }).await?;
            }
            Effect::Exit => return Ok(true),
        }
    }
    Ok(false)
}

async fn emit(stdout: &mut Stdout, event: &HostEvent) -> Result<()> {
    let mut line = event.to_line()?;
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
