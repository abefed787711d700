use std::{io::Write, path::PathBuf, process::Command, sync::Mutex};

use breakpoints::{BreakpointWidget, Locale, NavigationRequest};
use clap::Parser;
use color_eyre::eyre::{self, Context};
use config::{ConfigProvider, FileConfig};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use tracing_subscriber::EnvFilter;

mod app;
mod surface;

use surface::TerminalSurface;

/// Browse saved breakpoints and jump to one of them.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Configuration file holding the saved breakpoints
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Language for labels, e.g. "fr" or "de_DE.UTF-8"
    #[clap(short, long)]
    locale: Option<String>,

    /// Open the chosen breakpoint in $EDITOR instead of printing it
    #[clap(long)]
    open: bool,

    /// Where to write logs
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn log_path(args: &Args) -> PathBuf {
    args.log_file.clone().unwrap_or_else(|| {
        dirs::cache_dir()
            .map(|dir| dir.join("bplist"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bplist.log")
    })
}

/// The command line wins, then the configuration file, then the environment.
fn resolve_locale(args: &Args, config: &impl ConfigProvider) -> Locale {
    args.locale
        .clone()
        .or_else(|| config.get("ui", "locale", None::<String>))
        .or_else(|| std::env::var("LC_ALL").ok().filter(|v| !v.is_empty()))
        .or_else(|| std::env::var("LANG").ok().filter(|v| !v.is_empty()))
        .map(|tag| Locale::from_tag(&tag))
        .unwrap_or_default()
}

fn open_in_editor(request: &NavigationRequest) -> eyre::Result<()> {
    let editor = std::env::var("EDITOR").wrap_err("EDITOR is not set")?;
    tracing::debug!(%editor, path = %request.path.display(), line = request.line, "opening editor");
    let status = Command::new(&editor)
        .arg(format!("+{}", request.line))
        .arg(&request.path)
        .status()
        .wrap_err_with(|| format!("running editor {editor}"))?;
    eyre::ensure!(status.success(), "editor exited with {status}");
    Ok(())
}

/// Failing to change mouse capture only loses mouse input, so it is logged
/// rather than returned.
fn set_mouse_capture(out: &mut impl Write, enabled: bool) {
    let result = if enabled {
        crossterm::execute!(out, EnableMouseCapture)
    } else {
        crossterm::execute!(out, DisableMouseCapture)
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, enabled, "changing mouse capture");
    }
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let log_path = log_path(&args);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).wrap_err("creating log directory")?;
    }
    let log_file = std::fs::File::create(&log_path)
        .wrap_err_with(|| format!("creating log file {}", log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(log_file))
        .init();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => FileConfig::default_path()
            .ok_or_else(|| eyre::eyre!("could not determine configuration directory"))?,
    };
    let config = FileConfig::load(&config_path).wrap_err("loading configuration")?;
    let locale = resolve_locale(&args, &config);
    tracing::debug!(config = %config_path.display(), ?locale, "starting");

    let widget = BreakpointWidget::with_locale(config, TerminalSurface::default(), locale);

    let terminal = ratatui::init();
    set_mouse_capture(&mut std::io::stdout(), true);
    let result = app::App::new(widget).run(terminal);
    set_mouse_capture(&mut std::io::stdout(), false);
    ratatui::restore();

    match result.wrap_err("running breakpoint list")? {
        Some(request) if args.open => open_in_editor(&request)?,
        Some(request) => println!("{}:{}", request.path.display(), request.line),
        None => {}
    }
    Ok(())
}
