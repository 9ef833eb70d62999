use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use expense_tracker::config::Config;
use expense_tracker::ui::{app::App, render};
use expense_tracker::utils::logging::init_tracing;

const USAGE: &str = "Usage: expense-tracker [--config <path>]";

fn parse_args() -> Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args
                    .next()
                    .with_context(|| format!("--config needs a path\n{USAGE}"))?;
                config_path = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("Unknown argument: {other}\n{USAGE}"),
        }
    }

    Ok(config_path)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| render::draw(f, &app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    let config_path = Config::resolve_path(parse_args()?);
    let config = match &config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let log_file = config.resolve_log_file();
    if let Err(err) = init_tracing(&log_file) {
        eprintln!("warning: logging disabled, cannot open {}: {err}", log_file.display());
    }
    info!(theme = config.theme.as_str(), "starting expense tracker");

    // First run: leave an editable config file behind.
    if let Some(path) = config_path.filter(|path| !path.exists()) {
        match config.save(&path) {
            Ok(()) => info!(path = %path.display(), "wrote default config"),
            Err(err) => warn!(path = %path.display(), error = %err, "could not write config"),
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(config);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal loop failed");
        println!("{err:?}");
    }

    info!("bye");
    Ok(())
}
