use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cadastro::{
    cli::{run_command, Cli},
    config::Config,
    reference::HttpReferenceService,
    tui::App,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "cadastro=info");
    }

    let config = Config::from_env()?;
    config.validate()?;
    init_logging(&config.log_file, cli.cli);

    info!("Starting cadastro");

    let service = HttpReferenceService::from_config(&config)
        .context("Failed to build the HTTP client")?;

    // CLI mode: print output and exit without the TUI
    if cli.cli {
        let Some(command) = cli.command else {
            eprintln!("Error: CLI mode requires a command (states, cities <UF> or cep <CODE>)");
            std::process::exit(1);
        };
        if let Err(e) = run_command(&command, &service, &mut io::stdout()).await {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, Arc::new(service));
    if let Some(command) = cli.command {
        app.apply_startup(command.startup_action());
    }

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => {
            info!("cadastro exited with {} records", app.manager.records().len());
            Ok(())
        }
        Err(e) => {
            error!("cadastro encountered an error: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Log to the configured file, and to stderr as well in CLI mode
fn init_logging(log_file: &Path, to_stderr: bool) {
    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "cadastro.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}
