mod app;
mod catalog;
mod cli;
mod config;
mod input;
mod model;
mod print;
mod tables;
mod ui;
mod viewport;

use anyhow::{Context, Result, bail};
use app::{App, AppCommand, TableSession};
use clap::Parser;
use cli::CliArgs;
use config::ViewerConfig;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::fs::OpenOptions;
use std::io::{self, Stdout, Write};
use std::path::Path;
use std::sync::Mutex;
use tables::{TableStore, table_display_name};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use viewport::{LayoutConfig, TerminalSize};

type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_filter, args.log_file.as_deref())?;

    let config = ViewerConfig::load(args.config.as_deref())?;
    if let Some(source) = &config.source {
        debug!("loaded config from {}", source.display());
    }
    let store = TableStore::new(config.resolve_data_dir(args.data_dir.as_deref()));
    debug!("reading tables from {}", store.data_dir().display());

    if args.list {
        return list_tables(&store);
    }
    if let Some(query) = &args.find {
        return find_sections(&store, query);
    }
    if let Some(table) = &args.table {
        return print_table(&store, table, &config.layout);
    }

    let mut app = App::new(config.layout);
    refresh_tables(&mut app, &store);
    run(&mut app, &store).await
}

fn init_tracing(level_filter: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_new(level_filter)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to initialize tracing filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    // The terminal belongs to the viewer, so logs go to a file or nowhere.
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = builder.with_writer(io::sink).try_init();
        }
    }

    Ok(())
}

fn list_tables(store: &TableStore) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for table in store.list_tables()? {
        writeln!(stdout, "{table}").context("failed to write table list")?;
    }
    Ok(())
}

fn find_sections(store: &TableStore, query: &str) -> Result<()> {
    let matches = store.find_sections(query)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Found {} sections:", matches.len()).context("failed to write results")?;
    for hit in matches {
        writeln!(stdout, "  {} (from {})", hit.section, hit.table)
            .context("failed to write results")?;
    }
    Ok(())
}

fn print_table(store: &TableStore, name: &str, layout: &LayoutConfig) -> Result<()> {
    let Some(path) = store.resolve(name) else {
        bail!("Table '{name}' not found in {}", store.data_dir().display());
    };
    let records = store.load(&path)?;
    let session = TableSession::new(table_display_name(&path), records);
    let size = TerminalSize::detect(layout);
    let mut stdout = io::stdout().lock();
    print::print_table_once(&mut stdout, &session, layout, size)
}

fn refresh_tables(app: &mut App, store: &TableStore) {
    match store.list_tables() {
        Ok(tables) => app.set_tables(tables),
        Err(error) => {
            warn!("{error:#}");
            app.set_tables_error(format!("{error:#}"));
        }
    }
}

async fn run(app: &mut App, store: &TableStore) -> Result<()> {
    let mut terminal = init_terminal()?;
    let run_result = run_loop(&mut terminal, app, store).await;
    let restore_result = restore_terminal(&mut terminal);

    match (run_result, restore_result) {
        (Err(run_error), Err(restore_error)) => Err(anyhow::anyhow!(
            "{run_error:#}\nterminal restore error: {restore_error:#}"
        )),
        (Err(error), _) => Err(error),
        (_, Err(error)) => Err(error),
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn init_terminal() -> Result<TuiTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;
    match enter_alternate_screen() {
        Ok(terminal) => {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |panic_info| {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                original_hook(panic_info);
            }));
            Ok(terminal)
        }
        Err(error) => {
            let _ = disable_raw_mode();
            Err(error)
        }
    }
}

fn enter_alternate_screen() -> Result<TuiTerminal> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().context("failed to clear terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut TuiTerminal) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

async fn run_loop(terminal: &mut TuiTerminal, app: &mut App, store: &TableStore) -> Result<()> {
    let mut reader = EventStream::new();

    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .context("failed to render terminal frame")?;

        if !app.running() {
            break;
        }

        match reader.next().await {
            Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                if let Some(action) = input::map_key(app.screen(), key) {
                    debug!("action={action:?}");
                    let command = app.apply_action(action);
                    execute_app_command(app, store, command);
                }
            }
            Some(Ok(_)) => {}
            Some(Err(error)) => {
                info!("terminal input failed, leaving viewer: {error}");
                break;
            }
            None => {
                info!("terminal event stream closed");
                break;
            }
        }
    }

    Ok(())
}

fn execute_app_command(app: &mut App, store: &TableStore, command: AppCommand) {
    match command {
        AppCommand::None => {}
        AppCommand::RefreshTables => refresh_tables(app, store),
        AppCommand::LoadTable(name) => match store.resolve(&name) {
            None => {
                debug!("table {name} not found");
                app.reject_selection(&name);
            }
            Some(path) => match store.load(&path) {
                Ok(records) => app.open_table(name, records),
                Err(error) => {
                    warn!("{error:#}");
                    app.set_load_error(&name, &error);
                }
            },
        },
    }
}
