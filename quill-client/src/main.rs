//! quill - terminal client
//!
//! ```sh
//! # Open the editor on the bundled fixture
//! cargo run -p quill-client -- --path /post/quill-demo.example/7
//!
//! # Log intents, except chat typing, to a file
//! cargo run -p quill-client -- --log-file quill.log --skip-intents 'HappychatMessageSet'
//! ```

use std::cell::RefCell;
use std::fs::{self, File};
use std::io;
use std::rc::Rc;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use quill::{EffectRuntime, EffectStoreWithMiddleware, IntentFilter, IntentLoggerMiddleware};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quill_client::action::Intent;
use quill_client::app::{RouteWatcher, Services, Ui};
use quill_client::backend::{Backend, FixtureBackend};
use quill_client::boot::{boot, Bootstrap};
use quill_client::config::{Args, Config};
use quill_client::reducer::reducer;
use quill_client::sections::registry;
use quill_client::state::AppState;

/// Intents kept in the logger's ring buffer
const INTENT_HISTORY: usize = 200;

fn init_logging(args: &Args) -> io::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let default = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = match &args.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| fail(e)),
        None => Config::default(),
    };
    let features = config.resolve_features(&args);
    info!(env = %config.env, ?features, "Starting");

    let backend = match &args.fixture {
        Some(path) => FixtureBackend::load(path),
        None => FixtureBackend::bundled(),
    }
    .unwrap_or_else(|e| fail(e));

    let locale_strings = match &args.locale_strings {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };
    let bootstrap = Bootstrap {
        locale_strings,
        current_user: backend.current_user(),
        sites: backend.sites(),
        has_touch: false,
        default_locale: config.default_locale.clone(),
    };

    let logger = IntentLoggerMiddleware::new(IntentFilter::parse(
        args.log_intents.as_deref(),
        args.skip_intents.as_deref(),
    ))
    .with_history(INTENT_HISTORY);
    let mut store =
        EffectStoreWithMiddleware::new(AppState::new(features.clone()), reducer, logger);
    let mut watcher = RouteWatcher::default();
    store.subscribe(move |state: &AppState| {
        if let Some(route) = watcher.observe(state) {
            info!(route, "Route changed");
        }
    });
    let mut runtime = EffectRuntime::from_store(store);

    let sections = Rc::new(registry().unwrap_or_else(|e| fail(e)));
    let router = boot(bootstrap, &features, sections, runtime.store_mut())
        .unwrap_or_else(|e| fail(e));
    runtime.enqueue(Intent::Navigate(args.path.clone()));

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let ui = RefCell::new(Ui::new(config.keymap()));
    let mut services = Services::new(router, Box::new(backend));
    let result = runtime
        .run(
            &mut terminal,
            |frame, area, state| ui.borrow_mut().render(frame, area, state),
            |event, state| ui.borrow_mut().map_event(event, state),
            |intent| matches!(intent, Intent::Quit),
            |effect, ctx| services.handle_effect(effect, ctx),
        )
        .await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(%e, "Terminal loop failed");
    }
    result
}
