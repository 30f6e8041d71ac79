//! Focus Timer - A Pomodoro timer daemon
//!
//! This is the main entry point for the focus-timer application.

use std::{future::IntoFuture, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use focus_timer::{
    api::create_router,
    config::Config,
    sound::{check_player_available, SoundDispatcher},
    state::{load_settings, AppState},
    tasks::ticker_task,
    timer::{TimerEngine, TimerSettings},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, sounds={}, player={}",
          config.host, config.port, config.sounds_dir.display(), config.player);

    // Sound is best effort, a missing player only disables the cue
    if let Err(e) = check_player_available(&config.player).await {
        warn!("{}", e);
    }

    let settings = match &config.settings {
        Some(path) => load_settings(path),
        None => TimerSettings::default(),
    };
    info!("Timer settings: work={}min, break={}min, long break={}min every {} sessions",
          settings.work_duration, settings.break_duration,
          settings.long_break_duration, settings.sessions_before_long_break);

    // Create application state
    let sound = SoundDispatcher::new(Arc::new(config.player()));
    let state = Arc::new(AppState::new(
        TimerEngine::new(settings),
        sound,
        config.port,
        config.host.clone(),
        config.settings.clone(),
    ));

    // Start the ticker background task
    tokio::spawn(ticker_task(Arc::downgrade(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start          - Start or resume the timer");
    info!("  POST /pause          - Pause the timer");
    info!("  POST /reset          - Reset the current mode");
    info!("  POST /mode/:mode     - Switch to focus, shortbreak, longbreak or infinite");
    info!("  GET  /status         - Current timer state");
    info!("  GET  /settings       - Current settings");
    info!("  PUT  /settings       - Replace settings");
    info!("  POST /sound/preview  - Play the selected sound once");
    info!("  POST /sound/stop     - Stop any playing sound");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app).into_future();

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.sound.cancel();
    info!("Server shutdown complete");
    Ok(())
}
