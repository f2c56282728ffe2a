//! crosswin demo
//!
//! Opens one window configured from `~/.config/crosswin/config.toml` and
//! logs every event until the window is closed.

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, reload, util::SubscriberInitExt};

use crosswin::config::{Config, LoggingConfig};
use crosswin::{Connection, Error, Event, EventKind};

fn main() -> Result<()> {
    // Logging comes up before the config so its messages are not lost.
    // RUST_LOG wins over the config file.
    let env_filter = std::env::var("RUST_LOG").ok();
    let initial_filter = env_filter
        .clone()
        .unwrap_or_else(|| LoggingConfig::default().filter);
    let (filter, filter_handle) = reload::Layer::new(EnvFilter::new(initial_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    if env_filter.is_none() {
        filter_handle
            .reload(EnvFilter::new(&config.logging.filter))
            .context("Failed to apply logging filter from config")?;
    }

    info!("Starting crosswin demo");

    let args: Vec<String> = std::env::args().collect();
    let display = args
        .iter()
        .position(|arg| arg == "--display" || arg == "-d")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str);

    let mut conn = match Connection::init_display(display) {
        Ok(conn) => conn,
        Err(e) => {
            error!("X11 setup failed: {}", e);
            return Err(e).context("Failed to initialize X11 connection");
        }
    };

    let window_config = &config.window;
    let id = conn.create_window(
        &window_config.title,
        window_config.size(),
        window_config.position(),
    )?;

    if let Some(min) = window_config.min_size {
        conn.set_min_size(id, min)?;
    }
    if let Some(max) = window_config.max_size {
        conn.set_max_size(id, max)?;
    }
    conn.set_window_type(id, window_config.window_type)?;
    if !window_config.bordered {
        conn.set_bordered(id, false)?;
    }
    let initial = window_config.initial_state()?;
    if !initial.is_empty() {
        conn.set_state(id, initial)?;
    }

    let mut event = Event::default();
    loop {
        match conn.wait_event(&mut event) {
            Ok(()) => {}
            Err(e @ (Error::Connection(_) | Error::Closed)) => {
                return Err(e).context("X11 connection lost");
            }
            Err(e) => {
                warn!("Failed to decode event: {}", e);
                continue;
            }
        }

        match &event.kind {
            EventKind::None => {}
            EventKind::CloseWindow => {
                info!("Close requested for window {}", id);
                break;
            }
            EventKind::StateChange { state } => {
                info!(
                    "Window state now {:?} (maximized: {})",
                    state,
                    state.is_maximized()
                );
            }
            EventKind::Resize { width, height } => {
                info!("Window resized to {}x{}", width, height);
            }
            kind => debug!("{:?}: {:?}", event.event_type(), kind),
        }
    }

    conn.destroy_window(id)?;
    conn.deinit();
    info!("crosswin demo exited");
    Ok(())
}
