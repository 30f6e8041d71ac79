//! Ticker background task

use std::{sync::Weak, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::{state::AppState, timer::TimerStatus};

/// Wall-clock length of one engine tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that drives the engine once per second while it is running.
///
/// Only a weak reference is held: once every `Arc<AppState>` is gone the
/// status channel closes and the task returns.
pub async fn ticker_task(state: Weak<AppState>) {
    info!("Starting ticker task");

    let Some(mut status_rx) = state.upgrade().map(|state| state.subscribe_status()) else {
        info!("Ticker task stopping, state already dropped");
        return;
    };

    loop {
        let status = *status_rx.borrow_and_update();

        if status != TimerStatus::Running {
            debug!("Ticker idle, timer is {}", status);
            if status_rx.changed().await.is_err() {
                break;
            }
            continue;
        }

        debug!("Timer running, starting tick interval");

        // First tick lands one full period after (re)start
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let Some(state) = state.upgrade() else {
                        info!("Ticker task stopping");
                        return;
                    };
                    if let Err(e) = state.tick() {
                        error!("Failed to tick timer: {}", e);
                    }
                }

                // Pause, reset, mode switch or completion: drop this interval
                changed = status_rx.changed() => {
                    if changed.is_err() {
                        info!("Ticker task stopping");
                        return;
                    }
                    break;
                }
            }
        }
    }

    info!("Ticker task stopping");
}
