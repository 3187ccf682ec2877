//! Scheduler loop: hosts the engine on the event loop, wakes at the next
//! display deadline or whenever a request mutates the engine.

use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tokio::time::{Duration, Instant};

use nudge_core::{Clock, DisplayEvent, EngineConfig, NotificationEngine};

use crate::cli::DaemonOpts;
use crate::server;

/// Monotonic clock: milliseconds since daemon start on the tokio timer.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Timer instant corresponding to an engine timestamp.
    pub fn instant_at(&self, ms: u64) -> Instant {
        self.origin + Duration::from_millis(ms)
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Shared daemon state protected by a mutex.
pub struct DaemonState {
    pub engine: NotificationEngine,
    pub clock: TokioClock,
}

impl DaemonState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: NotificationEngine::new(config),
            clock: TokioClock::start(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

/// Run the daemon: starts scheduler and UDS server, waits for shutdown signal.
pub async fn run_daemon(opts: DaemonOpts, socket_path: &str) -> anyhow::Result<()> {
    let config = opts.engine_config();
    tracing::info!(
        capacity = config.pending_capacity,
        min_dwell_ms = config.min_dwell_ms,
        "engine configured"
    );

    let (listener, socket) = server::bind_socket(socket_path).await?;

    let state = Arc::new(Mutex::new(DaemonState::new(config)));
    let wake = Arc::new(Notify::new());

    let server_state = Arc::clone(&state);
    let server_wake = Arc::clone(&wake);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, server_state, server_wake).await {
            tracing::error!("UDS server error: {e}");
        }
    });

    let scheduler_state = Arc::clone(&state);
    let scheduler_wake = Arc::clone(&wake);
    let scheduler_handle = tokio::spawn(async move {
        run_scheduler(scheduler_state, scheduler_wake).await;
    });

    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                        _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
                    }
                }
                Err(e) => {
                    tracing::warn!("cannot register SIGTERM handler: {e}");
                    ctrl_c.await.ok();
                    tracing::info!("received ctrl-c, shutting down");
                }
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
            tracing::info!("received ctrl-c, shutting down");
        }
    };

    tokio::select! {
        () = shutdown => {}
        _ = scheduler_handle => {
            tracing::warn!("scheduler exited unexpectedly");
        }
        _ = server_handle => {
            tracing::warn!("server exited unexpectedly");
        }
    }

    match socket.remove() {
        Ok(true) => tracing::debug!("removed socket {socket_path}"),
        Ok(false) => tracing::warn!("socket {socket_path} is no longer ours, leaving it"),
        Err(e) => tracing::warn!("cannot remove socket {socket_path}: {e}"),
    }
    tracing::info!("daemon stopped");
    Ok(())
}

/// Sleep until the earliest display deadline (or a wake-up), then tick.
pub(crate) async fn run_scheduler(state: Arc<Mutex<DaemonState>>, wake: Arc<Notify>) {
    loop {
        let deadline = {
            let st = state.lock().await;
            st.engine
                .next_deadline_ms()
                .map(|ms| st.clock.instant_at(ms))
        };

        match deadline {
            Some(at) => {
                tokio::select! {
                    () = tokio::time::sleep_until(at) => {}
                    () = wake.notified() => {}
                }
            }
            None => wake.notified().await,
        }

        let mut st = state.lock().await;
        let now = st.now_ms();
        let events = st.engine.tick(now);
        log_events(&events);
    }
}

/// Emit one log line per display transition.
pub(crate) fn log_events(events: &[DisplayEvent]) {
    for event in events {
        match event {
            DisplayEvent::Shown(n) => tracing::info!(
                id = %n.id,
                kind = %n.kind,
                priority = n.priority,
                duration_ms = n.display_duration_ms,
                "showing notification"
            ),
            DisplayEvent::MinDwellElapsed(id) => {
                tracing::debug!(id = %id, "minimum dwell elapsed");
            }
            DisplayEvent::Expired(n) => tracing::info!(id = %n.id, "notification expired"),
        }
    }
}
