use crate::monitor::{
    AlertTransition, Clock, IngestReport, LogSource, MonitorParams, SystemClock, TrafficWindow,
    WindowSnapshot,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

const ALERT_CHANNEL_CAPACITY: usize = 64;

/// What a single polling tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// `None` when the source could not be read this tick.
    pub ingest: Option<IngestReport>,
    pub evicted: usize,
    pub transition: Option<AlertTransition>,
}

/// A window monitor together with its log source and clock.
///
/// Drive it by hand with [`tick`](TrafficMonitor::tick), or hand it to
/// [`start`](TrafficMonitor::start) to run the polling loop as a background
/// task. Starting consumes the monitor, so a window never has more than one
/// loop writing to it.
pub struct TrafficMonitor {
    params: MonitorParams,
    window: Arc<Mutex<TrafficWindow>>,
    source: Box<dyn LogSource>,
    clock: Arc<dyn Clock>,
    alerts: broadcast::Sender<AlertTransition>,
}

impl TrafficMonitor {
    pub fn new(
        params: MonitorParams,
        source: impl LogSource + 'static,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (alerts, _) = broadcast::channel(ALERT_CHANNEL_CAPACITY);

        Self {
            params,
            window: Arc::new(Mutex::new(TrafficWindow::new())),
            source: Box::new(source),
            clock,
            alerts,
        }
    }

    pub fn with_system_clock(params: MonitorParams, source: impl LogSource + 'static) -> Self {
        Self::new(params, source, Arc::new(SystemClock))
    }

    pub fn params(&self) -> &MonitorParams {
        &self.params
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlertTransition> {
        self.alerts.subscribe()
    }

    pub fn reader(&self) -> WindowReader {
        WindowReader {
            window: self.window.clone(),
            monitor_duration: self.params.monitor_duration,
        }
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        self.reader().snapshot()
    }

    /// Runs one ingest, evict, evaluate sequence.
    ///
    /// New lines are read before the window lock is taken, so snapshot
    /// readers never wait on disk I/O. The lock is then held for admitting,
    /// evicting and evaluating together. A source that cannot be read only
    /// skips ingestion: expired records are still evicted and the alert
    /// still re-evaluated.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();
        let params = self.params;

        // Only this monitor advances the marker, so it cannot move while
        // the read below runs unlocked.
        let marker = lock_window(&self.window).last_read_marker();
        let read = self.source.read_lines_after(marker);

        let mut window = lock_window(&self.window);

        let ingest = match read {
            Ok(lines) => Some(window.ingest_lines(&lines)),
            Err(err) => {
                warn!(error = %err, "log source unreadable; skipping ingestion this tick");
                None
            }
        };

        let evicted = window.drop_expired(now, params.monitor_duration);
        let transition = window.evaluate_alert(now, params.monitor_duration, params.alert_threshold);
        window.mark_read(now);

        drop(window);

        if let Some(transition) = &transition {
            log_transition(transition, params.alert_threshold);
            // No subscribers is fine.
            let _ = self.alerts.send(transition.clone());
        }

        TickReport {
            ingest,
            evicted,
            transition,
        }
    }

    /// Spawns the polling loop on the current tokio runtime.
    ///
    /// The first tick runs immediately, then one every `refresh_period`.
    pub fn start(self) -> MonitorHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let reader = self.reader();
        let alerts = self.alerts.clone();

        let join_handle = tokio::spawn(self.run(shutdown_rx));

        MonitorHandle {
            shutdown_tx,
            join_handle,
            reader,
            alerts,
        }
    }

    async fn run(mut self, mut shutdown_rx: mpsc::Receiver<()>) {
        let mut ticker = interval(self.params.refresh_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            refresh_ms = duration_ms(self.params.refresh_period),
            monitor_duration_ms = duration_ms(self.params.monitor_duration),
            alert_threshold = self.params.alert_threshold,
            "traffic monitor started"
        );

        loop {
            tokio::select! {
                biased;

                // A closed channel disables this branch, leaving the loop
                // detached until the runtime shuts down.
                Some(()) = shutdown_rx.recv() => {
                    info!("shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }

        let window = lock_window(&self.window);
        info!(
            lines_consumed = window.last_read_marker(),
            window_hits = window.total_hits(),
            alert_active = window.alert_active(),
            "traffic monitor stopped"
        );
    }
}

/// Cheap, cloneable read access to a monitor's window.
#[derive(Clone)]
pub struct WindowReader {
    window: Arc<Mutex<TrafficWindow>>,
    monitor_duration: Duration,
}

impl WindowReader {
    pub fn snapshot(&self) -> WindowSnapshot {
        lock_window(&self.window).snapshot(self.monitor_duration)
    }

    pub fn alert_active(&self) -> bool {
        lock_window(&self.window).alert_active()
    }
}

/// Handle for controlling a running polling loop.
///
/// The loop only stops through [`shutdown`](MonitorHandle::shutdown).
/// Dropping the handle detaches it; it keeps polling until the runtime
/// itself shuts down.
#[must_use = "dropping the handle detaches the loop; call `shutdown().await` to stop it"]
pub struct MonitorHandle {
    shutdown_tx: mpsc::Sender<()>,
    join_handle: JoinHandle<()>,
    reader: WindowReader,
    alerts: broadcast::Sender<AlertTransition>,
}

impl MonitorHandle {
    pub fn snapshot(&self) -> WindowSnapshot {
        self.reader.snapshot()
    }

    pub fn reader(&self) -> WindowReader {
        self.reader.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlertTransition> {
        self.alerts.subscribe()
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    /// Signals the loop to stop and waits until it has exited, so no tick
    /// is in flight once this returns.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(err) = self.join_handle.await {
            warn!(error = %err, "traffic monitor task ended abnormally");
        }
    }
}

fn lock_window(window: &Mutex<TrafficWindow>) -> MutexGuard<'_, TrafficWindow> {
    // A reader that panicked mid-snapshot cannot leave the window torn.
    window.lock().unwrap_or_else(PoisonError::into_inner)
}

fn log_transition(transition: &AlertTransition, alert_threshold: f64) {
    match transition {
        AlertTransition::Raised {
            hits,
            hits_per_minute,
            at,
        } => warn!(
            event = "alert_transition",
            state = "raised",
            hits,
            hits_per_minute,
            alert_threshold,
            at = %at,
            "high traffic alert raised"
        ),
        AlertTransition::Recovered {
            hits,
            hits_per_minute,
            at,
        } => info!(
            event = "alert_transition",
            state = "recovered",
            hits,
            hits_per_minute,
            alert_threshold,
            at = %at,
            "high traffic alert recovered"
        ),
    }
}

fn duration_ms(d: Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}
