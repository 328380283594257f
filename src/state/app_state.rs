//! Main application state management

use std::{
    ops::ControlFlow,
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use tokio::{
    sync::broadcast,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

use super::{
    BreakSession, CountdownTimer, IdleState, IdleTransition, Preferences, TimerEvent,
    TimerSnapshot,
};
use crate::{
    services::{
        autostart, status_bar::DEFAULT_SCREEN_WIDTH, AlertCommands, PointerSource,
        ReportedPointer, StatusLine, WidthMetrics,
    },
    tasks::{spawn_break_ticker, spawn_countdown_ticker, spawn_idle_poller, PeriodicTask},
};

/// Single owner of the timer, idle, break and preference state.
///
/// All mutation goes through the methods below; each one holds a lock only for
/// the duration of a synchronous update so the periodic tasks and HTTP handlers
/// observe a sequentially consistent timer.
pub struct AppState {
    pub preferences: Arc<Mutex<Preferences>>,
    pub preferences_path: Option<PathBuf>,
    pub autostart_path: Option<PathBuf>,
    /// Work session countdown
    pub countdown: Arc<Mutex<CountdownTimer>>,
    ticker: Mutex<Option<(u64, PeriodicTask)>>,
    /// Present while idle monitoring is enabled
    pub idle: Arc<Mutex<Option<IdleState>>>,
    idle_poller: Mutex<Option<PeriodicTask>>,
    pub break_session: Arc<Mutex<Option<BreakSession>>>,
    break_ticker: Mutex<Option<PeriodicTask>>,
    break_counter: AtomicU64,
    /// Where idle detection reads the pointer from
    pointer_source: Arc<dyn PointerSource>,
    /// Positions pushed by clients over HTTP
    pub reported_pointer: ReportedPointer,
    /// Rendering inputs
    pub screen_width: f64,
    pub metrics: WidthMetrics,
    pub alerts: AlertCommands,
    /// Server metadata
    pub start_time: std::time::Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Countdown signals: updated(remaining) and finished
    pub event_tx: broadcast::Sender<TimerEvent>,
}

impl AppState {
    /// Create a new AppState with a stopped timer sized from `preferences`
    pub fn new(port: u16, host: String, preferences: Preferences) -> Self {
        let countdown = CountdownTimer::new(preferences.work_duration_seconds());
        let (event_tx, _) = broadcast::channel(100);
        let reported_pointer = ReportedPointer::new();

        Self {
            preferences: Arc::new(Mutex::new(preferences)),
            preferences_path: None,
            autostart_path: None,
            countdown: Arc::new(Mutex::new(countdown)),
            ticker: Mutex::new(None),
            idle: Arc::new(Mutex::new(None)),
            idle_poller: Mutex::new(None),
            break_session: Arc::new(Mutex::new(None)),
            break_ticker: Mutex::new(None),
            break_counter: AtomicU64::new(0),
            pointer_source: Arc::new(reported_pointer.clone()),
            reported_pointer,
            screen_width: DEFAULT_SCREEN_WIDTH,
            metrics: WidthMetrics::default(),
            alerts: AlertCommands::default(),
            start_time: std::time::Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
        }
    }

    pub fn with_preferences_path(mut self, path: Option<PathBuf>) -> Self {
        self.preferences_path = path;
        self
    }

    pub fn with_autostart_path(mut self, path: Option<PathBuf>) -> Self {
        self.autostart_path = path;
        self
    }

    pub fn with_screen_width(mut self, screen_width: f64) -> Self {
        self.screen_width = screen_width;
        self
    }

    pub fn with_alert_commands(mut self, alerts: AlertCommands) -> Self {
        self.alerts = alerts;
        self
    }

    /// Read the pointer from somewhere other than HTTP reports
    pub fn with_pointer_source(mut self, source: Arc<dyn PointerSource>) -> Self {
        self.pointer_source = source;
        self
    }

    /// Subscribe to countdown signals
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Apply a transition to the countdown, then bring the tick task in line with it
    pub fn update_timer<F>(self: &Arc<Self>, action: &str, updater: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut CountdownTimer) -> bool,
    {
        let mut timer = self.countdown.lock()
            .map_err(|e| format!("Failed to lock countdown: {}", e))?;

        let changed = updater(&mut *timer);
        let snapshot = timer.snapshot();
        drop(timer); // Release the lock early

        if changed {
            debug!("Timer action {} -> {:?}", action, snapshot.phase);
        } else {
            debug!("Timer action {} had no effect in {:?}", action, snapshot.phase);
        }

        self.record_action(action);
        self.sync_ticker()?;

        Ok(snapshot)
    }

    /// Make sure exactly one tick task exists while running, and none otherwise
    fn sync_ticker(self: &Arc<Self>) -> Result<(), String> {
        let mut ticker = self.ticker.lock()
            .map_err(|e| format!("Failed to lock ticker: {}", e))?;

        // Read the phase under the ticker lock so concurrent transitions settle on the latest state
        let (running, run_id) = {
            let timer = self.countdown.lock()
                .map_err(|e| format!("Failed to lock countdown: {}", e))?;
            (timer.is_running(), timer.run_id())
        };

        if !running {
            if let Some((_, task)) = ticker.take() {
                task.cancel();
            }
            return Ok(());
        }

        let current = matches!(&*ticker, Some((id, task)) if *id == run_id && !task.is_finished());
        if !current {
            if let Some((_, stale)) = ticker.take() {
                stale.cancel();
            }
            *ticker = Some((run_id, spawn_countdown_ticker(self, run_id)));
        }
        Ok(())
    }

    /// One second of countdown for run `run_id`. Breaks once the run is over.
    pub fn tick_countdown(&self, run_id: u64) -> ControlFlow<()> {
        let mut timer = match self.countdown.lock() {
            Ok(timer) => timer,
            Err(e) => {
                warn!("Failed to lock countdown for tick: {}", e);
                return ControlFlow::Break(());
            }
        };

        if timer.run_id() != run_id || !timer.is_running() {
            return ControlFlow::Break(());
        }

        let events = timer.tick();
        drop(timer);

        let mut finished = false;
        for event in events {
            if event == TimerEvent::Finished {
                info!("Work session finished");
                finished = true;
            }
            if self.event_tx.send(event).is_err() {
                debug!("No listeners for timer event {:?}", event);
            }
        }

        if finished {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    pub fn start_timer(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        info!("Starting work timer");
        self.update_timer("start", CountdownTimer::start)
    }

    pub fn stop_timer(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        info!("Stopping work timer");
        self.update_timer("stop", |timer| {
            timer.stop();
            true
        })
    }

    /// Pause/resume toggle
    pub fn toggle_pause(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        self.update_timer("pause", CountdownTimer::toggle_pause)
    }

    pub fn pause_timer(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        self.update_timer("pause", CountdownTimer::pause)
    }

    pub fn resume_timer(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        self.update_timer("resume", CountdownTimer::resume)
    }

    /// Restart the work session from its full duration
    pub fn reset_timer(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        info!("Resetting work timer");
        self.update_timer("reset", |timer| {
            timer.stop();
            timer.start()
        })
    }

    /// Take a break now and queue up a fresh work session
    pub fn next_session(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        self.begin_break()?;
        self.update_timer("next", |timer| {
            timer.stop();
            timer.start()
        })
    }

    pub fn pause_for_idle(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        self.update_timer("idle-pause", CountdownTimer::pause_for_idle)
    }

    pub fn resume_from_idle(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        self.update_timer("idle-resume", CountdownTimer::resume_from_idle)
    }

    /// Get current timer state
    pub fn get_timer_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.countdown.lock()
            .map(|timer| timer.snapshot())
            .map_err(|e| format!("Failed to lock countdown: {}", e))
    }

    /// Switch pointer idle monitoring on or off.
    ///
    /// Turning it off while idle resumes the timer so it can never stay stuck paused.
    pub fn set_idle_monitoring(self: &Arc<Self>, enabled: bool) -> Result<(), String> {
        let mut poller = self.idle_poller.lock()
            .map_err(|e| format!("Failed to lock idle poller: {}", e))?;
        let position = self.pointer_source.position();
        let now = Instant::now();

        let transition = {
            let mut idle = self.idle.lock()
                .map_err(|e| format!("Failed to lock idle state: {}", e))?;
            let transition = match idle.as_mut() {
                Some(state) => state.reset(position, now),
                None => IdleTransition::Unchanged,
            };
            *idle = if enabled { Some(IdleState::new(position, now)) } else { None };
            transition
        };

        if enabled {
            let running = poller.as_ref().is_some_and(|task| !task.is_finished());
            if !running {
                *poller = Some(spawn_idle_poller(self));
            }
            info!("Pointer idle monitoring enabled");
        } else {
            if let Some(task) = poller.take() {
                task.cancel();
            }
            info!("Pointer idle monitoring disabled");
        }
        drop(poller);

        if transition == IdleTransition::BecameActive {
            self.resume_from_idle()?;
        }
        Ok(())
    }

    /// One idle poll. Breaks once monitoring has been switched off.
    pub fn poll_idle(self: &Arc<Self>) -> ControlFlow<()> {
        let position = self.pointer_source.position();

        let transition = match self.idle.lock() {
            Ok(mut idle) => match idle.as_mut() {
                Some(state) => state.poll(position, Instant::now()),
                None => return ControlFlow::Break(()),
            },
            Err(e) => {
                warn!("Failed to lock idle state: {}", e);
                return ControlFlow::Break(());
            }
        };

        let result = match transition {
            IdleTransition::BecameIdle => {
                info!("Pointer idle, pausing work timer");
                self.pause_for_idle()
            }
            IdleTransition::BecameActive => {
                info!("Pointer active again, resuming work timer");
                self.resume_from_idle()
            }
            IdleTransition::Unchanged => return ControlFlow::Continue(()),
        };

        if let Err(e) = result {
            warn!("Failed to apply idle transition: {}", e);
        }
        ControlFlow::Continue(())
    }

    pub fn is_idle(&self) -> bool {
        self.idle
            .lock()
            .ok()
            .and_then(|idle| idle.as_ref().map(IdleState::is_idle))
            .unwrap_or(false)
    }

    pub fn idle_monitoring_enabled(&self) -> bool {
        self.idle.lock().map(|idle| idle.is_some()).unwrap_or(false)
    }

    /// Start a break from the current preferences, replacing any active one
    pub fn begin_break(self: &Arc<Self>) -> Result<BreakSession, String> {
        let prefs = self.get_preferences()?;
        let id = self.break_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let session = BreakSession::from_preferences(&prefs, id);

        let mut ticker = self.break_ticker.lock()
            .map_err(|e| format!("Failed to lock break ticker: {}", e))?;
        {
            let mut current = self.break_session.lock()
                .map_err(|e| format!("Failed to lock break session: {}", e))?;
            *current = Some(session.clone());
        }
        if let Some(old) = ticker.take() {
            old.cancel();
        }
        *ticker = Some(spawn_break_ticker(self, id));
        drop(ticker);

        self.record_action("break");
        info!("Break started for {}s: {}", session.remaining_seconds, session.message);
        Ok(session)
    }

    /// One second of break `id`. Breaks once that break is over or replaced.
    pub fn tick_break(&self, id: u64) -> ControlFlow<()> {
        let mut current = match self.break_session.lock() {
            Ok(current) => current,
            Err(e) => {
                warn!("Failed to lock break session: {}", e);
                return ControlFlow::Break(());
            }
        };

        match current.as_mut() {
            Some(session) if session.id == id => {
                if session.tick() {
                    *current = None;
                    info!("Break finished");
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
            _ => ControlFlow::Break(()),
        }
    }

    /// End the active break early. Returns whether one was active.
    pub fn skip_break(&self) -> Result<bool, String> {
        let mut ticker = self.break_ticker.lock()
            .map_err(|e| format!("Failed to lock break ticker: {}", e))?;
        if let Some(task) = ticker.take() {
            task.cancel();
        }

        let skipped = self.break_session.lock()
            .map_err(|e| format!("Failed to lock break session: {}", e))?
            .take()
            .is_some();
        drop(ticker);

        if skipped {
            self.record_action("skip-break");
            info!("Break skipped");
        }
        Ok(skipped)
    }

    pub fn get_break_session(&self) -> Result<Option<BreakSession>, String> {
        self.break_session.lock()
            .map(|session| session.clone())
            .map_err(|e| format!("Failed to lock break session: {}", e))
    }

    pub fn get_preferences(&self) -> Result<Preferences, String> {
        self.preferences.lock()
            .map(|prefs| prefs.clone())
            .map_err(|e| format!("Failed to lock preferences: {}", e))
    }

    /// Validate, apply and persist new preferences
    pub async fn update_preferences(self: &Arc<Self>, new: Preferences) -> anyhow::Result<Preferences> {
        new.validate()?;

        let old = self.get_preferences().map_err(anyhow::Error::msg)?;

        // Side effects first, so a failure leaves memory and disk as they were
        if old.launch_at_startup != new.launch_at_startup {
            if let Some(path) = &self.autostart_path {
                autostart::set_launch_at_startup(path, new.launch_at_startup)
                    .await
                    .with_context(|| {
                        format!(
                            "Failed to {} launch at startup",
                            if new.launch_at_startup { "enable" } else { "disable" }
                        )
                    })?;
            } else {
                warn!("No autostart location available, launch at startup not changed");
            }
        }

        if let Some(path) = &self.preferences_path {
            if let Err(e) = new.save(path).await {
                if old.launch_at_startup != new.launch_at_startup {
                    if let Some(entry) = &self.autostart_path {
                        if let Err(revert) =
                            autostart::set_launch_at_startup(entry, old.launch_at_startup).await
                        {
                            warn!("Failed to revert launch at startup: {:#}", revert);
                        }
                    }
                }
                return Err(e);
            }
        }

        {
            let mut prefs = self.preferences.lock()
                .map_err(|e| anyhow::anyhow!("Failed to lock preferences: {}", e))?;
            *prefs = new.clone();
        }
        self.record_action("preferences");

        if old.work_time_mins != new.work_time_mins {
            info!("Work duration changed to {} minutes", new.work_time_mins);
            let seconds = new.work_duration_seconds();
            self.update_timer("preferences", |timer| {
                timer.set_duration(seconds);
                true
            })
            .map_err(anyhow::Error::msg)?;
        }

        if old.pause_at_mouse_idle != new.pause_at_mouse_idle {
            self.set_idle_monitoring(new.pause_at_mouse_idle)
                .map_err(anyhow::Error::msg)?;
        }

        Ok(new)
    }

    /// Render the status item for the current remaining time
    pub fn status_line(&self, screen_width: Option<f64>) -> Result<StatusLine, String> {
        let snapshot = self.get_timer_snapshot()?;
        let prefs = self.get_preferences()?;
        Ok(StatusLine::render(
            snapshot.remaining_seconds,
            &prefs,
            screen_width.unwrap_or(self.screen_width),
            &self.metrics,
        ))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Cancel every periodic task
    pub fn shutdown(&self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            ticker.take();
        }
        if let Ok(mut poller) = self.idle_poller.lock() {
            poller.take();
        }
        if let Ok(mut ticker) = self.break_ticker.lock() {
            ticker.take();
        }
        debug!("Periodic tasks cancelled");
    }
}

fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
