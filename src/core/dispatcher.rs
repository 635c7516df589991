//! Asynchronous fan-out of log events to appenders
//!
//! One worker thread drains an unbounded FIFO and offers each event to the
//! appenders that were registered when it was submitted, in registration
//! order. Callers never block on appender I/O; only [`Dispatcher::wait_for_incoming`],
//! [`Dispatcher::pause_logging`] and [`Dispatcher::restart_logging`] synchronize
//! with the worker.

use super::{
    appender::SharedAppender,
    error::{LoggerError, Result},
    log_event::LogEvent,
    metrics::DispatcherMetrics,
};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, LazyLock};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

/// Default shutdown timeout used when a dispatcher is dropped (5 seconds)
///
/// For custom timeout control, use [`Dispatcher::shutdown`] instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const WORKER_NAME: &str = "taglog-dispatch";
const BATCH_SIZE: usize = 64;

type Snapshot = Arc<Vec<SharedAppender>>;

enum Message {
    Event { event: LogEvent, appenders: Snapshot },
    Barrier(Sender<()>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// No event or appender has arrived yet; no worker exists.
    Uninitialized,
    Running,
    /// Stopped by `pause_logging`; submissions are dropped.
    Paused,
}

struct Worker {
    sender: Sender<Message>,
    handle: JoinHandle<()>,
    thread_id: ThreadId,
}

impl Worker {
    fn spawn(metrics: Arc<DispatcherMetrics>) -> Result<Self> {
        let (sender, receiver) = unbounded();
        let handle = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || run_worker(receiver, metrics))
            .map_err(LoggerError::worker_spawn)?;
        let thread_id = handle.thread().id();

        Ok(Self {
            sender,
            handle,
            thread_id,
        })
    }

    fn is_current_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Close the queue and wait for everything already queued to be delivered.
    fn stop(self) {
        let Worker {
            sender,
            handle,
            thread_id,
        } = self;
        drop(sender);

        if thread::current().id() == thread_id {
            eprintln!("[LOGGER WARNING] Dispatcher paused from its own worker; not waiting for drain.");
            return;
        }
        if let Err(e) = handle.join() {
            eprintln!("[LOGGER ERROR] Dispatch worker panicked: {}", panic_message(&*e));
        }
    }

    /// Like `stop`, but give up after `timeout`. Returns whether the worker finished.
    fn stop_with_timeout(self, timeout: Duration) -> bool {
        drop(self.sender);

        if thread::current().id() == self.thread_id {
            return false;
        }

        let start = Instant::now();
        loop {
            if self.handle.is_finished() {
                if let Err(e) = self.handle.join() {
                    eprintln!(
                        "[LOGGER ERROR] Dispatch worker panicked during shutdown: {}",
                        panic_message(&*e)
                    );
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Dispatch worker did not finish within {:?} timeout. \
                     Some logs may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

struct Lifecycle {
    worker: Option<Worker>,
    paused: bool,
}

/// The event dispatch engine.
///
/// Most programs use the process-wide instance from [`Dispatcher::global`];
/// separate instances are independent and useful in tests.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taglog::{Dispatcher, LogEvent, LogLevel, MemoryAppender};
///
/// let dispatcher = Dispatcher::new();
/// let memory = Arc::new(MemoryAppender::new());
/// dispatcher.add_appender(memory.clone());
///
/// dispatcher.submit(LogEvent::new(LogLevel::Info, Vec::new(), "hello".into()));
/// dispatcher.wait_for_incoming();
///
/// assert_eq!(memory.logged_messages(), vec!["hello".to_string()]);
/// ```
pub struct Dispatcher {
    appenders: RwLock<Snapshot>,
    lifecycle: RwLock<Lifecycle>,
    /// Serializes start, pause and restart.
    transition: Mutex<()>,
    /// Outlives `Lifecycle::worker` while a pause is joining it.
    worker_thread: RwLock<Option<ThreadId>>,
    metrics: Arc<DispatcherMetrics>,
}

static GLOBAL: LazyLock<Arc<Dispatcher>> = LazyLock::new(|| Arc::new(Dispatcher::new()));

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            appenders: RwLock::new(Arc::new(Vec::new())),
            lifecycle: RwLock::new(Lifecycle {
                worker: None,
                paused: false,
            }),
            transition: Mutex::new(()),
            worker_thread: RwLock::new(None),
            metrics: Arc::new(DispatcherMetrics::new()),
        }
    }

    /// The process-wide dispatcher shared by the default logger.
    pub fn global() -> Arc<Dispatcher> {
        Arc::clone(&GLOBAL)
    }

    pub fn state(&self) -> DispatcherState {
        let lifecycle = self.lifecycle.read();
        if lifecycle.worker.is_some() {
            DispatcherState::Running
        } else if lifecycle.paused {
            DispatcherState::Paused
        } else {
            DispatcherState::Uninitialized
        }
    }

    pub fn metrics(&self) -> &DispatcherMetrics {
        &self.metrics
    }

    /// Register `appender` after all existing ones.
    ///
    /// It receives events submitted from now on.
    pub fn add_appender(&self, appender: SharedAppender) {
        {
            let mut appenders = self.appenders.write();
            let mut next = Vec::with_capacity(appenders.len() + 1);
            next.extend(appenders.iter().cloned());
            next.push(appender);
            *appenders = Arc::new(next);
        }
        self.start_if_uninitialized();
    }

    /// Unregister every appender. Events already queued still reach the
    /// appenders that were registered when they were submitted.
    pub fn clear_appenders(&self) {
        *self.appenders.write() = Arc::new(Vec::new());
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    /// Queue `event` for delivery. Never blocks on appender I/O.
    ///
    /// While paused the event is dropped and counted in [`DispatcherMetrics::dropped`].
    pub fn submit(&self, event: LogEvent) {
        self.start_if_uninitialized();

        let message = Message::Event {
            event,
            appenders: Arc::clone(&self.appenders.read()),
        };

        let lifecycle = self.lifecycle.read();
        let sent = match &lifecycle.worker {
            Some(worker) => worker.sender.send(message).is_ok(),
            None => false,
        };
        if sent {
            self.metrics.record_submitted();
        } else {
            self.metrics.record_dropped();
        }
    }

    /// Block until every event submitted before this call has been offered to
    /// its appenders and those appenders have been flushed.
    ///
    /// Returns immediately when no worker is running, or when called from an
    /// appender on the worker thread.
    pub fn wait_for_incoming(&self) {
        let (ack_tx, ack_rx) = bounded(1);
        {
            let lifecycle = self.lifecycle.read();
            let Some(worker) = &lifecycle.worker else {
                return;
            };
            if worker.is_current_thread() {
                return;
            }
            if worker.sender.send(Message::Barrier(ack_tx)).is_err() {
                return;
            }
        }
        // An error means the worker went away without acknowledging
        let _ = ack_rx.recv();
    }

    /// Deliver everything already queued, then stop the worker.
    ///
    /// Until [`Dispatcher::restart_logging`], submissions are dropped. Calling
    /// this while already paused does nothing.
    pub fn pause_logging(&self) {
        let Some(_transition) = self.lock_transition() else {
            eprintln!(
                "[LOGGER WARNING] Pause requested from the dispatch worker during another \
                 transition; ignored."
            );
            return;
        };
        let worker = {
            let mut lifecycle = self.lifecycle.write();
            lifecycle.paused = true;
            lifecycle.worker.take()
        };
        // Joined outside the lifecycle lock so appenders that log can still
        // reach `submit` (and be dropped) instead of deadlocking.
        if let Some(worker) = worker {
            worker.stop();
            *self.worker_thread.write() = None;
        }
    }

    /// Start accepting and delivering events again. Does nothing while running.
    ///
    /// Called from an appender while another thread is pausing or shutting
    /// down this dispatcher, the restart is skipped and the pause wins.
    pub fn restart_logging(&self) -> Result<()> {
        let Some(_transition) = self.lock_transition() else {
            eprintln!(
                "[LOGGER WARNING] Restart requested from the dispatch worker while it is \
                 being stopped; ignored."
            );
            return Ok(());
        };
        let mut lifecycle = self.lifecycle.write();
        lifecycle.paused = false;
        if lifecycle.worker.is_none() {
            let worker = Worker::spawn(Arc::clone(&self.metrics))?;
            *self.worker_thread.write() = Some(worker.thread_id);
            lifecycle.worker = Some(worker);
        }
        Ok(())
    }

    /// Pause with a bounded wait for the queue to drain.
    ///
    /// Returns `true` if the worker finished within `timeout`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let Some(_transition) = self.lock_transition() else {
            return false;
        };
        let worker = {
            let mut lifecycle = self.lifecycle.write();
            lifecycle.paused = true;
            lifecycle.worker.take()
        };
        match worker {
            Some(worker) => {
                let finished = worker.stop_with_timeout(timeout);
                *self.worker_thread.write() = None;
                finished
            }
            None => true,
        }
    }

    fn on_worker_thread(&self) -> bool {
        *self.worker_thread.read() == Some(thread::current().id())
    }

    /// Take the transition lock, or `None` when called from the worker while
    /// another thread holds it. That thread may be joining the worker.
    fn lock_transition(&self) -> Option<MutexGuard<'_, ()>> {
        if self.on_worker_thread() {
            self.transition.try_lock()
        } else {
            Some(self.transition.lock())
        }
    }

    fn start_if_uninitialized(&self) {
        {
            let lifecycle = self.lifecycle.read();
            if lifecycle.worker.is_some() || lifecycle.paused {
                return;
            }
        }

        let Some(_transition) = self.lock_transition() else {
            return;
        };
        let mut lifecycle = self.lifecycle.write();
        if lifecycle.worker.is_some() || lifecycle.paused {
            return;
        }
        match Worker::spawn(Arc::clone(&self.metrics)) {
            Ok(worker) => {
                *self.worker_thread.write() = Some(worker.thread_id);
                lifecycle.worker = Some(worker);
            }
            Err(e) => eprintln!("[LOGGER ERROR] {}", e),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        let worker = self.lifecycle.get_mut().worker.take();
        if let Some(worker) = worker {
            worker.stop_with_timeout(DEFAULT_SHUTDOWN_TIMEOUT);
        }

        let dropped = self.metrics.dropped();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Dispatcher shutting down with {} dropped events (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

fn run_worker(receiver: Receiver<Message>, metrics: Arc<DispatcherMetrics>) {
    let mut batch = Vec::with_capacity(BATCH_SIZE);
    let mut touched: Vec<Snapshot> = Vec::new();

    // recv keeps yielding queued messages after the sender is dropped, so a
    // pause drains the queue before this loop ends
    while let Ok(message) = receiver.recv() {
        batch.push(message);
        while batch.len() < BATCH_SIZE {
            match receiver.try_recv() {
                Ok(message) => batch.push(message),
                Err(_) => break,
            }
        }

        for message in batch.drain(..) {
            match message {
                Message::Event { event, appenders } => {
                    deliver(&event, &appenders, &metrics);
                    if !touched.iter().any(|seen| Arc::ptr_eq(seen, &appenders)) {
                        touched.push(appenders);
                    }
                }
                Message::Barrier(ack) => {
                    flush_all(&touched);
                    touched.clear();
                    metrics.record_barrier();
                    let _ = ack.send(());
                }
            }
        }

        flush_all(&touched);
        touched.clear();
    }
}

/// Offer `event` to each appender in order.
///
/// Each call is isolated so that one failing or panicking appender does not
/// keep the event from the rest.
fn deliver(event: &LogEvent, appenders: &[SharedAppender], metrics: &DispatcherMetrics) {
    for appender in appenders {
        match catch_unwind(AssertUnwindSafe(|| appender.append(event))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                metrics.record_appender_failure();
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Appender '{}' panicked: {}. \
                     Other appenders continue to function.",
                    appender.name(),
                    panic_message(&*panic_info)
                );
                metrics.record_appender_failure();
            }
        }
    }
    metrics.record_delivered();
}

fn flush_all(snapshots: &[Snapshot]) {
    for appender in snapshots.iter().flat_map(|s| s.iter()) {
        match catch_unwind(AssertUnwindSafe(|| appender.flush())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender '{}' flush failed: {}", appender.name(), e);
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Appender '{}' panicked during flush: {}",
                    appender.name(),
                    panic_message(&*panic_info)
                );
            }
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
