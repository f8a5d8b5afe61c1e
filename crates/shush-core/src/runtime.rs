//! Tokio plumbing for running a session.
//!
//! Every signal source (pointer input, confirm/cancel, radio broadcasts, the
//! timeout) pushes into one [`SessionQueue`]. [`SessionQueue::drive`] is the
//! single worker that feeds them to the scheduler one at a time, so no two
//! handlers ever run concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::events::Event;
use crate::radio::RadioState;
use crate::scheduler::{
    DeferralScheduler, ExternalSignalBus, RadioStateHandler, SessionSignal, SignalSink,
    Subscription, TimeoutCallback, TimeoutTimer, TimerHandle,
};

/// The session's event queue.
pub struct SessionQueue {
    tx: mpsc::UnboundedSender<SessionSignal>,
    rx: mpsc::UnboundedReceiver<SessionSignal>,
}

impl Default for SessionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A sink for collaborator callbacks. Signals sent after the queue is gone
    /// are dropped.
    pub fn sink(&self) -> SignalSink {
        let tx = self.tx.clone();
        Arc::new(move |signal| {
            if tx.send(signal).is_err() {
                tracing::debug!(?signal, "session queue closed, dropping signal");
            }
        })
    }

    /// A raw sender, for input sources living on other tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<SessionSignal> {
        self.tx.clone()
    }

    /// Processes signals in arrival order until the session is torn down,
    /// then runs whatever is already queued behind the winner (all of which
    /// the scheduler ignores). Returns the events produced.
    ///
    /// Also returns if every sender is dropped while the session is still
    /// armed.
    pub async fn drive(self, scheduler: &mut DeferralScheduler) -> Vec<Event> {
        let SessionQueue { tx, mut rx } = self;
        drop(tx);

        let mut events = Vec::new();
        while scheduler.is_armed() {
            let Some(signal) = rx.recv().await else {
                tracing::warn!(session_id = %scheduler.session_id(), "all signal sources dropped while armed");
                break;
            };
            events.extend(scheduler.dispatch(signal));
        }

        while let Ok(signal) = rx.try_recv() {
            events.extend(scheduler.dispatch(signal));
        }
        events
    }
}

/// One-shot timers backed by `tokio::time::sleep`. Must be used from within
/// a tokio runtime.
#[derive(Debug, Default)]
pub struct TokioTimeout {
    next_id: u64,
    tasks: HashMap<u64, JoinHandle<()>>,
}

impl TimeoutTimer for TokioTimeout {
    fn start(&mut self, after: Duration, on_fire: TimeoutCallback) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());
        self.next_id += 1;
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            on_fire();
        });
        self.tasks.insert(self.next_id, task);
        TimerHandle(self.next_id)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle.0) {
            task.abort();
        }
    }
}

impl Drop for TokioTimeout {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

type SharedHandler = Arc<dyn Fn(RadioState) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    handlers: Vec<(u64, SharedHandler)>,
}

/// In-process fan-out of radio state broadcasts.
#[derive(Clone, Default)]
pub struct LocalSignalBus {
    subscribers: Arc<Mutex<Subscribers>>,
}

impl std::fmt::Debug for LocalSignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSignalBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl LocalSignalBus {
    /// Delivers `state` to every current subscriber.
    pub fn publish(&self, state: RadioState) {
        let handlers: Vec<SharedHandler> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        tracing::debug!(%state, subscribers = handlers.len(), "publishing radio state");
        for handler in handlers {
            handler(state);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .len()
    }
}

impl ExternalSignalBus for LocalSignalBus {
    fn subscribe(&mut self, handler: RadioStateHandler) -> Subscription {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.next_id += 1;
        let id = subscribers.next_id;
        subscribers.handlers.push((id, Arc::from(handler)));
        Subscription(id)
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .retain(|(id, _)| *id != subscription.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn bus_delivers_until_unsubscribed() {
        let mut bus = LocalSignalBus::default();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let sub = bus.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        bus.publish(RadioState::EnabledExternally);
        bus.unsubscribe(sub);
        bus.unsubscribe(sub);
        bus.publish(RadioState::EnabledExternally);

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_fires_after_delay() {
        let mut timer = TokioTimeout::default();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        timer.start(
            Duration::from_secs(60),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timeout_never_fires() {
        let mut timer = TokioTimeout::default();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let handle = timer.start(
            Duration::from_secs(60),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        timer.cancel(handle);
        timer.cancel(handle);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
