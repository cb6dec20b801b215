//! Event Router
//!
//! Every native interaction callback funnels through one
//! [`NativeCallback`], which packages the invocation as an
//! [`EventContext`] and pushes it onto an unbounded channel. A single
//! consumer thread drains the channel in arrival order and invokes the
//! fulfillments subscribed for `(handle, event name)`.
//!
//! ```text
//! surface listener ─┐
//! surface listener ─┼─► NativeCallback ─► channel ─► consumer ─► fulfillments
//! surface listener ─┘        (try_send)      FIFO     (one thread)
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};

use smol::channel::{self, Receiver, Sender};

use crate::surface::SurfaceHandle;
use crate::{VdomError, VdomResult};

/// Raw interaction payload: invoking node plus positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext<H> {
    /// Node whose listener fired
    pub this: H,
    pub event_name: String,
    pub args: Vec<String>,
}

/// Application handler attributed to a node
pub type Fulfillment<H> = Arc<dyn Fn(&EventContext<H>) -> Option<String> + Send + Sync>;

/// The single entry point surfaces invoke for every interaction
pub type NativeCallback<H> = Arc<dyn Fn(EventContext<H>) + Send + Sync>;

/// Handle returned by [`EventRouter::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Router lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Running,
    Stopped,
}

/// Router counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterStats {
    /// Events accepted onto the channel
    pub received: u64,
    /// Fulfillment invocations
    pub dispatched: u64,
    /// Events with no subscriber
    pub unattributed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    received: AtomicU64,
    dispatched: AtomicU64,
    unattributed: AtomicU64,
}

enum RouterMessage<H> {
    Event(EventContext<H>),
    Flush(Sender<()>),
}

struct SubscriptionTable<H> {
    next_id: u64,
    /// (handle, event name) -> fulfillments in subscription order
    handlers: HashMap<(H, String), Vec<(SubscriptionId, Fulfillment<H>)>>,
    /// Pairs for which the native callback is registered on the surface
    bound: HashSet<(H, String)>,
}

impl<H: SurfaceHandle> SubscriptionTable<H> {
    fn new() -> Self {
        Self { next_id: 0, handlers: HashMap::new(), bound: HashSet::new() }
    }

    fn handlers_for(&self, this: &H, event_name: &str) -> Vec<Fulfillment<H>> {
        self.handlers
            .get(&(this.clone(), event_name.to_string()))
            .map(|list| list.iter().map(|(_, f)| Arc::clone(f)).collect())
            .unwrap_or_default()
    }
}

/// Asynchronous event pipeline with a single FIFO consumer
pub struct EventRouter<H: SurfaceHandle> {
    sender: Sender<RouterMessage<H>>,
    native: NativeCallback<H>,
    subscriptions: Arc<Mutex<SubscriptionTable<H>>>,
    counters: Arc<Counters>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
}

impl<H: SurfaceHandle> fmt::Debug for EventRouter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("state", &self.state())
            .field("queued", &self.sender.len())
            .field("stats", &self.stats())
            .finish()
    }
}

impl<H: SurfaceHandle> EventRouter<H> {
    /// Create the channel and spawn the consumer thread
    pub fn start(thread_name: &str) -> VdomResult<Self> {
        let (sender, receiver) = channel::unbounded();
        let subscriptions = Arc::new(Mutex::new(SubscriptionTable::new()));
        let counters = Arc::new(Counters::default());

        let worker = {
            let subscriptions = Arc::clone(&subscriptions);
            let counters = Arc::clone(&counters);
            thread::Builder::new()
                .name(thread_name.to_string())
                .spawn(move || smol::block_on(Self::run(receiver, subscriptions, counters)))?
        };
        let worker_id = worker.thread().id();

        let native: NativeCallback<H> = {
            let sender = sender.clone();
            let counters = Arc::clone(&counters);
            Arc::new(move |ctx: EventContext<H>| {
                let event_name = ctx.event_name.clone();
                match sender.try_send(RouterMessage::Event(ctx)) {
                    Ok(()) => {
                        counters.received.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(_) => tracing::warn!("event router closed, dropping {} event", event_name),
                }
            })
        };

        tracing::debug!("event router started on thread {:?}", thread_name);
        Ok(Self {
            sender,
            native,
            subscriptions,
            counters,
            worker: Mutex::new(Some(worker)),
            worker_id,
        })
    }

    async fn run(
        receiver: Receiver<RouterMessage<H>>,
        subscriptions: Arc<Mutex<SubscriptionTable<H>>>,
        counters: Arc<Counters>,
    ) {
        while let Ok(message) = receiver.recv().await {
            match message {
                RouterMessage::Event(ctx) => Self::dispatch(&subscriptions, &counters, &ctx),
                RouterMessage::Flush(done) => {
                    let _ = done.try_send(());
                }
            }
        }
        tracing::debug!("event channel closed, router stopping");
    }

    fn dispatch(subscriptions: &Mutex<SubscriptionTable<H>>, counters: &Counters, ctx: &EventContext<H>) {
        // Clone out of the table so fulfillments may subscribe more handlers.
        let handlers = lock(subscriptions).handlers_for(&ctx.this, &ctx.event_name);
        if handlers.is_empty() {
            counters.unattributed.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("no fulfillment for {} on {:?}", ctx.event_name, ctx.this);
            return;
        }

        for fulfillment in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| fulfillment(ctx))) {
                Ok(value) => {
                    counters.dispatched.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!("{} on {:?} fulfilled with {:?}", ctx.event_name, ctx.this, value);
                }
                Err(_) => tracing::error!("fulfillment for {} on {:?} panicked", ctx.event_name, ctx.this),
            }
        }
    }

    /// Callback to register with the surface. Every clone feeds the same
    /// channel.
    pub fn native_callback(&self) -> NativeCallback<H> {
        Arc::clone(&self.native)
    }

    /// Enqueue an event directly, bypassing the surface
    pub fn post(&self, ctx: EventContext<H>) -> VdomResult<()> {
        self.sender
            .try_send(RouterMessage::Event(ctx))
            .map_err(|_| VdomError::RouterUnavailable)?;
        self.counters.received.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Attribute `(this, event_name)` events to `fulfillment`
    pub fn subscribe(&self, this: H, event_name: &str, fulfillment: Fulfillment<H>) -> SubscriptionId {
        let mut table = lock(&self.subscriptions);
        let id = SubscriptionId(table.next_id);
        table.next_id += 1;
        table.handlers.entry((this, event_name.to_string())).or_default().push((id, fulfillment));
        id
    }

    /// Remove a subscription, returns whether it existed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut table = lock(&self.subscriptions);
        let mut removed = false;
        for list in table.handlers.values_mut() {
            let before = list.len();
            list.retain(|(sid, _)| *sid != id);
            removed |= list.len() != before;
        }
        table.handlers.retain(|_, list| !list.is_empty());
        removed
    }

    pub fn subscriber_count(&self, this: &H, event_name: &str) -> usize {
        lock(&self.subscriptions).handlers_for(this, event_name).len()
    }

    /// Whether the native callback is already registered for the pair
    pub fn is_bound(&self, this: &H, event_name: &str) -> bool {
        lock(&self.subscriptions).bound.contains(&(this.clone(), event_name.to_string()))
    }

    /// Record that the native callback is registered for the pair
    pub fn mark_bound(&self, this: H, event_name: &str) -> bool {
        lock(&self.subscriptions).bound.insert((this, event_name.to_string()))
    }

    /// Block until every event enqueued before this call has been
    /// processed. A no-op when called from a fulfillment.
    pub fn flush(&self) -> VdomResult<()> {
        if thread::current().id() == self.worker_id {
            tracing::warn!("flush called from the router thread, ignoring");
            return Ok(());
        }
        let (done_tx, done_rx) = channel::bounded(1);
        self.sender
            .try_send(RouterMessage::Flush(done_tx))
            .map_err(|_| VdomError::RouterUnavailable)?;
        smol::block_on(done_rx.recv()).map_err(|_| VdomError::RouterUnavailable)
    }

    pub fn state(&self) -> RouterState {
        if self.sender.is_closed() {
            RouterState::Stopped
        } else {
            RouterState::Running
        }
    }

    pub fn stats(&self) -> RouterStats {
        RouterStats {
            received: self.counters.received.load(Ordering::Relaxed),
            dispatched: self.counters.dispatched.load(Ordering::Relaxed),
            unattributed: self.counters.unattributed.load(Ordering::Relaxed),
        }
    }

    /// Close the channel and wait for queued events to drain
    pub fn shutdown(&self) {
        self.sender.close();
        let worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(worker) = worker {
            if worker.thread().id() == thread::current().id() {
                return;
            }
            if worker.join().is_err() {
                tracing::error!("event router thread panicked");
            }
        }
    }
}

impl<H: SurfaceHandle> Drop for EventRouter<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("lock poisoned, recovering");
        PoisonError::into_inner(poisoned)
    })
}
