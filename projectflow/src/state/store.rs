//! The application store and its subscription mechanism.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, ReentrantMutex};

use super::{Action, AppState, reduce};

/// Whether a dispatched action changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state changed and subscribers were notified.
    Changed,
    /// The action addressed a task that does not exist; nothing changed.
    Unchanged,
}

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&AppState) + Send + Sync>;

/// Snapshots waiting to be handed to listeners, oldest first.
#[derive(Default)]
struct Outbox {
    queue: VecDeque<Arc<AppState>>,
    /// A notification pass is running on the thread holding the gate.
    draining: bool,
}

/// Single source of truth for client state.
///
/// Constructed once at start-up and shared as `Arc<Store>` with everything
/// that reads or writes state. Each [`dispatch`](Self::dispatch) is one
/// atomic transition: observers only ever see the state before or after
/// it, and are called after the transition completes, in dispatch order.
///
/// A listener may dispatch from inside its callback. The nested transition
/// is applied at once, but its notification waits until every listener has
/// seen the current one, so each listener observes transitions in order and
/// ends on the latest state.
pub struct Store {
    /// Current state. Snapshots handed out are never mutated in place.
    state: Mutex<Arc<AppState>>,
    /// Registered listeners.
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    /// Serializes dispatch + notification. Reentrant so a listener may
    /// dispatch from inside its callback.
    gate: ReentrantMutex<RefCell<Outbox>>,
    next_id: AtomicU64,
}

impl Store {
    /// Creates a store holding the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    /// Creates a store holding `state`, with the filtered view recomputed.
    #[must_use]
    pub fn with_state(mut state: AppState) -> Self {
        state.refresh_filtered();
        Self {
            state: Mutex::new(Arc::new(state)),
            listeners: Mutex::new(Vec::new()),
            gate: ReentrantMutex::new(RefCell::new(Outbox::default())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state.lock())
    }

    /// Applies `action` and notifies subscribers if the state changed.
    pub fn dispatch(&self, action: Action) -> Transition {
        let outbox = self.gate.lock();
        let kind = action.kind();

        let (transition, snapshot) = {
            let mut current = self.state.lock();
            let transition = reduce(Arc::make_mut(&mut current), action);
            (transition, Arc::clone(&current))
        };

        match transition {
            Transition::Changed => {
                tracing::debug!(
                    action = kind,
                    tasks = snapshot.tasks.len(),
                    visible = snapshot.filtered_tasks.len(),
                    "state transition"
                );
                self.publish(&outbox, snapshot);
            }
            Transition::Unchanged => {
                tracing::debug!(action = kind, "action matched no task, state unchanged");
            }
        }
        transition
    }

    /// Builds an action from the current state and dispatches it, with no
    /// other dispatch able to run in between. `None` leaves the state alone.
    pub fn dispatch_with<F>(&self, build: F) -> Transition
    where
        F: FnOnce(&AppState) -> Option<Action>,
    {
        let _outbox = self.gate.lock();
        match build(&self.snapshot()) {
            Some(action) => self.dispatch(action),
            None => Transition::Unchanged,
        }
    }

    /// Registers a listener called with the new state after every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Queues `snapshot` and, unless a pass is already running further up
    /// the stack, notifies listeners until the queue is empty.
    fn publish(&self, outbox: &RefCell<Outbox>, snapshot: Arc<AppState>) {
        {
            let mut outbox = outbox.borrow_mut();
            outbox.queue.push_back(snapshot);
            if outbox.draining {
                return;
            }
            outbox.draining = true;
        }
        loop {
            let next = outbox.borrow_mut().queue.pop_front();
            let Some(state) = next else { break };
            self.notify(&state);
        }
        outbox.borrow_mut().draining = false;
    }

    fn notify(&self, state: &AppState) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(state);
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.snapshot())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}
