use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::ManagerConfig;
use crate::domain::{Lifetime, Severity, Toast, ToastId, ToastOptions};

/// How often a live toast's remaining fraction is recomputed.
const PROGRESS_TICK: Duration = Duration::from_millis(10);

/// Owns the active toast collection and all timing side effects.
///
/// Cheap to clone; all clones share the same state. Mutation goes through
/// [`notify`](Self::notify), [`remove`](Self::remove) and
/// [`set_capacity`](Self::set_capacity); readers poll
/// [`snapshot`](Self::snapshot). Timer work runs on tokio tasks, so the
/// manager must be used from within a runtime.
#[derive(Clone)]
pub struct ToastManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    state: Mutex<State>,
    next_id: AtomicU64,
    default_lifetime: Lifetime,
    default_show_progress: bool,
}

struct State {
    /// Active toasts in insertion order; front is the eviction candidate.
    toasts: Vec<Toast>,
    /// Pending timer tasks per live toast; absent for unbounded lifetimes.
    timers: HashMap<ToastId, TimerHandles>,
    capacity: usize,
}

#[derive(Default)]
struct TimerHandles {
    expiry: Option<JoinHandle<()>>,
    progress: Option<JoinHandle<()>>,
}

impl TimerHandles {
    /// Safe on already-finished tasks; abort is a no-op then.
    fn abort(self) {
        if let Some(h) = self.expiry {
            h.abort();
        }
        if let Some(h) = self.progress {
            h.abort();
        }
    }
}

impl ManagerInner {
    fn state(&self) -> MutexGuard<'_, State> {
        // No task panics while holding the lock, so poisoning cannot leave
        // the state half-updated; recover instead of propagating.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new(&ManagerConfig::default())
    }
}

impl ToastManager {
    pub fn new(cfg: &ManagerConfig) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                state: Mutex::new(State {
                    toasts: Vec::new(),
                    timers: HashMap::new(),
                    capacity: cfg.capacity.max(1),
                }),
                next_id: AtomicU64::new(1),
                default_lifetime: Lifetime::from_millis(cfg.default_duration_ms),
                default_show_progress: cfg.show_progress,
            }),
        }
    }

    /// Enqueue a toast and return its id immediately; expiry and progress
    /// updates run in the background. If the collection is already at
    /// capacity, the oldest toast is removed first, so the bound is never
    /// exceeded by an insertion.
    pub fn notify(
        &self,
        severity: Severity,
        message: impl Into<String>,
        opts: ToastOptions,
    ) -> ToastId {
        let id = ToastId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let lifetime = opts.duration.unwrap_or(self.inner.default_lifetime);
        let show_progress = opts.show_progress.unwrap_or(self.inner.default_show_progress);
        let toast = Toast {
            id,
            severity,
            title: opts.title.unwrap_or_default(),
            message: message.into(),
            lifetime,
            show_progress,
            remaining_pct: 100.0,
        };

        let evicted = {
            let mut state = self.inner.state();
            let evicted = if state.toasts.len() >= state.capacity {
                let oldest = state.toasts[0].id;
                remove_locked(&mut state, oldest).map(|handles| (oldest, handles))
            } else {
                None
            };
            state.toasts.push(toast);
            if let Lifetime::Finite(duration) = lifetime {
                let handles = TimerHandles {
                    expiry: Some(self.spawn_expiry(id, duration)),
                    progress: show_progress.then(|| self.spawn_progress(id, duration)),
                };
                state.timers.insert(id, handles);
            }
            evicted
        };

        if let Some((oldest, handles)) = evicted {
            handles.abort();
            debug!(id = %oldest, "toast evicted; capacity reached");
        }
        debug!(id = %id, severity = %severity, "toast enqueued");
        id
    }

    pub fn success(&self, message: impl Into<String>, opts: ToastOptions) -> ToastId {
        self.notify(Severity::Success, message, opts)
    }

    pub fn error(&self, message: impl Into<String>, opts: ToastOptions) -> ToastId {
        self.notify(Severity::Error, message, opts)
    }

    pub fn warning(&self, message: impl Into<String>, opts: ToastOptions) -> ToastId {
        self.notify(Severity::Warning, message, opts)
    }

    pub fn info(&self, message: impl Into<String>, opts: ToastOptions) -> ToastId {
        self.notify(Severity::Info, message, opts)
    }

    /// Remove a toast and cancel its pending timers. Idempotent: removing an
    /// unknown or already-removed id is a no-op. Once this returns, the id is
    /// gone for good and no further expiry or progress work happens for it.
    pub fn remove(&self, id: ToastId) {
        let handles = {
            let mut state = self.inner.state();
            remove_locked(&mut state, id)
        };
        match handles {
            Some(h) => {
                h.abort();
                debug!(id = %id, "toast removed");
            }
            None => {
                debug!(id = %id, "remove ignored; toast not active");
            }
        }
    }

    /// Change the capacity applied to future insertions. Existing toasts are
    /// not evicted even if there are now more than `max` of them.
    pub fn set_capacity(&self, max: usize) {
        if max == 0 {
            warn!("ignoring set_capacity(0); capacity must be at least 1");
            return;
        }
        self.inner.state().capacity = max;
    }

    pub fn capacity(&self) -> usize {
        self.inner.state().capacity
    }

    /// Clones of the active toasts in insertion order, for a polling
    /// presentation layer.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.inner.state().toasts.clone()
    }

    pub fn get(&self, id: ToastId) -> Option<Toast> {
        self.inner.state().toasts.iter().find(|t| t.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.state().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state().toasts.is_empty()
    }

    /// Cancel all pending timers and drop every active toast.
    pub fn shutdown(&self) {
        let (toasts, timers) = {
            let mut state = self.inner.state();
            (
                std::mem::take(&mut state.toasts),
                std::mem::take(&mut state.timers),
            )
        };
        for (_, handles) in timers {
            handles.abort();
        }
        debug!(dropped = toasts.len(), "toast manager shut down");
    }

    fn spawn_expiry(&self, id: ToastId, duration: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            debug!(id = %id, "toast lifetime elapsed");
            // Goes through the normal removal path; a racing explicit remove
            // already made this a no-op.
            manager.remove(id);
        })
    }

    fn spawn_progress(&self, id: ToastId, duration: Duration) -> JoinHandle<()> {
        let inner = self.inner.clone();
        let end = Instant::now() + duration;
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(PROGRESS_TICK);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tick.tick().await;
                let remaining = end.saturating_duration_since(Instant::now());
                let pct = if duration.is_zero() {
                    0.0
                } else {
                    (remaining.as_secs_f32() / duration.as_secs_f32() * 100.0).max(0.0)
                };
                let mut state = inner.state();
                // The toast may have been removed between ticks; stop quietly.
                let Some(toast) = state.toasts.iter_mut().find(|t| t.id == id) else {
                    break;
                };
                toast.remaining_pct = pct;
                if pct <= 0.0 {
                    break;
                }
            }
        })
    }
}

fn remove_locked(state: &mut State, id: ToastId) -> Option<TimerHandles> {
    let index = state.toasts.iter().position(|t| t.id == id)?;
    state.toasts.remove(index);
    // Unbounded toasts have no timer entry; hand back empty handles so the
    // caller's abort is still a no-op rather than a special case.
    Some(state.timers.remove(&id).unwrap_or_default())
}
