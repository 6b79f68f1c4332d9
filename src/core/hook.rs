use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Single subscriber notified when a credential refresh fails.
#[derive(Default)]
pub(crate) struct UnauthorizedHook {
    slot: Mutex<Option<(u64, Callback)>>,
    next_id: AtomicU64,
}

impl UnauthorizedHook {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Install `callback`, replacing any previous subscriber.
    pub(crate) fn register<F>(self: &Arc<Self>, callback: F) -> Registration
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *self.lock() = Some((id, Arc::new(callback)));
        Registration {
            hook: Arc::downgrade(self),
            id,
        }
    }

    /// Run the subscriber, if any. The lock is released before the call so the
    /// callback may register or drop registrations itself.
    pub(crate) fn fire(&self) -> bool {
        let callback = self.lock().as_ref().map(|(_, callback)| callback.clone());
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<(u64, Callback)>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle of a registered unauthorized callback. Dropping it deregisters the
/// callback unless it has been replaced already.
#[must_use = "dropping the registration removes the callback"]
pub struct Registration {
    hook: Weak<UnauthorizedHook>,
    id: u64,
}

impl Registration {
    pub fn unregister(self) {}
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(hook) = self.hook.upgrade() {
            let mut slot = hook.lock();
            if matches!(slot.as_ref(), Some((id, _)) if *id == self.id) {
                *slot = None;
            }
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}
