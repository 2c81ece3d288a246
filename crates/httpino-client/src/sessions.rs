//! Registry of named, long-lived client handles
//!
//! Tests and tools often want one client per role ("admin", "anonymous", ...)
//! that is created on first use and reused afterwards. [`Sessions`] hands
//! out shared handles by name and closes them all when its owner shuts down.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::debug;

/// Name used by [`Sessions::get_default`]
pub const DEFAULT_SESSION: &str = "DEFAULT";

/// A handle that owns resources needing explicit release
pub trait Session: Send + Sync {
    fn close(&self);
}

type Factory<S> = Box<dyn Fn(&str) -> S + Send + Sync>;

/// Filled once by the factory; empty while it runs or after it panicked
type Slot<S> = Arc<OnceLock<Arc<S>>>;

pub struct Sessions<S: Session> {
    factory: Factory<S>,
    handles: Mutex<HashMap<String, Slot<S>>>,
}

impl<S: Session> Sessions<S> {
    /// Creates an empty registry. `factory` builds a handle the first time a
    /// name is requested.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&str) -> S + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// The handle registered under `name`, created if necessary.
    ///
    /// Concurrent callers asking for the same new name get the same handle;
    /// the factory runs once per name. The factory runs outside the registry
    /// lock, so it may look up other names, and a slow factory only holds up
    /// callers waiting for that same name. Asking for the name being created
    /// from inside its own factory deadlocks.
    pub fn get(&self, name: &str) -> Arc<S> {
        let slot = Arc::clone(self.lock().entry(name.to_string()).or_default());

        let handle = slot.get_or_init(|| {
            debug!(session = name, "creating session");
            Arc::new((self.factory)(name))
        });
        Arc::clone(handle)
    }

    /// The handle named [`DEFAULT_SESSION`]
    pub fn get_default(&self) -> Arc<S> {
        self.get(DEFAULT_SESSION)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock()
            .get(name)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of handles created and not yet closed
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every handle from the registry and closes it.
    ///
    /// Returns how many handles were closed. Handles are closed outside the
    /// registry lock, so `close` implementations may use the registry.
    /// Later `get` calls start a fresh set of handles. A handle whose factory
    /// is still running when `close` is called is not registered afterwards
    /// and is left to its caller.
    pub fn close(&self) -> usize {
        let drained: Vec<(String, Slot<S>)> = self.lock().drain().collect();
        let mut count = 0;
        for (name, slot) in drained {
            if let Some(handle) = slot.get() {
                debug!(session = %name, "closing session");
                handle.close();
                count += 1;
            }
        }
        count
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot<S>>> {
        // A panic elsewhere in the process must not wedge every later caller
        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: Session + Default + 'static> Default for Sessions<S> {
    fn default() -> Self {
        Self::new(|_| S::default())
    }
}

impl<S: Session> Drop for Sessions<S> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::{Barrier, Weak};
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct Client {
        name: String,
        closed: AtomicUsize,
    }

    impl Session for Client {
        fn close(&self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn registry(created: Arc<AtomicUsize>) -> Sessions<Client> {
        Sessions::new(move |name| {
            created.fetch_add(1, Ordering::SeqCst);
            Client {
                name: name.to_string(),
                closed: AtomicUsize::new(0),
            }
        })
    }

    #[test]
    fn test_get_reuses_handle() {
        let sessions = registry(Arc::new(AtomicUsize::new(0)));

        let first = sessions.get("admin");
        let second = sessions.get("admin");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name, "admin");
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_default_session_name() {
        let sessions = registry(Arc::new(AtomicUsize::new(0)));

        let default = sessions.get_default();

        assert_eq!(default.name, DEFAULT_SESSION);
        assert!(sessions.contains("DEFAULT"));
        assert!(Arc::ptr_eq(&default, &sessions.get("DEFAULT")));
    }

    #[test]
    fn test_factory_runs_once_under_contention() {
        let created = Arc::new(AtomicUsize::new(0));
        let sessions = Arc::new(registry(Arc::clone(&created)));
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let sessions = Arc::clone(&sessions);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    sessions.get("shared")
                })
            })
            .collect();

        let clients: Vec<Arc<Client>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert!(clients.iter().all(|c| Arc::ptr_eq(c, &clients[0])));
    }

    #[test]
    fn test_close_closes_each_handle_once() {
        let sessions = registry(Arc::new(AtomicUsize::new(0)));
        let a = sessions.get("a");
        let b = sessions.get("b");

        assert_eq!(sessions.close(), 2);
        assert_eq!(sessions.close(), 0);

        assert_eq!(a.closed.load(Ordering::SeqCst), 1);
        assert_eq!(b.closed.load(Ordering::SeqCst), 1);
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_get_after_close_creates_new_handle() {
        let created = Arc::new(AtomicUsize::new(0));
        let sessions = registry(Arc::clone(&created));

        let before = sessions.get("a");
        sessions.close();
        let after = sessions.get("a");

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(created.load(Ordering::SeqCst), 2);
        assert_eq!(after.closed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_closes_remaining_handles() {
        let handle = {
            let sessions = registry(Arc::new(AtomicUsize::new(0)));
            sessions.get("leftover")
        };
        assert_eq!(handle.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_registry_uses_default_handles() {
        let sessions: Sessions<Client> = Sessions::default();
        assert_eq!(sessions.get("anything").name, "");
    }

    #[test]
    fn test_poisoned_registry_still_usable() {
        let sessions = Arc::new(Sessions::new(|name: &str| {
            if name == "boom" {
                panic!("factory failure");
            }
            Client::default()
        }));

        let poisoner = Arc::clone(&sessions);
        assert!(thread::spawn(move || poisoner.get("boom")).join().is_err());

        assert_eq!(sessions.get("fine").name, "");
        assert!(!sessions.contains("boom"));
    }

    #[test]
    fn test_factory_may_look_up_other_names() {
        let this: Arc<OnceLock<Weak<Sessions<Client>>>> = Arc::new(OnceLock::new());
        let handle_to_self = Arc::clone(&this);
        let sessions = Arc::new(Sessions::new(move |name: &str| {
            let name = match name {
                "derived" => {
                    let registry = handle_to_self.get().and_then(Weak::upgrade).unwrap();
                    format!("derived-from-{}", registry.get("base").name)
                }
                other => other.to_string(),
            };
            Client {
                name,
                closed: AtomicUsize::new(0),
            }
        }));
        this.set(Arc::downgrade(&sessions)).unwrap();

        assert_eq!(sessions.get("derived").name, "derived-from-base");
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_slow_factory_does_not_block_other_names() {
        let (started_tx, started_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let started_tx = Mutex::new(started_tx);
        let release_rx = Mutex::new(release_rx);

        let sessions = Arc::new(Sessions::new(move |name: &str| {
            if name == "slow" {
                started_tx.lock().unwrap().send(()).unwrap();
                release_rx.lock().unwrap().recv().unwrap();
            }
            Client {
                name: name.to_string(),
                closed: AtomicUsize::new(0),
            }
        }));

        let slow_sessions = Arc::clone(&sessions);
        let slow = thread::spawn(move || slow_sessions.get("slow"));
        started_rx.recv_timeout(Duration::from_secs(10)).unwrap();

        // The "slow" factory is parked; other names must still resolve
        assert_eq!(sessions.get("fast").name, "fast");
        assert!(!sessions.contains("slow"));

        release_tx.send(()).unwrap();
        assert_eq!(slow.join().unwrap().name, "slow");
        assert!(sessions.contains("slow"));
        assert_eq!(sessions.len(), 2);
    }
}
