//! Typed event dispatch with explicit subscription lifetimes.
//!
//! A handler stays registered for exactly as long as its [`Subscription`] is
//! alive, unless the subscription is detached on purpose.

use std::sync::{Arc, Mutex, Weak};
use tracing::error;

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }
}

trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: u64);
}

impl<E> Unsubscribe for Mutex<Registry<E>> {
    fn unsubscribe(&self, id: u64) {
        match self.lock() {
            Ok(mut registry) => registry.handlers.retain(|(handler_id, _)| *handler_id != id),
            Err(e) => error!("Failed to acquire event registry lock: {e}"),
        }
    }
}

/// Broadcasts events of type `E` to every live subscriber
pub struct Dispatcher<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for Dispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for Dispatcher<E> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }
}

impl<E: 'static> Dispatcher<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`; it is removed again when the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = match self.registry.lock() {
            Ok(mut registry) => {
                let id = registry.next_id;
                registry.next_id += 1;
                registry.handlers.push((id, Arc::new(handler)));
                id
            }
            Err(e) => {
                error!("Failed to acquire event registry lock: {e}");
                return Subscription::inert();
            }
        };

        let registry = Arc::downgrade(&self.registry);
        let registry: Weak<dyn Unsubscribe> = registry;
        Subscription {
            id,
            registry: Some(registry),
        }
    }

    /// Deliver `event` to every subscriber and return how many were called.
    ///
    /// Handlers run outside the registry lock, so they may subscribe or
    /// unsubscribe while being called.
    pub fn emit(&self, event: &E) -> usize {
        let handlers: Vec<Handler<E>> = match self.registry.lock() {
            Ok(registry) => registry
                .handlers
                .iter()
                .map(|(_, handler)| Arc::clone(handler))
                .collect(),
            Err(e) => {
                error!("Failed to acquire event registry lock: {e}");
                return 0;
            }
        };

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .map(|registry| registry.handlers.len())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every handler, including detached ones.
    pub fn clear(&self) {
        match self.registry.lock() {
            Ok(mut registry) => registry.handlers.clear(),
            Err(e) => error!("Failed to acquire event registry lock: {e}"),
        }
    }
}

/// Handle that keeps an event handler registered
#[must_use = "dropping a Subscription unregisters its handler"]
pub struct Subscription {
    id: u64,
    registry: Option<Weak<dyn Unsubscribe>>,
}

impl Subscription {
    fn inert() -> Self {
        Self {
            id: 0,
            registry: None,
        }
    }

    /// Unregister the handler now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keep the handler registered for the lifetime of the dispatcher.
    pub fn detach(mut self) {
        self.registry = None;
    }

    fn release(&mut self) {
        if let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) {
            registry.unsubscribe(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.registry.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_reaches_every_subscriber() {
        let dispatcher = Dispatcher::<u32>::new();
        let total = Arc::new(AtomicUsize::new(0));

        let first = {
            let total = Arc::clone(&total);
            dispatcher.subscribe(move |n| {
                total.fetch_add(*n as usize, Ordering::SeqCst);
            })
        };
        let second = {
            let total = Arc::clone(&total);
            dispatcher.subscribe(move |n| {
                total.fetch_add(*n as usize, Ordering::SeqCst);
            })
        };

        assert_eq!(dispatcher.emit(&5), 2);
        assert_eq!(total.load(Ordering::SeqCst), 10);
        drop((first, second));
    }

    #[test]
    fn test_dropping_subscription_unregisters() {
        let dispatcher = Dispatcher::<()>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let subscription = {
            let calls = Arc::clone(&calls);
            dispatcher.subscribe(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        dispatcher.emit(&());
        drop(subscription);
        dispatcher.emit(&());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let dispatcher = Dispatcher::<()>::new();
        let subscription = dispatcher.subscribe(|_| {});
        assert_eq!(dispatcher.len(), 1);
        subscription.unsubscribe();
        assert_eq!(dispatcher.len(), 0);
    }

    #[test]
    fn test_detached_subscription_survives() {
        let dispatcher = Dispatcher::<()>::new();
        dispatcher.subscribe(|_| {}).detach();
        assert_eq!(dispatcher.emit(&()), 1);

        dispatcher.clear();
        assert_eq!(dispatcher.emit(&()), 0);
    }

    #[test]
    fn test_subscription_outliving_dispatcher() {
        let dispatcher = Dispatcher::<()>::new();
        let subscription = dispatcher.subscribe(|_| {});
        drop(dispatcher);
        drop(subscription);
    }

    #[test]
    fn test_handler_may_subscribe_during_emit() {
        let dispatcher = Dispatcher::<()>::new();
        let inner = dispatcher.clone();
        dispatcher
            .subscribe(move |_| inner.subscribe(|_| {}).detach())
            .detach();

        dispatcher.emit(&());
        assert_eq!(dispatcher.len(), 2);
    }
}
