// src/events/bus/event_bus.rs
//
// In-process, synchronous publish/subscribe.
//
// Services emit facts; interested parties subscribe by event type.
// Handlers run on the emitting thread in subscription order, so anything
// slow (email delivery) must be handed off rather than done inline.

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::events::types::DomainEvent;

type EventHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Entries kept by `EventBus::new`; older ones are evicted first
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 512;

/// Typed event bus shared by all services
///
/// Cloning yields another handle onto the same subscriptions and log.
/// The log holds only the most recent `log_capacity` emissions.
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<TypeId, Vec<EventHandler>>>>,
    event_log: Arc<RwLock<VecDeque<EventLogEntry>>>,
    log_capacity: usize,
}

/// One emitted event, as recorded in the bus log
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_log_capacity(DEFAULT_EVENT_LOG_CAPACITY)
    }

    /// Zero disables the log entirely
    pub fn with_log_capacity(log_capacity: usize) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            event_log: Arc::new(RwLock::new(VecDeque::with_capacity(log_capacity))),
            log_capacity,
        }
    }

    /// Register `handler` for every future emission of `E`
    ///
    /// ```ignore
    /// bus.subscribe::<RequestCreated, _>(|event| {
    ///     log::info!("Request created: {}", event.request_id);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let erased: EventHandler = Box::new(move |any: &dyn Any| match any.downcast_ref::<E>() {
            Some(event) => handler(event),
            None => log::error!(
                "Failed to downcast event in handler for {}",
                std::any::type_name::<E>()
            ),
        });

        write_lock(&self.handlers)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
    }

    /// Record `event` and run its handlers before returning
    ///
    /// A panicking handler is logged and skipped; the remaining handlers
    /// still run.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let handlers = read_lock(&self.handlers);
        let subscribed = handlers.get(&TypeId::of::<E>());

        let entry = EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count: subscribed.map_or(0, Vec::len),
        };
        log::debug!(
            "[EVENT] {} (id: {}) | {} handlers",
            entry.event_type,
            entry.event_id,
            entry.handler_count
        );
        if self.log_capacity > 0 {
            let mut log = write_lock(&self.event_log);
            if log.len() == self.log_capacity {
                log.pop_front();
            }
            log.push_back(entry);
        }

        for (idx, handler) in subscribed.into_iter().flatten().enumerate() {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| handler(&event as &dyn Any))) {
                log::error!(
                    "Handler {} for {} panicked: {:?}",
                    idx,
                    event.event_type(),
                    panic
                );
            }
        }
    }

    /// Oldest first
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        read_lock(&self.event_log).iter().cloned().collect()
    }

    pub fn clear_event_log(&self) {
        write_lock(&self.event_log).clear();
    }

    pub fn subscriber_count<E>(&self) -> usize
    where
        E: 'static,
    {
        read_lock(&self.handlers)
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

// A handler panic is already caught in `emit`, so a poisoned lock still
// guards consistent data.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// Make EventBus cloneable (shared reference)
impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            event_log: Arc::clone(&self.event_log),
            log_capacity: self.log_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    #[test]
    fn test_subscribe_and_emit() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        bus.subscribe::<RequestCreated, _>(move |_event| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(RequestCreated::new(Uuid::new_v4(), Uuid::new_v4()));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_multiple_handlers_execute_in_order() {
        let bus = EventBus::new();
        let sequence = Arc::new(RwLock::new(Vec::new()));

        for n in 1..=3 {
            let seq = Arc::clone(&sequence);
            bus.subscribe::<RequestConfirmed, _>(move |_| {
                seq.write().unwrap().push(n);
            });
        }

        bus.emit(RequestConfirmed::new(Uuid::new_v4(), Uuid::new_v4()));

        assert_eq!(*sequence.read().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_handlers_only_receive_their_event_type() {
        let bus = EventBus::new();
        let created = Arc::new(AtomicUsize::new(0));
        let created_clone = Arc::clone(&created);

        bus.subscribe::<RequestCreated, _>(move |_| {
            created_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(RequestMatched::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 1.5));

        assert_eq!(created.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_event_log_records_emissions() {
        let bus = EventBus::new();

        bus.emit(RequestCreated::new(Uuid::new_v4(), Uuid::new_v4()));
        bus.emit(RequestConfirmed::new(Uuid::new_v4(), Uuid::new_v4()));

        let log = bus.get_event_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].event_type, "RequestCreated");
        assert_eq!(log[1].event_type, "RequestConfirmed");

        bus.clear_event_log();
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_event_log_evicts_oldest_at_capacity() {
        let bus = EventBus::with_log_capacity(3);
        let events: Vec<RequestCreated> = (0..5)
            .map(|_| RequestCreated::new(Uuid::new_v4(), Uuid::new_v4()))
            .collect();
        let event_ids: Vec<String> = events.iter().map(|e| e.event_id.to_string()).collect();

        for event in events {
            bus.emit(event);
        }

        let logged: Vec<String> = bus.get_event_log().into_iter().map(|e| e.event_id).collect();
        assert_eq!(logged, event_ids[2..].to_vec());

        for _ in 0..100 {
            bus.emit(RequestConfirmed::new(Uuid::new_v4(), Uuid::new_v4()));
        }
        assert_eq!(bus.get_event_log().len(), 3);
        assert!(bus
            .get_event_log()
            .iter()
            .all(|entry| entry.event_type == "RequestConfirmed"));
    }

    #[test]
    fn test_zero_capacity_disables_log_but_not_handlers() {
        let bus = EventBus::with_log_capacity(0);
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        bus.subscribe::<RequestCreated, _>(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(RequestCreated::new(Uuid::new_v4(), Uuid::new_v4()));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_subscriber_count() {
        let bus = EventBus::new();

        assert_eq!(bus.subscriber_count::<RequestCreated>(), 0);

        bus.subscribe::<RequestCreated, _>(|_| {});
        bus.subscribe::<RequestCreated, _>(|_| {});
        assert_eq!(bus.subscriber_count::<RequestCreated>(), 2);

        assert_eq!(bus.subscriber_count::<RequestConfirmed>(), 0);
    }

    #[test]
    fn test_handler_panic_doesnt_break_bus() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe::<RequestCreated, _>(|_| {
            panic!("Intentional panic");
        });

        let counter_clone = Arc::clone(&counter);
        bus.subscribe::<RequestCreated, _>(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(RequestCreated::new(Uuid::new_v4(), Uuid::new_v4()));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
