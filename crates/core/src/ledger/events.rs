//! Fire-and-forget observer hooks.
//!
//! Subscribers receive post-commit notifications. A subscriber that panics
//! or returns an error never aborts the ledger operation that triggered it;
//! failures are logged and swallowed. No subscriber may mutate ledger state
//! from within its callback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use netledger_shared::types::{AccountId, EntryId};

/// A notification emitted by the ledger engine after a state change commits.
#[derive(Debug, Clone)]
pub enum LedgerEvent {
    /// An account was created.
    AccountCreated { account_guid: AccountId },
    /// An account and all of its entries were deleted.
    AccountDeleted { account_guid: AccountId },
    /// A Credit or Debit entry was added in pending state.
    EntryAdded {
        account_guid: AccountId,
        entry_guid: EntryId,
    },
    /// A pending entry was canceled.
    EntryCanceled {
        account_guid: AccountId,
        entry_guid: EntryId,
    },
    /// A commit extended the balance chain.
    EntriesCommitted {
        account_guid: AccountId,
        balance_guid: EntryId,
        entry_guids: Vec<EntryId>,
        new_balance: Decimal,
        committed_utc: DateTime<Utc>,
    },
}

/// A subscriber callback registration.
pub trait EventSubscriber: Send + Sync {
    /// Handles a single event. Errors are logged by the bus and discarded.
    fn on_event(&self, event: &LedgerEvent);
}

/// Blanket impl so any `Fn(&LedgerEvent)` closure can subscribe directly.
impl<F> EventSubscriber for F
where
    F: Fn(&LedgerEvent) + Send + Sync,
{
    fn on_event(&self, event: &LedgerEvent) {
        self(event);
    }
}

/// Dispatches events to every registered subscriber.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Vec<Arc<dyn EventSubscriber>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Order of delivery matches registration order.
    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Delivers `event` to every subscriber, logging and continuing past
    /// any subscriber that panics.
    pub fn publish(&self, event: LedgerEvent) {
        for subscriber in &self.subscribers {
            let subscriber = subscriber.clone();
            let event_ref = &event;
            if let Err(panic) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                subscriber.on_event(event_ref);
            })) {
                tracing::warn!(?panic, "ledger event subscriber panicked, continuing");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_publish_delivers_to_all_subscribers() {
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c1 = count.clone();
        bus.subscribe(Arc::new(move |_: &LedgerEvent| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = count.clone();
        bus.subscribe(Arc::new(move |_: &LedgerEvent| {
            c2.fetch_add(1, Ordering::SeqCst);
        }));

        bus.publish(LedgerEvent::AccountCreated {
            account_guid: AccountId::new(),
        });

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicking_subscriber_does_not_stop_delivery() {
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        bus.subscribe(Arc::new(|_: &LedgerEvent| panic!("boom")));
        let c = count.clone();
        bus.subscribe(Arc::new(move |_: &LedgerEvent| {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        bus.publish(LedgerEvent::AccountCreated {
            account_guid: AccountId::new(),
        });

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
