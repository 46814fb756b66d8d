//! Single-slot inbound handler registration.
//!
//! The bridge keeps at most one registration. Registering again replaces the
//! previous one and closes its channel, so an inbound message is handed to at
//! most one subscriber no matter how often the consumer re-registers.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::mpsc;

use crate::domain::Message;

struct Registration {
    id: u64,
    tx: mpsc::UnboundedSender<Message>,
}

#[derive(Default)]
struct RegistryInner {
    slot: Mutex<Option<Registration>>,
    next_id: AtomicU64,
}

/// Shared between the bridge, its connection task and live subscriptions.
#[derive(Clone, Default)]
pub(crate) struct InboundRegistry {
    inner: Arc<RegistryInner>,
}

impl InboundRegistry {
    fn slot(&self) -> MutexGuard<'_, Option<Registration>> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the active registration with a fresh one.
    pub(crate) fn register(&self) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        let previous = self.slot().replace(Registration { id, tx });
        if let Some(previous) = previous {
            tracing::debug!(
                replaced = previous.id,
                id,
                "inbound handler re-registered"
            );
        }

        Subscription {
            id,
            rx,
            registry: self.clone(),
        }
    }

    /// Hand a message to the active subscriber. Returns `false` when nobody
    /// is listening and the message was dropped.
    pub(crate) fn deliver(&self, message: Message) -> bool {
        let mut slot = self.slot();
        let Some(registration) = slot.as_ref() else {
            tracing::debug!("no inbound handler registered; message dropped");
            return false;
        };
        if registration.tx.send(message).is_err() {
            tracing::debug!(id = registration.id, "inbound handler gone; message dropped");
            *slot = None;
            return false;
        }
        true
    }

    /// Drop the registration `id` if it is still the active one.
    pub(crate) fn release(&self, id: u64) {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|registration| registration.id == id) {
            *slot = None;
            tracing::debug!(id, "inbound handler released");
        }
    }

    /// Drop whatever registration is active.
    pub(crate) fn clear(&self) {
        self.slot().take();
    }

    pub(crate) fn is_registered(&self) -> bool {
        self.slot().is_some()
    }
}

/// Receiving end of an inbound handler registration.
///
/// Dropping it deregisters the handler. Once a newer subscription replaces
/// this one, or the bridge is torn down, `recv` returns `None`.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<Message>,
    registry: InboundRegistry,
}

impl Subscription {
    /// Wait for the next inbound message.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Take an already delivered message without waiting.
    pub fn try_recv(&mut self) -> Option<Message> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockLabel, MessageText, Sender};

    fn message(text: &str) -> Message {
        Message::new(
            MessageText::new(text.to_string()).unwrap(),
            Sender::new("Bob"),
            ClockLabel::new("10:05"),
        )
    }

    #[test]
    fn test_deliver_without_handler_drops() {
        // テスト項目: ハンドラ未登録時のメッセージは破棄される
        // given (前提条件):
        let registry = InboundRegistry::default();

        // when (操作):
        let delivered = registry.deliver(message("hi"));

        // then (期待する結果):
        assert!(!delivered);
        assert!(!registry.is_registered());
    }

    #[test]
    fn test_deliver_to_registered_handler() {
        // テスト項目: 登録済みハンドラにメッセージが届く
        // given (前提条件):
        let registry = InboundRegistry::default();
        let mut subscription = registry.register();

        // when (操作):
        let delivered = registry.deliver(message("hi"));

        // then (期待する結果):
        assert!(delivered);
        assert_eq!(subscription.try_recv(), Some(message("hi")));
        assert_eq!(subscription.try_recv(), None);
    }

    #[test]
    fn test_reregister_delivers_exactly_once() {
        // テスト項目: 2 回登録しても 1 件のメッセージは 1 回だけ届く
        // given (前提条件):
        let registry = InboundRegistry::default();
        let mut first = registry.register();
        let mut second = registry.register();

        // when (操作):
        registry.deliver(message("hi"));

        // then (期待する結果):
        assert_eq!(second.try_recv(), Some(message("hi")));
        assert_eq!(second.try_recv(), None);
        assert_eq!(first.try_recv(), None);
    }

    #[test]
    fn test_drop_stale_subscription_keeps_newer_one() {
        // テスト項目: 古い購読を破棄しても新しい購読は解除されない
        // given (前提条件):
        let registry = InboundRegistry::default();
        let first = registry.register();
        let mut second = registry.register();

        // when (操作):
        drop(first);
        registry.deliver(message("hi"));

        // then (期待する結果):
        assert!(registry.is_registered());
        assert_eq!(second.try_recv(), Some(message("hi")));
    }

    #[test]
    fn test_drop_subscription_releases_registration() {
        // テスト項目: 購読を破棄すると登録が解除される
        // given (前提条件):
        let registry = InboundRegistry::default();
        let subscription = registry.register();

        // when (操作):
        drop(subscription);

        // then (期待する結果):
        assert!(!registry.is_registered());
        assert!(!registry.deliver(message("hi")));
    }

    #[tokio::test]
    async fn test_clear_closes_subscription() {
        // テスト項目: clear すると購読側の recv が None を返す
        // given (前提条件):
        let registry = InboundRegistry::default();
        let mut subscription = registry.register();

        // when (操作):
        registry.clear();

        // then (期待する結果):
        assert_eq!(subscription.recv().await, None);
    }
}
