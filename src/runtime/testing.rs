//! Mock implementations for testing
//!
//! These mocks enable end-to-end testing of session runtimes without a
//! chat platform.

use super::traits::*;
use super::{InMemorySessionStore, Inbound, RuntimeManager, EVENT_QUEUE_DEPTH};
use crate::state_machine::{Event, MenuItem, OutboundMessage, UserId};
use crate::vitals::MeasurementKind;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub const OPERATOR: ChatId = ChatId(999);
pub const USER: UserId = UserId(1001);

// ============================================================================
// Mock Transport
// ============================================================================

/// Transport that records every message instead of sending it
pub struct MockTransport {
    /// Record of all deliveries, successful or not
    pub sent: Mutex<Vec<(ChatId, OutboundMessage)>>,
    outbox: mpsc::UnboundedSender<(ChatId, OutboundMessage)>,
    failing: bool,
    /// Sends to this chat are recorded but never complete
    stalled: Option<ChatId>,
}

impl MockTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(ChatId, OutboundMessage)>) {
        let (outbox, rx) = mpsc::unbounded_channel();
        (
            Self {
                sent: Mutex::new(Vec::new()),
                outbox,
                failing: false,
                stalled: None,
            },
            rx,
        )
    }

    /// Every send reports an API error (after being recorded)
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Sends to `chat` hang, like a Bot API that stopped answering
    pub fn stalling(mut self, chat: ChatId) -> Self {
        self.stalled = Some(chat);
        self
    }

    pub fn recorded(&self) -> Vec<(ChatId, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send(&self, chat: ChatId, message: &OutboundMessage) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push((chat, message.clone()));
        let _ = self.outbox.send((chat, message.clone()));
        if self.stalled == Some(chat) {
            std::future::pending::<()>().await;
        }
        if self.failing {
            return Err(TransportError::Api {
                code: Some(403),
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Test Runtime
// ============================================================================

/// Helper for driving session runtimes with minimal boilerplate
pub struct TestRuntime {
    pub store: Arc<InMemorySessionStore>,
    pub transport: Arc<MockTransport>,
    pub manager: RuntimeManager<InMemorySessionStore, MockTransport>,
    outbox: mpsc::UnboundedReceiver<(ChatId, OutboundMessage)>,
}

impl TestRuntime {
    pub fn new() -> Self {
        let (transport, outbox) = MockTransport::new();
        Self::with_transport(transport, outbox)
    }

    pub fn failing() -> Self {
        let (transport, outbox) = MockTransport::new();
        Self::with_transport(transport.failing(), outbox)
    }

    /// Replies to `user` never finish sending
    pub fn stalling(user: UserId) -> Self {
        let (transport, outbox) = MockTransport::new();
        Self::with_transport(transport.stalling(ChatId(user.0)), outbox)
    }

    fn with_transport(
        transport: MockTransport,
        outbox: mpsc::UnboundedReceiver<(ChatId, OutboundMessage)>,
    ) -> Self {
        let store = Arc::new(InMemorySessionStore::new());
        let transport = Arc::new(transport);
        let manager = RuntimeManager::new(store.clone(), transport.clone(), OPERATOR);
        Self {
            store,
            transport,
            manager,
            outbox,
        }
    }

    /// Send an event as `user`, from the user's private chat
    pub async fn send_as(&self, user: UserId, event: Event) {
        self.manager
            .send_event(
                user,
                Inbound {
                    chat: ChatId(user.0),
                    event,
                },
            )
            .await
            .expect("Failed to send event");
    }

    pub async fn send(&self, event: Event) {
        self.send_as(USER, event).await;
    }

    pub async fn start(&self) {
        self.send(Event::Start {
            name: "Sari".to_string(),
        })
        .await;
    }

    pub async fn select(&self, kind: MeasurementKind) {
        self.send(Event::MenuSelection(MenuItem::Measure(kind))).await;
    }

    pub async fn text(&self, text: &str) {
        self.send(Event::FreeText(text.to_string())).await;
    }

    pub async fn submit(&self) {
        self.send(Event::MenuSelection(MenuItem::Submit)).await;
    }

    pub async fn cancel(&self) {
        self.send(Event::Cancel).await;
    }

    /// Wait for the next delivered message
    pub async fn next_message(&mut self) -> (ChatId, OutboundMessage) {
        tokio::time::timeout(Duration::from_secs(2), self.outbox.recv())
            .await
            .expect("Timed out waiting for a message")
            .expect("Transport dropped")
    }

    /// Wait for the next message and return its text
    pub async fn next_text(&mut self) -> String {
        self.next_message().await.1.text
    }

    /// Wait until every runtime has retired
    pub async fn wait_until_retired(&self) -> bool {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.manager.active_sessions().await > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .is_ok()
    }

    /// True if nothing is delivered within a short grace period
    pub async fn is_quiet(&mut self) -> bool {
        tokio::time::timeout(Duration::from_millis(100), self.outbox.recv())
            .await
            .is_err()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::{Session, SessionState, TextFormat};
    use crate::vitals::Measurement;

    #[tokio::test]
    async fn test_mock_transport_records() {
        let (transport, mut rx) = MockTransport::new();
        transport
            .send(ChatId(1), &OutboundMessage::plain("halo"))
            .await
            .unwrap();

        assert_eq!(transport.recorded().len(), 1);
        let (chat, message) = rx.recv().await.unwrap();
        assert_eq!(chat, ChatId(1));
        assert_eq!(message.text, "halo");

        let (failing, _rx) = MockTransport::new();
        let failing = failing.failing();
        assert!(failing
            .send(ChatId(1), &OutboundMessage::plain("halo"))
            .await
            .is_err());
    }

    /// start → TD → 120/80 → submit: healthy report, no alert
    #[tokio::test]
    async fn test_healthy_submission_flow() {
        let mut rt = TestRuntime::new();

        rt.start().await;
        let (chat, greeting) = rt.next_message().await;
        assert_eq!(chat, ChatId(USER.0));
        assert!(greeting.text.contains("Sistem SIGAR"));
        assert_eq!(greeting.format, TextFormat::Markdown);
        assert!(greeting.with_menu);

        rt.select(MeasurementKind::BloodPressure).await;
        assert_eq!(rt.next_text().await, "Masukkan nilai TD:\n(Contoh: 120/80)");

        rt.text("120/80").await;
        assert!(rt.next_text().await.starts_with("✅ TD = 120/80 tersimpan"));

        rt.submit().await;
        let report = rt.next_text().await;
        assert!(report.contains("TD: 120/80"));
        assert!(report.contains("✅ SEHAT"));

        assert!(rt.is_quiet().await, "no alert expected");
        assert!(rt.store.is_empty());
    }

    /// A crisis alerts the operator and clears the session
    #[tokio::test]
    async fn test_crisis_alerts_operator() {
        let mut rt = TestRuntime::new();

        rt.select(MeasurementKind::BloodPressure).await;
        rt.next_message().await;
        rt.text("190/130").await;
        rt.next_message().await;

        rt.submit().await;
        let (chat, report) = rt.next_message().await;
        assert_eq!(chat, ChatId(USER.0));
        assert!(report.text.contains("🆘 KRISIS HIPERTENSI"));

        let (chat, alert) = rt.next_message().await;
        assert_eq!(chat, OPERATOR);
        assert!(alert.text.contains("1001"));
        assert!(alert.text.contains("190/130"));
        assert_eq!(alert.format, TextFormat::Plain);

        rt.submit().await;
        assert_eq!(rt.next_text().await, "❌ Belum ada data yang dimasukkan");
    }

    /// Rejections keep the pending kind so the user can retry directly
    #[tokio::test]
    async fn test_rejected_value_can_be_retried() {
        let mut rt = TestRuntime::new();

        rt.select(MeasurementKind::HeartRate).await;
        rt.next_message().await;

        rt.text("abc").await;
        assert_eq!(rt.next_text().await, "HR harus angka");
        rt.text("250").await;
        assert_eq!(rt.next_text().await, "HR di luar rentang (30-200)");
        assert_eq!(
            rt.store.get(USER).state,
            SessionState::AwaitingValue {
                kind: MeasurementKind::HeartRate
            }
        );

        rt.text("72").await;
        assert!(rt.next_text().await.starts_with("✅ HR = 72 tersimpan"));
        assert_eq!(
            rt.store.get(USER).measurements.get(MeasurementKind::HeartRate),
            Some(&Measurement::HeartRate { bpm: 72 })
        );
    }

    /// Cancel drops everything; a value without a selected kind is refused
    #[tokio::test]
    async fn test_cancel_clears_session() {
        let mut rt = TestRuntime::new();

        rt.select(MeasurementKind::Temperature).await;
        rt.next_message().await;
        rt.text("36.8").await;
        rt.next_message().await;
        rt.select(MeasurementKind::HeartRate).await;
        rt.next_message().await;

        rt.cancel().await;
        let (_, cancelled) = rt.next_message().await;
        assert_eq!(cancelled.text, "❌ Input dibatalkan");
        assert!(cancelled.with_menu);
        assert!(rt.store.is_empty());

        rt.text("80").await;
        assert_eq!(
            rt.next_text().await,
            "Silakan pilih parameter terlebih dahulu"
        );
        assert_eq!(rt.store.get(USER), Session::default());
    }

    /// Interleaved users never see each other's data
    #[tokio::test]
    async fn test_users_are_isolated() {
        let mut rt = TestRuntime::new();
        let other = UserId(2002);

        rt.select(MeasurementKind::HeartRate).await;
        rt.next_message().await;
        rt.send_as(other, Event::MenuSelection(MenuItem::Measure(MeasurementKind::Temperature)))
            .await;
        rt.next_message().await;

        rt.text("72").await;
        rt.next_message().await;
        rt.send_as(other, Event::FreeText("38.5".to_string())).await;
        rt.next_message().await;

        let mine = rt.store.get(USER);
        let theirs = rt.store.get(other);
        assert_eq!(mine.measurements.len(), 1);
        assert!(mine.measurements.get(MeasurementKind::HeartRate).is_some());
        assert_eq!(theirs.measurements.len(), 1);
        assert!(theirs.measurements.get(MeasurementKind::Temperature).is_some());
        assert_eq!(rt.manager.active_sessions().await, 2);
    }

    /// Delivery failures are dropped; the session keeps working
    #[tokio::test]
    async fn test_delivery_failure_is_not_fatal() {
        let mut rt = TestRuntime::failing();

        rt.select(MeasurementKind::BloodPressure).await;
        rt.next_message().await;
        rt.text("200/125").await;
        rt.next_message().await;
        rt.submit().await;
        rt.next_message().await;
        let (chat, _) = rt.next_message().await;
        assert_eq!(chat, OPERATOR);

        rt.submit().await;
        assert_eq!(rt.next_text().await, "❌ Belum ada data yang dimasukkan");
        assert_eq!(rt.transport.recorded().len(), 5);
    }

    /// Runtimes end once their user has nothing stored
    #[tokio::test]
    async fn test_runtimes_retire_after_eviction() {
        let mut rt = TestRuntime::new();

        for id in 0..500 {
            rt.send_as(UserId(id), Event::Cancel).await;
        }
        for _ in 0..500 {
            rt.next_message().await;
        }
        assert!(rt.store.is_empty());
        assert!(rt.wait_until_retired().await, "runtimes left behind");
        assert_eq!(rt.manager.active_sessions().await, 0);
    }

    /// A user mid-entry keeps a runtime; submitting releases it and the
    /// next event starts a fresh one
    #[tokio::test]
    async fn test_runtime_lives_while_session_is_stored() {
        let mut rt = TestRuntime::new();

        rt.select(MeasurementKind::HeartRate).await;
        rt.next_message().await;
        rt.text("72").await;
        rt.next_message().await;
        assert_eq!(rt.manager.active_sessions().await, 1);

        rt.submit().await;
        rt.next_message().await;
        assert!(rt.wait_until_retired().await);

        rt.submit().await;
        assert_eq!(rt.next_text().await, "❌ Belum ada data yang dimasukkan");
    }

    /// Rejected values from an unknown user leave no runtime behind
    #[tokio::test]
    async fn test_stray_text_does_not_keep_runtime() {
        let mut rt = TestRuntime::new();

        rt.text("halo").await;
        assert_eq!(
            rt.next_text().await,
            "Silakan pilih parameter terlebih dahulu"
        );
        assert!(rt.wait_until_retired().await);
    }

    /// A user whose replies hang cannot block dispatch for anyone else
    #[tokio::test]
    async fn test_stalled_user_does_not_block_others() {
        let mut rt = TestRuntime::stalling(USER);
        let other = UserId(2002);

        // The runtime takes this event and then hangs delivering the prompt
        rt.select(MeasurementKind::HeartRate).await;
        let (chat, _) = rt.next_message().await;
        assert_eq!(chat, ChatId(USER.0));

        let mut dropped = 0;
        for _ in 0..EVENT_QUEUE_DEPTH + 5 {
            let inbound = Inbound {
                chat: ChatId(USER.0),
                event: Event::FreeText("72".to_string()),
            };
            if rt.manager.send_event(USER, inbound).await.is_err() {
                dropped += 1;
            }
        }
        assert_eq!(dropped, 5);

        rt.send_as(
            other,
            Event::MenuSelection(MenuItem::Measure(MeasurementKind::Temperature)),
        )
        .await;
        let (chat, prompt) = rt.next_message().await;
        assert_eq!(chat, ChatId(other.0));
        assert_eq!(prompt.text, "Masukkan nilai TEMP:\n(Contoh: 36.5)");
    }
}
