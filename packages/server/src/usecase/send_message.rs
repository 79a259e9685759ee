//! UseCase: route a direct message
//!
//! 1. Validate the room, the sender's membership, and the text.
//! 2. Stamp a server id and timestamp.
//! 3. Push `new-message` once to every connection viewing the room, the
//!    sender's included (that echo is the sender's delivery confirmation).
//! 4. If the recipient did not get it live, bump the unread counter and push
//!    the new count to the recipient if they are online.
//! 5. Tell the sender whether the message was delivered.
//!
//! Stamping and fan-out happen under one dispatch gate, so each member sees
//! the messages of a room in the order the server accepted them. Fan-out only
//! queues onto per-connection channels and never waits on a socket.
//!
//! The unread count is bumped and pushed under the unread gate shared with
//! `UnreadCountsUseCase`, so the recipient sees counts and resets in the
//! order the store applied them.

use std::sync::Arc;

use hanashi_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ChannelRegistry, ChatMessage, Connection, DeliveryStatus, MessageIdFactory, MessagePusher,
    MessageText, Notification, Timestamp, UnreadCounter, UnreadCounterRepository,
};

use super::{error::SendMessageError, gate::NotificationGate, room_access::authorize_room};

/// What happened to a routed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub message: ChatMessage,
    pub status: DeliveryStatus,
}

pub struct SendMessageUseCase {
    registry: Arc<dyn ChannelRegistry>,
    unread_counters: Arc<dyn UnreadCounterRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    dispatch_gate: Mutex<()>,
    unread_gate: NotificationGate,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<dyn ChannelRegistry>,
        unread_counters: Arc<dyn UnreadCounterRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        unread_gate: NotificationGate,
    ) -> Self {
        Self {
            registry,
            unread_counters,
            message_pusher,
            clock,
            dispatch_gate: Mutex::new(()),
            unread_gate,
        }
    }

    /// Route `text` from `sender` into `raw_room_id`.
    ///
    /// Validation failures change nothing: no push, no counter.
    pub async fn execute(
        &self,
        sender: &Connection,
        raw_room_id: &str,
        text: String,
        client_message_id: Option<String>,
    ) -> Result<SendOutcome, SendMessageError> {
        let sender_id = sender.user_id();
        let (room_id, recipient_id) = authorize_room(sender_id, raw_room_id)?;
        let text = MessageText::new(text).map_err(SendMessageError::InvalidText)?;

        let (message, reached_recipient) = {
            let _gate = self.dispatch_gate.lock().await;

            let message = ChatMessage {
                id: MessageIdFactory::generate(),
                room_id: room_id.clone(),
                sender_id: sender_id.clone(),
                text,
                created_at: Timestamp::new(self.clock.now_millis()),
                client_message_id,
            };

            let members = self.registry.room_members(&room_id).await;
            let failed = self
                .message_pusher
                .broadcast(&members, &Notification::NewMessage(message.clone()))
                .await;

            let reached_recipient = members.iter().any(|m| m.user_id() == &recipient_id)
                && !failed.contains(&recipient_id);
            (message, reached_recipient)
        };

        tracing::info!(
            "Message {} from '{}' in '{}' ({})",
            message.id.as_str(),
            sender_id,
            room_id,
            if reached_recipient { "live" } else { "unread" }
        );

        let status = if reached_recipient {
            DeliveryStatus::Delivered
        } else {
            self.record_unread(&message).await;
            DeliveryStatus::Undelivered
        };

        let ack = Notification::MessageAck {
            message_id: message.id.clone(),
            client_message_id: message.client_message_id.clone(),
            status,
        };
        if let Err(e) = self.message_pusher.push_to(sender, &ack).await {
            tracing::warn!("Failed to acknowledge message to '{}': {}", sender_id, e);
        }

        Ok(SendOutcome { message, status })
    }

    async fn record_unread(&self, message: &ChatMessage) {
        let Some(recipient_id) = message.room_id.other_participant(&message.sender_id) else {
            return;
        };

        let _unread = self.unread_gate.enter().await;
        let recipient = self.registry.lookup(recipient_id).await;
        let count = self
            .unread_counters
            .increment(&message.sender_id, recipient_id)
            .await;

        // Offline recipients pick the count up with request-initial-unread-counts.
        let Some(recipient) = recipient else {
            return;
        };
        let update = Notification::UnreadCount(UnreadCounter {
            sender_id: message.sender_id.clone(),
            recipient_id: recipient_id.clone(),
            count,
        });
        if let Err(e) = self.message_pusher.push_to(&recipient, &update).await {
            tracing::warn!("Failed to push unread count to '{}': {}", recipient_id, e);
        }
    }
}
