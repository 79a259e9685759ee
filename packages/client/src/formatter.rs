//! Message formatting utilities for client display.

use hanashi_server::infrastructure::dto::websocket::{
    DeliveryStatusDto, MessageAckPayload, NewMessagePayload,
};
use hanashi_shared::time::timestamp_to_rfc3339;

use crate::roster::RosterRow;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the roster, one row per user, marking online users, unread
    /// counts, and who is typing to us
    pub fn format_roster(rows: &[&RosterRow], typing: &[String]) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Users:\n");

        if rows.is_empty() {
            output.push_str("(No users yet)\n");
        } else {
            for row in rows {
                let marker = if row.online { "●" } else { "○" };
                let mut line = format!("{} {}", marker, row.id);
                if row.name != row.id {
                    line.push_str(&format!(" ({})", row.name));
                }
                if row.unread > 0 {
                    line.push_str(&format!(" [{} unread]", row.unread));
                }
                if typing.contains(&row.id) {
                    line.push_str(" typing...");
                }
                output.push_str(&line);
                output.push('\n');
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a chat message
    pub fn format_new_message(message: &NewMessagePayload, me: &str) -> String {
        let from = if message.sender_id == me {
            "me"
        } else {
            message.sender_id.as_str()
        };
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            from,
            message.text,
            timestamp_to_rfc3339(message.timestamp)
        )
    }

    /// Format the delivery outcome of our own message; silent when delivered
    pub fn format_ack(ack: &MessageAckPayload, peer: &str) -> Option<String> {
        match ack.status {
            DeliveryStatusDto::Delivered => None,
            DeliveryStatusDto::Undelivered => Some(format!(
                "\n(not seen live: {} will find it as unread)\n",
                peer
            )),
        }
    }

    /// Format a presence diff
    pub fn format_presence(added: &[String], removed: &[String]) -> String {
        let mut output = String::from("\n");
        for user in added {
            output.push_str(&format!("+ {} is online\n", user));
        }
        for user in removed {
            output.push_str(&format!("- {} went offline\n", user));
        }
        output
    }

    pub fn format_typing(user_id: &str, is_typing: bool) -> String {
        if is_typing {
            format!("\n{} is typing...\n", user_id)
        } else {
            format!("\n{} stopped typing\n", user_id)
        }
    }

    pub fn format_unread(sender_id: &str, count: u32) -> String {
        format!("\n✉ {} unread from {}\n", count, sender_id)
    }

    /// Format the conversation banner after `/open`
    pub fn format_opened(peer: &str, room_id: &str) -> String {
        format!("\n--- conversation with {} ({}) ---\n", peer, room_id)
    }

    pub fn format_help() -> String {
        "\nCommands:\n\
         /open <user>  open the conversation with <user>\n\
         /close        close the current conversation\n\
         /who          show users, presence and unread counts\n\
         /quit         exit\n\
         Anything else is sent to the open conversation.\n"
            .to_string()
    }
}
