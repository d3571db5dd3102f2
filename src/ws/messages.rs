//! Chat protocol texts exchanged over the WebSocket.
//!
//! The protocol is plain text frames. Clients send arbitrary text; the
//! server answers with the messages below, plus whatever the notification
//! dispatcher broadcasts.

use std::fmt;

/// Server → client chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMessage<'a> {
    /// Broadcast when a client connects.
    Joined {
        /// Client-supplied label from the URL.
        client_id: i64,
    },
    /// Sent back to the sender only, acknowledging its frame.
    Echo {
        /// Text the client sent.
        text: &'a str,
    },
    /// Broadcast to everyone, the sender included.
    Said {
        /// Client-supplied label from the URL.
        client_id: i64,
        /// Text the client sent.
        text: &'a str,
    },
    /// Broadcast after a client disconnects.
    Left {
        /// Client-supplied label from the URL.
        client_id: i64,
    },
}

impl fmt::Display for ChatMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Joined { client_id } => write!(f, "Congratulations! Client#{client_id} joined us"),
            Self::Echo { text } => write!(f, "You send message: {text}"),
            Self::Said { client_id, text } => write!(f, "Client#{client_id} send message: {text}"),
            Self::Left { client_id } => write!(f, "Unfortunately, Client#{client_id} left us"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_and_leave_carry_client_id() {
        assert_eq!(
            ChatMessage::Joined { client_id: 7 }.to_string(),
            "Congratulations! Client#7 joined us"
        );
        assert_eq!(
            ChatMessage::Left { client_id: -3 }.to_string(),
            "Unfortunately, Client#-3 left us"
        );
    }

    #[test]
    fn echo_and_broadcast_carry_text() {
        let text = "hola";
        assert_eq!(ChatMessage::Echo { text }.to_string(), "You send message: hola");
        assert_eq!(
            ChatMessage::Said { client_id: 8, text }.to_string(),
            "Client#8 send message: hola"
        );
    }
}
