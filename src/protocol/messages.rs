//! Module `messages`
//!
//! Defines the `Message` record exchanged between clients and the server.
//! Messages travel as one JSON object per line; encoding is atomic and
//! ordered per connection because a single writer task owns each socket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single chat message.
///
/// Produced either by a client (`is_notification = false`) or by the
/// server for command feedback and join/leave announcements
/// (`is_notification = true`). Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_notification: bool,
}

impl Message {
    /// Builds a client chat message stamped with the current time.
    pub fn chat(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
            is_notification: false,
        }
    }

    /// Builds a server notification stamped with the current time.
    pub fn notification(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
            is_notification: true,
        }
    }
}
