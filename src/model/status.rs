//! Transient status line

use std::time::{Duration, Instant};

/// A message shown to the user until it expires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    pub text: String,
    pub expires_at: Instant,
}

impl TransientMessage {
    pub fn new(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: Instant::now() + duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}
