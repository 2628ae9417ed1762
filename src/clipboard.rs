//! Clipboard providers
//!
//! The runtime reads pasted text and writes copied text through this trait so
//! tests and headless sessions can run without a display server.

use std::sync::{Arc, Mutex};

pub trait ClipboardProvider: Send {
    /// Current clipboard text, or None if empty or unavailable
    fn read_text(&mut self) -> Option<String>;

    fn write_text(&mut self, text: &str) -> bool;
}

/// The OS clipboard via `arboard`
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn read_text(&mut self) -> Option<String> {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => clipboard.get_text().ok(),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                None
            }
        }
    }

    fn write_text(&mut self, text: &str) -> bool {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => clipboard.set_text(text).is_ok(),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                false
            }
        }
    }
}

/// In-process clipboard; clones share contents
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::default();
        clipboard.set(text);
        clipboard
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.lock() = Some(text.into());
    }

    pub fn contents(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.text.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn read_text(&mut self) -> Option<String> {
        self.contents()
    }

    fn write_text(&mut self, text: &str) -> bool {
        self.set(text);
        true
    }
}
