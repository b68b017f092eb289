//! Clipboard access
//!
//! The view copies selections to and pastes from a `ClipboardSink`. Hosts
//! without a system clipboard, and tests, use `MemoryClipboard`.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

/// Somewhere selected text can go and pasted text can come from
pub trait ClipboardSink: Send + Sync {
    fn get_text(&self) -> Result<String>;

    fn set_text(&self, text: &str) -> Result<()>;
}

/// Process-local clipboard
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(text.into())),
        }
    }

    /// Current contents
    pub fn contents(&self) -> String {
        self.contents.lock().clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn get_text(&self) -> Result<String> {
        Ok(self.contents.lock().clone())
    }

    fn set_text(&self, text: &str) -> Result<()> {
        *self.contents.lock() = text.to_string();
        Ok(())
    }
}

#[cfg(feature = "clipboard")]
mod system {
    use copypasta::{ClipboardContext, ClipboardProvider};

    use super::ClipboardSink;
    use crate::error::{Error, Result};

    /// The desktop clipboard
    ///
    /// A context is opened per call; the platform handle is not `Send` on
    /// every backend.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClipboard;

    impl SystemClipboard {
        fn context() -> Result<ClipboardContext> {
            ClipboardContext::new().map_err(|e| Error::Clipboard(e.to_string()))
        }
    }

    impl ClipboardSink for SystemClipboard {
        fn get_text(&self) -> Result<String> {
            Self::context()?
                .get_contents()
                .map_err(|e| Error::Clipboard(e.to_string()))
        }

        fn set_text(&self, text: &str) -> Result<()> {
            Self::context()?
                .set_contents(text.to_string())
                .map_err(|e| Error::Clipboard(e.to_string()))
        }
    }
}

#[cfg(feature = "clipboard")]
pub use system::SystemClipboard;
