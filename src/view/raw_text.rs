//! Raw-text log
//!
//! Every character the engine renders, in arrival order. Capacity is
//! reserved in large fixed batches so long sessions do not reallocate on
//! every append.

use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug)]
struct Inner {
    buffer: String,
    /// Bytes reserved so far, always a whole number of batches
    reserved: usize,
    cached: Option<Arc<str>>,
}

/// Append-only text log with its own lock
#[derive(Debug)]
pub struct RawTextLog {
    batch: usize,
    inner: Mutex<Inner>,
}

impl RawTextLog {
    pub fn new(batch: usize) -> Self {
        Self {
            batch: batch.max(1),
            inner: Mutex::new(Inner {
                buffer: String::new(),
                reserved: 0,
                cached: None,
            }),
        }
    }

    pub fn append(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut inner = self.inner.lock();
        let needed = inner.buffer.len() + text.len();
        if needed > inner.reserved {
            let reserved = needed.div_ceil(self.batch) * self.batch;
            let additional = reserved - inner.buffer.len();
            inner.buffer.reserve_exact(additional);
            inner.reserved = reserved;
        }
        inner.buffer.push_str(text);
        inner.cached = None;
    }

    /// Everything logged so far; rebuilt only after appends
    pub fn text(&self) -> Arc<str> {
        let mut inner = self.inner.lock();
        if let Some(cached) = &inner.cached {
            return cached.clone();
        }
        let text: Arc<str> = Arc::from(inner.buffer.as_str());
        inner.cached = Some(text.clone());
        text
    }

    /// Logged length in bytes
    pub fn len(&self) -> usize {
        self.inner.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes reserved for the log
    pub fn reserved(&self) -> usize {
        self.inner.lock().reserved
    }
}
