//! State shared between the view, its data sinks and helper threads
//!
//! The engine and the view top sit behind one lock. Each inbound batch,
//! frame build, scroll and keystroke takes it exactly once. Nothing that
//! talks to the transport runs while it is held.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

use super::raw_text::RawTextLog;
use super::scroll::ScrollController;
use crate::engine::{EngineEvent, TerminalEngine};
use crate::transport::OutboxSender;

pub(crate) struct ViewState<E> {
    pub engine: E,
    pub view_top: usize,
}

pub(crate) struct Shared<E> {
    state: Mutex<ViewState<E>>,
    dirty: AtomicBool,
    idle_since: Mutex<Instant>,
    title: Mutex<String>,
    raw_text: Option<RawTextLog>,
    outbound: Mutex<Option<OutboxSender>>,
}

impl<E: TerminalEngine> Shared<E> {
    pub fn new(engine: E, raw_text: Option<RawTextLog>) -> Self {
        let view_top = engine.top_row();
        Self {
            state: Mutex::new(ViewState { engine, view_top }),
            dirty: AtomicBool::new(true),
            idle_since: Mutex::new(Instant::now()),
            title: Mutex::new(String::new()),
            raw_text,
            outbound: Mutex::new(None),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, ViewState<E>> {
        self.state.lock()
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    pub fn idle_since(&self) -> Instant {
        *self.idle_since.lock()
    }

    pub fn title(&self) -> String {
        self.title.lock().clone()
    }

    pub fn set_title(&self, title: String) {
        trace!(%title, "window title");
        *self.title.lock() = title;
    }

    pub fn raw_text(&self) -> Option<&RawTextLog> {
        self.raw_text.as_ref()
    }

    pub fn set_outbound(&self, sender: Option<OutboxSender>) {
        *self.outbound.lock() = sender;
    }

    /// Queue bytes for the transport; dropped when not connected
    pub fn send(&self, data: Vec<u8>) {
        if data.is_empty() {
            return;
        }
        let sender = self.outbound.lock().clone();
        match sender {
            Some(sender) => {
                if !sender.send(data) {
                    trace!("outbox closed, dropping data");
                }
            }
            None => trace!(len = data.len(), "not connected, dropping data"),
        }
    }

    /// Apply one inbound batch
    pub fn apply_batch(&self, data: &[u8]) {
        let (changed, raw, events) = {
            let mut state = self.lock();
            let old_top = state.engine.top_row();
            state.engine.apply_incoming(data);
            let changed = state.engine.has_changed();
            let raw = state.engine.take_raw_text();
            state.engine.clear_changes();
            let new_top = state.engine.top_row();
            state.view_top = ScrollController::follow(state.view_top, old_top, new_top);
            (changed, raw, state.engine.take_events())
        };

        if let Some(log) = &self.raw_text {
            log.append(&raw);
        }
        *self.idle_since.lock() = Instant::now();
        if changed {
            self.mark_dirty();
        }
        self.dispatch(events);
    }

    /// Act on engine events; call without the state lock held
    pub fn dispatch(&self, events: Vec<EngineEvent>) {
        for event in events {
            match event {
                EngineEvent::SendData(data) => self.send(data),
                EngineEvent::TitleChanged(title) => self.set_title(title),
            }
        }
    }
}

/// Feeds inbound bytes into a view from any thread
pub struct DataSink<E> {
    shared: Arc<Shared<E>>,
}

impl<E> Clone for DataSink<E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<E: TerminalEngine> DataSink<E> {
    pub(crate) fn new(shared: Arc<Shared<E>>) -> Self {
        Self { shared }
    }

    /// Apply bytes received from the transport
    pub fn apply(&self, data: &[u8]) {
        self.shared.apply_batch(data);
    }

    pub fn title_changed(&self, title: impl Into<String>) {
        self.shared.set_title(title.into());
    }
}
