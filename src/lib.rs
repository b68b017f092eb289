//! termview - terminal viewport rendering and input mapping
//!
//! The layer between a terminal-state engine and a host drawing surface.
//! It turns the engine's cell buffer into styled spans, paints them through
//! a host `PaintSink`, and turns pointer, wheel and keyboard input into
//! selections, scrolling and bytes for the remote program.
//!
//! - `core`: Cells, attributes, buffer lines, cursor, text ranges
//! - `engine`: The engine contract, key encoding, an in-memory engine
//! - `render`: Palette, attribute resolution, layout, painting
//! - `input`: Pointer mapping and mouse protocol reports
//! - `view`: The `TerminalView` controller and its helpers
//! - `transport`: Transport contract, event channel, background sender
//! - `clipboard`: Clipboard contract and implementations
//! - `config`: View configuration

pub mod clipboard;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod input;
pub mod render;
pub mod transport;
pub mod view;

pub use clipboard::{ClipboardSink, MemoryClipboard};
pub use config::ViewConfig;
pub use engine::{MemoryTerminal, TerminalEngine};
pub use error::{Error, Result};
pub use view::{DataSink, TerminalView};
