//! Key events as delivered by the host

use crate::engine::{Key, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn ctrl(key: Key) -> Self {
        Self::new(key).with_modifiers(Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        })
    }
}
