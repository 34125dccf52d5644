//! Keyboard shortcut handling: keys, chord matching, and routing

pub mod chord;
pub mod keys;
pub mod router;
