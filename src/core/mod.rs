//! Core module - data model, configuration, commands, and the coordinator

pub mod command;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod preset;
pub mod state;
pub mod volume;
