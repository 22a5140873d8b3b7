//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `commands`: the command set parsed from incoming messages
//! - `command_handler`: routes commands to the store and the poll tracker
//! - `ui_builder`: formats poll questions and options

pub mod command_handler;
pub mod commands;
pub mod ui_builder;

// Re-export main handler types for use in main.rs
pub use command_handler::{command_handler, CommandContext, CommandDispatcher};
pub use commands::Command;
