//! # Shopping List Telegram Bot
//!
//! A Telegram bot that keeps a shopping list per chat. Items are added with
//! `/add`, shown as multiple-answer polls with `/list` and removed once
//! ticked and confirmed with `/done`.

pub mod bot;
pub mod config;
pub mod errors;
pub mod localization;
pub mod paginator;
pub mod persistence;
pub mod polls;
pub mod shutdown;
pub mod store;
pub mod transport;
