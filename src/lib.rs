//! Monitoring toolkit for the DQD trading bot.
//!
//! `indicators` holds the pure EMA Escadinha / magnetic line engine and the
//! position level calculator. `bot` talks to the external bot backend.

pub mod bot;
pub mod config;
pub mod error;
pub mod indicators;

pub use error::{BotError, Result};
