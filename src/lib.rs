//! # Mini Walls bot
//!
//! Answers Hypixel Mini Walls statistics queries in Discord.
//!
//! - **client**: [`StatsClient`], username lookup plus stats fetch
//! - **model**: stats records, ranks and upstream payload shapes
//! - **embed**: pure formatting of records into reply embeds
//! - **command**: prefix command parsing and dispatch
//! - **bot**: Discord event handling
//! - **config**: start-up configuration

pub use client::StatsClient;
pub use command::CommandRouter;
pub use error::{ApiError, CommandError, ConfigError, Result};

pub(crate) mod api;
pub mod bot;
pub mod client;
pub mod command;
pub mod config;
pub mod embed;
pub mod error;
pub mod leaderboard;
pub mod model;
