#![deny(rust_2018_idioms)]

pub mod agent;
pub mod commands;
pub mod config;
pub mod permissions;
pub mod transport;

pub use agent::{Agent, AgentHandle, AgentMessage};
pub use config::BotConfig;
