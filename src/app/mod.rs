// src/app/mod.rs
//
// Startup concerns: configuration and subsystem initialization.

pub mod config;
pub mod notification_init;

pub use config::{AppConfig, MatchPolicy};
pub use notification_init::{build_sink, init_notification_subsystem, NotificationSubsystem};
