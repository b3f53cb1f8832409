//! CLI commands for postindex

pub mod build;
pub mod dispatch;
pub mod init;
pub mod interactive;
pub mod search;
pub mod stats;
