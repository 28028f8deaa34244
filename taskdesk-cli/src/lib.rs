//! # TaskDesk CLI Library
//!
//! Pieces of the `taskdesk` binary that are tested on their own.
//!
//! ## Modules
//!
//! - `cli`: clap argument definitions
//! - `commands`: command execution against a [`TaskDesk`](taskdesk_shared::context::TaskDesk)
//! - `config`: configuration from the environment

pub mod cli;
pub mod commands;
pub mod config;
