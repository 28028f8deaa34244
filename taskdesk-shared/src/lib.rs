//! # TaskDesk Shared Library
//!
//! Core of the TaskDesk task manager: users and sessions, the persisted task
//! collection, and the key-value store they share.
//!
//! ## Module Organization
//!
//! - `store`: key-value persistence (in-memory and file-backed)
//! - `models`: user and task records, filters and statistics
//! - `auth`: user directory, session and authentication service
//! - `tasks`: task repository and seed sources
//! - `context`: application context wiring everything to one store

pub mod auth;
pub mod context;
pub mod models;
pub mod store;
pub mod tasks;

/// Current version of the TaskDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
