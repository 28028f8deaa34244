//! Data models for TaskDesk
//!
//! # Models
//!
//! - `user`: Registered users and their roles
//! - `task`: Tasks, partial updates, filters and statistics
//!
//! Field names on the wire follow the persisted records (`nombre`,
//! `titulo`, `estado`, ...) so existing stores and seed documents load
//! unchanged.
//!
//! # Example
//!
//! ```
//! use taskdesk_shared::models::task::{NewTask, Task, TaskPriority, TaskStatus};
//!
//! let task = Task::new(
//!     1_700_000_000_000,
//!     NewTask::new("Write report", "Quarterly numbers", TaskPriority::High, "ana@example.com"),
//! );
//! assert_eq!(task.status, TaskStatus::Pending);
//! ```

use chrono::{DateTime, SubsecRound, Utc};

pub mod task;
pub mod user;

/// Current UTC time truncated to milliseconds
///
/// Persisted timestamps carry millisecond precision; truncating at creation
/// keeps in-memory values equal to what a reload produces.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_now_has_millisecond_precision() {
        let now = timestamp_now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
