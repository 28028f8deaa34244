//! Application context
//!
//! [`TaskDesk`] owns one store handle shared by the authentication service
//! and the task repository. Open it once at startup and call
//! [`TaskDesk::shutdown`] before exiting so the task collection is flushed.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use taskdesk_shared::auth::AuthSettings;
//! use taskdesk_shared::context::TaskDesk;
//! use taskdesk_shared::store::MemoryStore;
//!
//! let desk = TaskDesk::open(Arc::new(MemoryStore::new()), AuthSettings::immediate()).unwrap();
//! assert!(desk.tasks.is_empty());
//! desk.shutdown().unwrap();
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::{AuthError, AuthService, AuthSettings};
use crate::models::task::{NewTask, Task, TaskPriority};
use crate::store::KeyValueStore;
use crate::tasks::{RepositoryError, TaskRepository};

/// Application context error types
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Tasks(#[from] RepositoryError),

    /// Operation needs a logged-in user
    #[error("Not logged in")]
    NotAuthenticated,
}

/// Authentication plus tasks over a single store
pub struct TaskDesk {
    store: Arc<dyn KeyValueStore>,
    pub auth: AuthService,
    pub tasks: TaskRepository,
}

impl TaskDesk {
    /// Loads users, session and tasks from `store`
    pub fn open(store: Arc<dyn KeyValueStore>, settings: AuthSettings) -> Result<Self, ContextError> {
        let auth = AuthService::load(store.clone(), settings)?;
        let tasks = TaskRepository::load(store.clone())?;

        info!(
            tasks = tasks.len(),
            logged_in = auth.is_authenticated(),
            "TaskDesk opened"
        );

        Ok(TaskDesk { store, auth, tasks })
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Tasks assigned to the logged-in user
    ///
    /// Empty when nobody is logged in.
    pub fn my_tasks(&self) -> Vec<Task> {
        match self.auth.current_user() {
            Some(user) => self.tasks.find_by_owner(&user.email),
            None => Vec::new(),
        }
    }

    /// Creates a task assigned to the logged-in user
    pub fn create_own_task(
        &mut self,
        title: &str,
        description: &str,
        priority: TaskPriority,
    ) -> Result<Task, ContextError> {
        let owner = self
            .auth
            .current_user()
            .ok_or(ContextError::NotAuthenticated)?
            .email
            .clone();

        Ok(self
            .tasks
            .create(NewTask::new(title, description, priority, owner))?)
    }

    /// Flushes the task collection and releases the context
    pub fn shutdown(self) -> Result<(), ContextError> {
        self.tasks.flush()?;
        debug!("TaskDesk flushed");
        Ok(())
    }
}
