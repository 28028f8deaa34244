//! Task repository
//!
//! Owns the ordered task collection. The collection is loaded from the
//! `"tareas"` key on construction and the whole collection is written back
//! after every mutation.
//!
//! # Persistence
//!
//! Mutations are applied in memory first, then persisted. If persisting
//! fails the error is returned and the in-memory state keeps the change;
//! [`TaskRepository::flush`] retries the write.
//!
//! # Lookups
//!
//! All lookups are linear scans and return copies, never references into
//! the live collection.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::seed::{SeedError, SeedSource};
use crate::models::task::{
    NewTask, Task, TaskFilter, TaskId, TaskIdGenerator, TaskStats, UpdateTask,
};
use crate::store::{self, KeyValueStore, StoreError, TASKS_KEY};

/// Task repository error types
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Loading or saving the collection failed
    #[error("Task storage error: {0}")]
    Store(#[from] StoreError),

    /// Seed source could not be fetched; nothing was merged
    #[error("Failed to fetch seed tasks: {0}")]
    SeedFetch(#[from] SeedError),

    /// A stored or seeded task already holds the largest possible ID
    #[error("No task IDs left: largest known ID is {0}")]
    IdsExhausted(TaskId),
}

/// Outcome of a seed merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Tasks appended
    pub added: usize,

    /// Seed tasks skipped because their ID was already present
    pub skipped: usize,
}

/// Ordered task collection backed by the key-value store
pub struct TaskRepository {
    store: Arc<dyn KeyValueStore>,
    tasks: Vec<Task>,
    ids: TaskIdGenerator,
}

impl TaskRepository {
    /// Loads the persisted collection (empty if none stored)
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, RepositoryError> {
        let tasks: Vec<Task> = store::load_json(store.as_ref(), TASKS_KEY)?.unwrap_or_default();
        let floor = tasks.iter().map(|t| t.id).max().unwrap_or(0);

        debug!(count = tasks.len(), "Loaded tasks");

        Ok(TaskRepository {
            store,
            tasks,
            ids: TaskIdGenerator::starting_after(floor),
        })
    }

    /// Creates a task with a fresh ID, appends it and persists
    ///
    /// # Errors
    ///
    /// `RepositoryError::IdsExhausted` when no ID above the largest known
    /// one remains; the collection is left untouched.
    pub fn create(&mut self, data: NewTask) -> Result<Task, RepositoryError> {
        let Some(id) = self.ids.next_id() else {
            let largest = self.tasks.iter().map(|t| t.id).max().unwrap_or(TaskId::MAX);
            warn!(largest_id = largest, "Task IDs exhausted");
            return Err(RepositoryError::IdsExhausted(largest));
        };
        let task = Task::new(id, data);
        self.tasks.push(task.clone());
        self.persist()?;

        info!(task_id = task.id, assigned_to = %task.assigned_to, "Task created");
        Ok(task)
    }

    /// Overwrites the supplied fields of task `id`
    ///
    /// Returns `Ok(false)` when no task has that ID.
    pub fn update(&mut self, id: TaskId, update: UpdateTask) -> Result<bool, RepositoryError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(task_id = id, "Update for unknown task");
            return Ok(false);
        };

        update.apply_to(task);
        self.persist()?;
        Ok(true)
    }

    /// Removes the first task with ID `id`
    pub fn delete(&mut self, id: TaskId) -> Result<bool, RepositoryError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        self.tasks.remove(index);
        self.persist()?;

        info!(task_id = id, "Task deleted");
        Ok(true)
    }

    /// Marks task `id` completed, stamping the completion time
    ///
    /// Returns `Ok(false)` when no task has that ID. A task that is already
    /// completed keeps its original completion time.
    pub fn mark_completed(&mut self, id: TaskId) -> Result<bool, RepositoryError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };

        if task.mark_completed() {
            self.persist()?;
            info!(task_id = id, "Task completed");
        }
        Ok(true)
    }

    /// Adds `tag` to task `id` unless already present
    ///
    /// Returns `Ok(false)` when no task has that ID.
    pub fn add_tag(&mut self, id: TaskId, tag: &str) -> Result<bool, RepositoryError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };

        if task.add_tag(tag) {
            self.persist()?;
        }
        Ok(true)
    }

    pub fn find_by_id(&self, id: TaskId) -> Option<Task> {
        self.tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Copy of the whole collection in insertion order
    pub fn find_all(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Tasks assigned to exactly `email`, in insertion order
    pub fn find_by_owner(&self, email: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.is_assigned_to(email))
            .cloned()
            .collect()
    }

    /// Tasks matching every criterion of `filter`, in insertion order
    pub fn filter(&self, filter: &TaskFilter) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Counts recomputed from the current collection
    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// Fetches seed tasks from `source` and merges them
    ///
    /// # Errors
    ///
    /// `RepositoryError::SeedFetch` if the source fails; the collection is
    /// left untouched in that case.
    pub async fn seed_merge(
        &mut self,
        source: &dyn SeedSource,
    ) -> Result<SeedReport, RepositoryError> {
        let seeds = match source.fetch().await {
            Ok(seeds) => seeds,
            Err(e) => {
                warn!(source = %source.describe(), error = %e, "Seed fetch failed");
                return Err(e.into());
            }
        };

        let report = self.merge_seeds(seeds)?;
        info!(
            source = %source.describe(),
            added = report.added,
            skipped = report.skipped,
            "Seed tasks merged"
        );
        Ok(report)
    }

    /// Appends every seed whose ID is not yet present, then persists once
    ///
    /// IDs added earlier in the same batch count as present.
    pub fn merge_seeds(&mut self, seeds: Vec<Task>) -> Result<SeedReport, RepositoryError> {
        let mut report = SeedReport::default();

        for seed in seeds {
            if self.position(seed.id).is_some() {
                report.skipped += 1;
                continue;
            }
            self.ids.observe(seed.id);
            self.tasks.push(seed);
            report.added += 1;
        }

        self.persist()?;
        Ok(report)
    }

    /// Writes the current collection to the store
    pub fn flush(&self) -> Result<(), RepositoryError> {
        Ok(self.persist()?)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn persist(&self) -> Result<(), StoreError> {
        store::save_json(self.store.as_ref(), TASKS_KEY, &self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskPriority, TaskStatus};
    use crate::store::MemoryStore;
    use crate::tasks::seed::StaticSeedSource;

    fn repo() -> (MemoryStore, TaskRepository) {
        let store = MemoryStore::new();
        let repo = TaskRepository::load(Arc::new(store.clone())).unwrap();
        (store, repo)
    }

    fn new_task(title: &str, owner: &str) -> NewTask {
        NewTask::new(title, "", TaskPriority::Medium, owner)
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let (_, mut repo) = repo();
        let a = repo.create(new_task("a", "x")).unwrap();
        let b = repo.create(new_task("b", "x")).unwrap();
        let c = repo.create(new_task("c", "x")).unwrap();

        assert!(a.id < b.id && b.id < c.id);
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn test_create_persists_collection() {
        let (store, mut repo) = repo();
        let task = repo.create(new_task("a", "x")).unwrap();

        let reloaded = TaskRepository::load(Arc::new(store)).unwrap();
        assert_eq!(reloaded.find_by_id(task.id), Some(task));
    }

    #[test]
    fn test_update_hit_and_miss() {
        let (_, mut repo) = repo();
        let task = repo.create(new_task("a", "x")).unwrap();

        let changed = repo
            .update(
                task.id,
                UpdateTask {
                    priority: Some(TaskPriority::High),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(changed);
        assert_eq!(repo.find_by_id(task.id).unwrap().priority, TaskPriority::High);

        let before = repo.find_all();
        assert!(!repo.update(task.id + 999, UpdateTask::default()).unwrap());
        assert_eq!(repo.find_all(), before);
    }

    #[test]
    fn test_delete() {
        let (_, mut repo) = repo();
        let a = repo.create(new_task("a", "x")).unwrap();
        let b = repo.create(new_task("b", "x")).unwrap();

        assert!(repo.delete(a.id).unwrap());
        assert!(!repo.delete(a.id).unwrap());
        assert_eq!(repo.find_all(), vec![b]);
    }

    #[test]
    fn test_find_all_is_a_copy() {
        let (_, mut repo) = repo();
        repo.create(new_task("a", "x")).unwrap();

        let mut copy = repo.find_all();
        copy.clear();
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_mark_completed() {
        let (_, mut repo) = repo();
        let task = repo.create(new_task("a", "x")).unwrap();

        assert!(repo.mark_completed(task.id).unwrap());
        let done = repo.find_by_id(task.id).unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());

        // Already completed: completion time unchanged
        assert!(repo.mark_completed(task.id).unwrap());
        assert_eq!(repo.find_by_id(task.id).unwrap().completed_at, done.completed_at);

        assert!(!repo.mark_completed(-1).unwrap());
    }

    #[test]
    fn test_add_tag() {
        let (_, mut repo) = repo();
        let task = repo.create(new_task("a", "x")).unwrap();

        assert!(repo.add_tag(task.id, "urgent").unwrap());
        assert!(repo.add_tag(task.id, "urgent").unwrap());
        assert_eq!(repo.find_by_id(task.id).unwrap().tags, vec!["urgent"]);
        assert!(!repo.add_tag(-1, "urgent").unwrap());
    }

    #[test]
    fn test_filter() {
        let (_, mut repo) = repo();
        repo.create(NewTask::new("Fix login", "Session bug", TaskPriority::High, "x"))
            .unwrap();
        repo.create(NewTask::new("Docs", "Write LOGIN guide", TaskPriority::Low, "x"))
            .unwrap();
        repo.create(NewTask::new("Deploy", "", TaskPriority::High, "x").with_status(TaskStatus::Completed))
            .unwrap();

        let found = repo.filter(&TaskFilter::default().with_search("login"));
        assert_eq!(found.len(), 2);

        let found = repo.filter(
            &TaskFilter::default()
                .with_priority(TaskPriority::High)
                .with_status(TaskStatus::Pending),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Fix login");
    }

    #[test]
    fn test_merge_seeds_dedups_within_batch() {
        let (_, mut repo) = repo();
        let seed = Task::new(7, new_task("seed", "x"));

        let report = repo.merge_seeds(vec![seed.clone(), seed]).unwrap();
        assert_eq!(report, SeedReport { added: 1, skipped: 1 });
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_ids_stay_above_seeded_ids() {
        let (_, mut repo) = repo();
        let far_future = i64::MAX / 2;
        repo.merge_seeds(vec![Task::new(far_future, new_task("seed", "x"))])
            .unwrap();

        let created = repo.create(new_task("local", "x")).unwrap();
        assert!(created.id > far_future);
    }

    #[test]
    fn test_create_after_max_seeded_id_is_an_error() {
        let (store, mut repo) = repo();
        repo.merge_seeds(vec![Task::new(TaskId::MAX, new_task("seed", "x"))])
            .unwrap();

        let err = repo.create(new_task("local", "x")).unwrap_err();
        assert!(matches!(err, RepositoryError::IdsExhausted(id) if id == TaskId::MAX));
        assert_eq!(repo.len(), 1);

        // Same outcome after reloading the persisted collection
        let mut reloaded = TaskRepository::load(Arc::new(store)).unwrap();
        assert!(matches!(
            reloaded.create(new_task("local", "x")),
            Err(RepositoryError::IdsExhausted(_))
        ));
        assert_eq!(reloaded.len(), 1);
    }

    #[tokio::test]
    async fn test_seed_merge_from_source() {
        let (store, mut repo) = repo();
        let existing = repo.create(new_task("local", "x")).unwrap();

        let source = StaticSeedSource::new(vec![
            existing.clone(),
            Task::new(42, new_task("seed", "y")),
        ]);

        let report = repo.seed_merge(&source).await.unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(repo.len(), 2);

        let reloaded = TaskRepository::load(Arc::new(store)).unwrap();
        assert!(reloaded.find_by_id(42).is_some());
    }

    #[test]
    fn test_load_rejects_corrupt_collection() {
        let store = MemoryStore::new();
        store.set(TASKS_KEY, "[{").unwrap();

        assert!(matches!(
            TaskRepository::load(Arc::new(store)),
            Err(RepositoryError::Store(_))
        ));
    }
}
