use crate::api::TaskApi;
use crate::error::{JoinError, JoinResult};
use crate::models::{Task, TaskPatch};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Task CRUD plus the latest known task list.
///
/// Every mutation re-fetches the list so the board always shows the server's view.
pub struct TasksService {
    api: Arc<dyn TaskApi>,
    tasks: watch::Sender<Vec<Task>>,
}

impl TasksService {
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        let (tasks, _) = watch::channel(Vec::new());
        TasksService { api, tasks }
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub async fn refresh(&self) -> JoinResult<()> {
        match self.api.list_tasks().await {
            Ok(tasks) => {
                self.tasks.send_replace(tasks);
                Ok(())
            }
            Err(err) => {
                error!("event=tasks_fetch status=error error={}", err);
                Err(err)
            }
        }
    }

    pub async fn get(&self, id: u64) -> JoinResult<Task> {
        if id == 0 {
            return Err(JoinError::MissingId("Task"));
        }
        self.api.get_task(id).await
    }

    pub async fn add(&self, task: &Task) -> JoinResult<Task> {
        let created = self.api.create_task(task).await.map_err(|err| {
            error!("event=task_create status=error error={}", err);
            err
        })?;
        info!("event=task_create status=ok id={}", created.id);
        self.refresh().await?;
        Ok(created)
    }

    pub async fn update(&self, id: u64, patch: &TaskPatch) -> JoinResult<()> {
        if id == 0 {
            return Err(JoinError::MissingId("Task"));
        }
        if patch.is_empty() {
            return Err(JoinError::EmptyPatch);
        }
        self.api.patch_task(id, patch).await.map_err(|err| {
            error!("event=task_update status=error id={} error={}", id, err);
            err
        })?;
        info!("event=task_update status=ok id={}", id);
        self.refresh().await
    }

    pub async fn delete(&self, id: u64) -> JoinResult<()> {
        if id == 0 {
            return Err(JoinError::MissingId("Task"));
        }
        self.api.delete_task(id).await.map_err(|err| {
            error!("event=task_delete status=error id={} error={}", id, err);
            err
        })?;
        info!("event=task_delete status=ok id={}", id);
        self.refresh().await
    }

    /// Re-fetches the list every `every` until the handle is aborted.
    pub fn spawn_polling(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; callers already fetched once.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if service.refresh().await.is_err() {
                    warn!("event=tasks_poll status=skipped");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::services::fake::FakeBackend;

    fn service(backend: &Arc<FakeBackend>) -> TasksService {
        TasksService::new(backend.clone())
    }

    #[tokio::test]
    async fn test_refresh_publishes_list() {
        let backend = Arc::new(FakeBackend::with_tasks(vec![
            FakeBackend::task(1, "Plan sprint", Status::Todo),
            FakeBackend::task(2, "Review PR", Status::Doing),
        ]));
        let tasks = service(&backend);
        assert!(tasks.snapshot().is_empty());
        tasks.refresh().await.unwrap();
        assert_eq!(tasks.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_add_then_list_contains_new_task() {
        let backend = Arc::new(FakeBackend::default());
        let tasks = service(&backend);
        let created = tasks
            .add(&Task {
                title: "Write release notes".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(created.id > 0);
        assert_eq!(tasks.snapshot()[0].title, "Write release notes");
    }

    #[tokio::test]
    async fn test_update_requires_id_and_content() {
        let backend = Arc::new(FakeBackend::default());
        let tasks = service(&backend);
        assert!(matches!(
            tasks.update(0, &TaskPatch::status(Status::Done)).await,
            Err(JoinError::MissingId(_))
        ));
        assert!(matches!(
            tasks.update(4, &TaskPatch::default()).await,
            Err(JoinError::EmptyPatch)
        ));
        assert!(backend.patches().is_empty());
    }

    #[tokio::test]
    async fn test_update_patches_and_refreshes() {
        let backend = Arc::new(FakeBackend::with_tasks(vec![FakeBackend::task(
            3,
            "Deploy",
            Status::Todo,
        )]));
        let tasks = service(&backend);
        tasks.update(3, &TaskPatch::status(Status::Done)).await.unwrap();
        assert_eq!(backend.patches(), vec![(3, TaskPatch::status(Status::Done))]);
        assert_eq!(tasks.snapshot()[0].status, Status::Done);
    }

    #[tokio::test]
    async fn test_delete_removes_task() {
        let backend = Arc::new(FakeBackend::with_tasks(vec![FakeBackend::task(
            9,
            "Old",
            Status::Done,
        )]));
        let tasks = service(&backend);
        tasks.delete(9).await.unwrap();
        assert!(tasks.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_errors_are_returned_and_list_kept() {
        let backend = Arc::new(FakeBackend::with_tasks(vec![FakeBackend::task(
            1,
            "Keep me",
            Status::Todo,
        )]));
        let tasks = service(&backend);
        tasks.refresh().await.unwrap();
        backend.set_failing(true);
        assert!(tasks.refresh().await.is_err());
        assert_eq!(tasks.snapshot().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_refetches_on_interval() {
        let backend = Arc::new(FakeBackend::default());
        let tasks = Arc::new(service(&backend));
        let handle = tasks.spawn_polling(Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(25)).await;
        handle.abort();
        assert_eq!(backend.list_calls(), 2);
    }
}
