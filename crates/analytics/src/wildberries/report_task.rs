use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::tasks::{AsyncReportTask, TaskStatus};
use std::time::Duration;
use thiserror::Error;

/// Ошибки жизненного цикла асинхронной задачи отчёта.
///
/// Таймаут и серверный отказ различаются намеренно: после таймаута задача
/// ещё может завершиться, если опрашивать дольше; canceled/purged — нет.
#[derive(Debug, Error)]
pub enum ReportTaskError {
    #[error("report task {task_id} did not finish after {attempts} status polls")]
    Timeout { task_id: String, attempts: u32 },

    #[error("report task {task_id} ended in terminal status {status:?}")]
    Failed { task_id: String, status: TaskStatus },
}

/// Параметры опроса статуса
#[derive(Debug, Clone)]
pub struct TaskPollOptions {
    /// Максимум попыток опроса; исчерпание — таймаут
    pub max_attempts: u32,
    /// Пауза между попытками
    pub interval: Duration,
}

impl Default for TaskPollOptions {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(5),
        }
    }
}

/// Источник отчёта, который сервер формирует асинхронно:
/// submit возвращает id задачи, статус опрашивается до `done`,
/// затем скачивается готовый результат.
#[async_trait]
pub trait ReportTaskSource {
    type Row;

    /// Создать задачу; ошибка, если ответ сервера не содержит id
    async fn create_task(
        &self,
        api_key: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<String>;

    async fn task_status(&self, api_key: &str, task_id: &str) -> Result<TaskStatus>;

    /// Скачивание валидно только после успешного `poll_until_done`
    async fn download(&self, api_key: &str, task_id: &str) -> Result<Vec<Self::Row>>;
}

/// Опрашивать статус задачи до `done`.
///
/// Опрос строго последовательный: каждая итерация ждёт ответа предыдущей,
/// между итерациями — пауза `interval`. Ошибка сети на любой итерации
/// прерывает опрос без внутреннего retry.
pub async fn poll_until_done<S>(
    source: &S,
    api_key: &str,
    task_id: &str,
    opts: &TaskPollOptions,
) -> Result<()>
where
    S: ReportTaskSource + Sync,
    S::Row: Send,
{
    for attempt in 1..=opts.max_attempts {
        let status = source.task_status(api_key, task_id).await?;
        tracing::debug!(
            "Task {} status poll {}/{}: {:?}",
            task_id,
            attempt,
            opts.max_attempts,
            status
        );

        match status {
            TaskStatus::Done => return Ok(()),
            TaskStatus::Canceled | TaskStatus::Purged => {
                return Err(ReportTaskError::Failed {
                    task_id: task_id.to_string(),
                    status,
                }
                .into());
            }
            TaskStatus::New | TaskStatus::Processing => {
                if attempt < opts.max_attempts {
                    tokio::time::sleep(opts.interval).await;
                }
            }
        }
    }

    Err(ReportTaskError::Timeout {
        task_id: task_id.to_string(),
        attempts: opts.max_attempts,
    }
    .into())
}

/// Полный цикл: создать задачу, дождаться готовности, скачать результат
pub async fn fetch_task_report<S>(
    source: &S,
    api_key: &str,
    date_from: NaiveDate,
    date_to: NaiveDate,
    opts: &TaskPollOptions,
) -> Result<Vec<S::Row>>
where
    S: ReportTaskSource + Sync,
    S::Row: Send,
{
    let task_id = source.create_task(api_key, date_from, date_to).await?;
    let task = AsyncReportTask {
        task_id,
        status: TaskStatus::New,
        created_at: chrono::Utc::now(),
    };
    tracing::info!(
        "Created report task {} for {} - {}",
        task.task_id,
        date_from,
        date_to
    );

    poll_until_done(source, api_key, &task.task_id, opts).await?;

    source.download(api_key, &task.task_id).await
}
