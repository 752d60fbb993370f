use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Статус асинхронной задачи формирования отчёта на стороне WB.
///
/// Переходы только вперёд: new/processing -> done (успех)
/// или new/processing -> canceled/purged (терминальный отказ).
/// Отмены со стороны клиента нет — клиент только опрашивает статус.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    New,
    Processing,
    Done,
    Canceled,
    Purged,
}

impl TaskStatus {
    /// Терминальный статус (дальше опрашивать бессмысленно)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Done | TaskStatus::Canceled | TaskStatus::Purged
        )
    }

    /// Терминальный отказ сервера (задача не будет выполнена)
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::Canceled | TaskStatus::Purged)
    }
}

/// Задача формирования отчёта, созданная submit-вызовом
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncReportTask {
    /// ID задачи, выданный сервером
    pub task_id: String,

    /// Последний известный статус
    pub status: TaskStatus,

    /// Момент создания задачи (на нашей стороне)
    pub created_at: DateTime<Utc>,
}
