use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::reports::StorageCostRecord;
use contracts::tasks::TaskStatus;

use super::client::WildberriesApiClient;
use super::models::{CreateTaskResponse, PaidStorageRow, TaskStatusResponse};
use super::report_task::ReportTaskSource;

/// Отчёт о платном хранении: асинхронная задача Analytics API.
///
/// submit -> GET /api/v1/paid_storage
/// poll   -> GET /api/v1/paid_storage/tasks/{id}/status
/// download -> GET /api/v1/paid_storage/tasks/{id}/download
pub struct PaidStorageApi<'a> {
    pub client: &'a WildberriesApiClient,
}

impl<'a> PaidStorageApi<'a> {
    pub fn new(client: &'a WildberriesApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReportTaskSource for PaidStorageApi<'_> {
    type Row = StorageCostRecord;

    async fn create_task(
        &self,
        api_key: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<String> {
        let url = self.client.analytics_url("/api/v1/paid_storage");
        let query = [
            ("dateFrom", date_from.format("%Y-%m-%d").to_string()),
            ("dateTo", date_to.format("%Y-%m-%d").to_string()),
        ];

        let response: CreateTaskResponse = self.client.get_json(&url, api_key, &query).await?;
        response
            .task_id()
            .ok_or_else(|| anyhow::anyhow!("paid_storage response does not contain task id"))
    }

    async fn task_status(&self, api_key: &str, task_id: &str) -> Result<TaskStatus> {
        let url = self
            .client
            .analytics_url(&format!("/api/v1/paid_storage/tasks/{}/status", task_id));
        let response: TaskStatusResponse = self.client.get_json(&url, api_key, &[]).await?;
        Ok(response.data.status)
    }

    async fn download(&self, api_key: &str, task_id: &str) -> Result<Vec<StorageCostRecord>> {
        let url = self
            .client
            .analytics_url(&format!("/api/v1/paid_storage/tasks/{}/download", task_id));
        let rows: Vec<PaidStorageRow> = self.client.get_json(&url, api_key, &[]).await?;
        Ok(rows.into_iter().map(PaidStorageRow::into_record).collect())
    }
}
