use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::reports::WarehouseRemainRecord;
use contracts::tasks::TaskStatus;

use super::client::WildberriesApiClient;
use super::models::{CreateTaskResponse, TaskStatusResponse, WarehouseRemainRow};
use super::report_task::ReportTaskSource;

/// Отчёт об остатках на складах: тот же асинхронный паттерн задач,
/// что и у платного хранения. Период отчёту не нужен — API отдаёт
/// текущие остатки, параметры дат игнорируются.
pub struct WarehouseRemainsApi<'a> {
    pub client: &'a WildberriesApiClient,
}

impl<'a> WarehouseRemainsApi<'a> {
    pub fn new(client: &'a WildberriesApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReportTaskSource for WarehouseRemainsApi<'_> {
    type Row = WarehouseRemainRecord;

    async fn create_task(
        &self,
        api_key: &str,
        _date_from: NaiveDate,
        _date_to: NaiveDate,
    ) -> Result<String> {
        let url = self.client.analytics_url("/api/v1/warehouse_remains");
        let query = [
            ("locale", "ru".to_string()),
            ("groupByNm", "true".to_string()),
        ];

        let response: CreateTaskResponse = self.client.get_json(&url, api_key, &query).await?;
        response
            .task_id()
            .ok_or_else(|| anyhow::anyhow!("warehouse_remains response does not contain task id"))
    }

    async fn task_status(&self, api_key: &str, task_id: &str) -> Result<TaskStatus> {
        let url = self
            .client
            .analytics_url(&format!("/api/v1/warehouse_remains/tasks/{}/status", task_id));
        let response: TaskStatusResponse = self.client.get_json(&url, api_key, &[]).await?;
        Ok(response.data.status)
    }

    async fn download(&self, api_key: &str, task_id: &str) -> Result<Vec<WarehouseRemainRecord>> {
        let url = self.client.analytics_url(&format!(
            "/api/v1/warehouse_remains/tasks/{}/download",
            task_id
        ));
        let rows: Vec<WarehouseRemainRow> = self.client.get_json(&url, api_key, &[]).await?;
        Ok(rows
            .into_iter()
            .map(WarehouseRemainRow::into_record)
            .collect())
    }
}
