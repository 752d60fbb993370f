use contracts::reports::{DocType, SalesRecord, StorageCostRecord, WarehouseRemainRecord};
use contracts::tasks::TaskStatus;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Сырые строки внешнего API. Имена полей — как на проводе; разбор и
// выставление значений по умолчанию происходят здесь, на границе fetch,
// чтобы нетипизированные значения не просачивались в агрегацию.
// ---------------------------------------------------------------------------

/// Строка отчёта reportDetailByPeriod (Statistics API, поля в snake_case)
#[derive(Debug, Clone, Deserialize)]
pub struct ReportDetailRow {
    /// Номер строки отчёта; одновременно курсор продолжения пагинации
    pub rrd_id: Option<i64>,
    pub nm_id: Option<i64>,
    pub doc_type_name: Option<String>,
    pub quantity: Option<i64>,
    pub sa_name: Option<String>,
}

impl ReportDetailRow {
    pub fn into_record(self) -> SalesRecord {
        SalesRecord {
            nm_id: self.nm_id.unwrap_or(0),
            doc_type: DocType::from_doc_type_name(self.doc_type_name.as_deref().unwrap_or("")),
            quantity: self.quantity.unwrap_or(0),
            cursor: self.rrd_id.unwrap_or(0),
            article: self.sa_name.unwrap_or_default(),
        }
    }
}

/// Строка отчёта о платном хранении (Analytics API, поля в camelCase)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidStorageRow {
    pub nm_id: Option<i64>,
    pub warehouse_price: Option<f64>,
    pub vendor_code: Option<String>,
    pub brand: Option<String>,
    pub subject: Option<String>,
}

impl PaidStorageRow {
    pub fn into_record(self) -> StorageCostRecord {
        StorageCostRecord {
            nm_id: self.nm_id.unwrap_or(0),
            warehouse_price: self.warehouse_price.unwrap_or(0.0),
            vendor_code: self.vendor_code.unwrap_or_default(),
            brand: self.brand.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
        }
    }
}

/// Строка отчёта об остатках (Analytics API, поля в camelCase)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseRemainRow {
    pub nm_id: Option<i64>,
    pub vendor_code: Option<String>,
    pub brand: Option<String>,
    pub subject_name: Option<String>,
    pub quantity_warehouses_full: Option<i64>,
}

impl WarehouseRemainRow {
    pub fn into_record(self) -> WarehouseRemainRecord {
        WarehouseRemainRecord {
            nm_id: self.nm_id.unwrap_or(0),
            vendor_code: self.vendor_code.unwrap_or_default(),
            brand: self.brand.unwrap_or_default(),
            subject: self.subject_name.unwrap_or_default(),
            quantity: self.quantity_warehouses_full.unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Конверты асинхронных задач отчётов
// ---------------------------------------------------------------------------

/// Ответ на создание задачи: `{"data": {"taskId": "..."}}`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskResponse {
    pub data: Option<CreateTaskData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskData {
    pub task_id: Option<String>,
}

impl CreateTaskResponse {
    /// ID задачи; None, если сервер вернул конверт без id
    pub fn task_id(self) -> Option<String> {
        self.data.and_then(|d| d.task_id).filter(|id| !id.is_empty())
    }
}

/// Ответ на опрос статуса: `{"data": {"id": "...", "status": "done"}}`
#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatusResponse {
    pub data: TaskStatusData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatusData {
    pub id: Option<String>,
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_detail_row_defaults_missing_fields() {
        let row: ReportDetailRow = serde_json::from_str(r#"{"rrd_id": 77}"#).unwrap();
        let record = row.into_record();
        assert_eq!(record.cursor, 77);
        assert_eq!(record.nm_id, 0);
        assert_eq!(record.quantity, 0);
        assert_eq!(record.doc_type, DocType::Other);
        assert_eq!(record.article, "");
    }

    #[test]
    fn test_report_detail_row_full() {
        let json = r#"{
            "rrd_id": 123456,
            "nm_id": 100,
            "doc_type_name": "Продажа",
            "quantity": 2,
            "sa_name": "ART-100"
        }"#;
        let record = serde_json::from_str::<ReportDetailRow>(json)
            .unwrap()
            .into_record();
        assert_eq!(record.nm_id, 100);
        assert_eq!(record.doc_type, DocType::Sale);
        assert_eq!(record.quantity, 2);
        assert_eq!(record.article, "ART-100");
    }

    #[test]
    fn test_paid_storage_row_camel_case() {
        let json = r#"{
            "nmId": 100,
            "warehousePrice": 1.75,
            "vendorCode": "ART-100",
            "brand": "Acme",
            "subject": "Носки"
        }"#;
        let record = serde_json::from_str::<PaidStorageRow>(json)
            .unwrap()
            .into_record();
        assert_eq!(record.nm_id, 100);
        assert_eq!(record.warehouse_price, 1.75);
        assert_eq!(record.brand, "Acme");
    }

    #[test]
    fn test_create_task_response_without_id() {
        let resp: CreateTaskResponse = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert_eq!(resp.task_id(), None);

        let resp: CreateTaskResponse =
            serde_json::from_str(r#"{"data": {"taskId": ""}}"#).unwrap();
        assert_eq!(resp.task_id(), None);

        let resp: CreateTaskResponse =
            serde_json::from_str(r#"{"data": {"taskId": "abc"}}"#).unwrap();
        assert_eq!(resp.task_id(), Some("abc".to_string()));
    }

    #[test]
    fn test_task_status_response() {
        let resp: TaskStatusResponse =
            serde_json::from_str(r#"{"data": {"id": "abc", "status": "processing"}}"#).unwrap();
        assert_eq!(resp.data.status, TaskStatus::Processing);
    }
}
