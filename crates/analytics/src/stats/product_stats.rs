use anyhow::Result;
use chrono::NaiveDate;
use contracts::connection::WbConnection;
use contracts::reports::WarehouseRemainRecord;
use contracts::stats::{DailySalesRate, ProductStats, StorageCostRate};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use crate::shared::cache::{self, CacheStore};
use crate::wildberries::paid_storage::PaidStorageApi;
use crate::wildberries::report_detail::fetch_full_report;
use crate::wildberries::report_task::{fetch_task_report, TaskPollOptions};
use crate::wildberries::warehouse_remains::WarehouseRemainsApi;
use crate::wildberries::WildberriesApiClient;

use super::sales_rate::average_daily_sales;
use super::storage_cost::average_storage_cost;

/// Маркер "имя не определить": ни артикула в продажах,
/// ни бренда/предмета в хранении
pub const NAME_NOT_AVAILABLE: &str = "Нет данных";

/// Фолбэк стоимости хранения, руб/день — применяется вызывающим кодом,
/// когда по товару нет данных о хранении
pub const DEFAULT_STORAGE_COST_RUB: f64 = 5.0;

/// Фолбэк скорости продаж, шт/день — применяется вызывающим кодом,
/// когда по товару нет данных о продажах
pub const DEFAULT_DAILY_SALES_RATE: f64 = 0.1;

/// Объединить метрики продаж и хранения в сводку по товарам.
///
/// Ключи — объединение обоих наборов: товар с продажами без хранения
/// получает стоимость хранения 0, и наоборот. Имя разрешается по цепочке:
/// артикул из продаж -> бренд + предмет из хранения -> "Нет данных".
pub fn merge_product_stats(
    sales: &HashMap<i64, DailySalesRate>,
    storage: &HashMap<i64, StorageCostRate>,
) -> Vec<ProductStats> {
    let nm_ids: BTreeSet<i64> = sales.keys().chain(storage.keys()).copied().collect();

    nm_ids
        .into_iter()
        .map(|nm_id| {
            let sales_rate = sales.get(&nm_id);
            let storage_rate = storage.get(&nm_id);

            let display_name = sales_rate
                .map(|r| r.label.trim())
                .filter(|label| !label.is_empty())
                .map(|label| label.to_string())
                .or_else(|| {
                    storage_rate.and_then(|r| {
                        let name = format!("{} {}", r.brand, r.subject);
                        let name = name.trim().to_string();
                        if name.is_empty() {
                            None
                        } else {
                            Some(name)
                        }
                    })
                })
                .unwrap_or_else(|| NAME_NOT_AVAILABLE.to_string());

            ProductStats {
                nm_id,
                display_name,
                average_daily_sales: sales_rate.map(|r| r.average_daily_sales).unwrap_or(0.0),
                average_storage_cost: storage_rate
                    .map(|r| r.average_storage_cost)
                    .unwrap_or(0.0),
            }
        })
        .collect()
}

/// Вспомогательные данные по товарам, подгружаемые из других источников.
/// Промах любого поиска — это None, не ошибка: значения по умолчанию
/// применяет вызывающий код (см. константы выше).
#[derive(Debug, Clone, Default)]
pub struct ProductAuxData {
    pub prices: HashMap<i64, f64>,
    pub cost_prices: HashMap<i64, f64>,
    pub logistics_costs: HashMap<i64, f64>,
    pub commissions: HashMap<i64, f64>,
}

impl ProductAuxData {
    pub fn price(&self, nm_id: i64) -> Option<f64> {
        self.prices.get(&nm_id).copied()
    }

    pub fn cost_price(&self, nm_id: i64) -> Option<f64> {
        self.cost_prices.get(&nm_id).copied()
    }

    pub fn logistics_cost(&self, nm_id: i64) -> Option<f64> {
        self.logistics_costs.get(&nm_id).copied()
    }

    pub fn commission(&self, nm_id: i64) -> Option<f64> {
        self.commissions.get(&nm_id).copied()
    }
}

/// Сервис per-product метрик: гоняет загрузчики отчётов, агрегирует
/// и кэширует результат по id магазина. Повторный запрос в пределах TTL
/// обслуживается из кэша без похода в сеть.
///
/// Ошибки сети/задач всплывают наверх как есть — пользовательские
/// уведомления не задача этого слоя, здесь только логирование.
pub struct ProductStatsService {
    client: Arc<WildberriesApiClient>,
    cache: CacheStore,
}

impl ProductStatsService {
    pub fn new(client: Arc<WildberriesApiClient>, cache: CacheStore) -> Self {
        Self { client, cache }
    }

    /// Средняя дневная скорость продаж за период (кэш: average_sales)
    pub async fn daily_sales_rates(
        &self,
        conn: &WbConnection,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<HashMap<i64, DailySalesRate>> {
        if let Some(cached) = self
            .cache
            .load(cache::keys::AVERAGE_SALES, &conn.store_id)
        {
            tracing::debug!("Daily sales rates served from cache for {}", conn.store_id);
            return Ok(cached);
        }

        let records =
            fetch_full_report(self.client.as_ref(), &conn.api_key, date_from, date_to, 0).await?;
        let rates = average_daily_sales(&records, date_from, date_to);

        self.cache.save(
            cache::keys::AVERAGE_SALES,
            &conn.store_id,
            &rates,
            cache::DEFAULT_TTL_MS,
        );
        Ok(rates)
    }

    /// Средняя стоимость хранения за период (кэш: paid_storage)
    pub async fn storage_cost_rates(
        &self,
        conn: &WbConnection,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<HashMap<i64, StorageCostRate>> {
        if let Some(cached) = self.cache.load(cache::keys::PAID_STORAGE, &conn.store_id) {
            tracing::debug!("Storage cost rates served from cache for {}", conn.store_id);
            return Ok(cached);
        }

        let api = PaidStorageApi::new(self.client.as_ref());
        let records = fetch_task_report(
            &api,
            &conn.api_key,
            date_from,
            date_to,
            &TaskPollOptions::default(),
        )
        .await?;
        let rates = average_storage_cost(&records);

        self.cache.save(
            cache::keys::PAID_STORAGE,
            &conn.store_id,
            &rates,
            cache::DEFAULT_TTL_MS,
        );
        Ok(rates)
    }

    /// Текущие остатки на складах (кэш: warehouse_remains)
    pub async fn warehouse_remains(
        &self,
        conn: &WbConnection,
    ) -> Result<Vec<WarehouseRemainRecord>> {
        if let Some(cached) = self
            .cache
            .load(cache::keys::WAREHOUSE_REMAINS, &conn.store_id)
        {
            tracing::debug!("Warehouse remains served from cache for {}", conn.store_id);
            return Ok(cached);
        }

        // Отчёт без периода — API отдаёт текущие остатки
        let today = chrono::Utc::now().date_naive();
        let api = WarehouseRemainsApi::new(self.client.as_ref());
        let records = fetch_task_report(
            &api,
            &conn.api_key,
            today,
            today,
            &TaskPollOptions {
                max_attempts: 20,
                interval: Duration::from_secs(3),
            },
        )
        .await?;

        self.cache.save(
            cache::keys::WAREHOUSE_REMAINS,
            &conn.store_id,
            &records,
            cache::DEFAULT_TTL_MS,
        );
        Ok(records)
    }

    /// Сводка по товарам: объединение продаж и хранения (union ключей)
    pub async fn product_stats(
        &self,
        conn: &WbConnection,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<ProductStats>> {
        let sales = self.daily_sales_rates(conn, date_from, date_to).await?;
        let storage = self.storage_cost_rates(conn, date_from, date_to).await?;
        Ok(merge_product_stats(&sales, &storage))
    }

    /// Сбросить все кэши магазина (после смены ключа, принудительное
    /// обновление и т.п.)
    pub fn invalidate(&self, conn: &WbConnection) {
        self.cache.clear_all(&conn.store_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::cache::MemoryStore;

    fn sales_rate(rate: f64, label: &str) -> DailySalesRate {
        DailySalesRate {
            average_daily_sales: rate,
            label: label.to_string(),
        }
    }

    fn storage_rate(rate: f64, brand: &str, subject: &str) -> StorageCostRate {
        StorageCostRate {
            average_storage_cost: rate,
            vendor_code: "ART".to_string(),
            brand: brand.to_string(),
            subject: subject.to_string(),
        }
    }

    #[test]
    fn test_merge_is_union_not_intersection() {
        let mut sales = HashMap::new();
        sales.insert(1, sales_rate(1.0, "ART-1"));
        let mut storage = HashMap::new();
        storage.insert(2, storage_rate(5.0, "Acme", "Носки"));

        let merged = merge_product_stats(&sales, &storage);

        assert_eq!(merged.len(), 2);
        let a = merged.iter().find(|p| p.nm_id == 1).unwrap();
        assert_eq!(a.average_daily_sales, 1.0);
        assert_eq!(a.average_storage_cost, 0.0);
        let b = merged.iter().find(|p| p.nm_id == 2).unwrap();
        assert_eq!(b.average_daily_sales, 0.0);
        assert_eq!(b.average_storage_cost, 5.0);
    }

    #[test]
    fn test_merge_prefers_sales_label() {
        let mut sales = HashMap::new();
        sales.insert(1, sales_rate(1.0, "ART-1"));
        let mut storage = HashMap::new();
        storage.insert(1, storage_rate(5.0, "Acme", "Носки"));

        let merged = merge_product_stats(&sales, &storage);
        assert_eq!(merged[0].display_name, "ART-1");
    }

    #[test]
    fn test_merge_falls_back_to_brand_and_subject() {
        let mut sales = HashMap::new();
        sales.insert(1, sales_rate(1.0, ""));
        let mut storage = HashMap::new();
        storage.insert(1, storage_rate(5.0, "Acme", "Носки"));

        let merged = merge_product_stats(&sales, &storage);
        assert_eq!(merged[0].display_name, "Acme Носки");
    }

    #[test]
    fn test_merge_name_sentinel_when_nothing_known() {
        let mut sales = HashMap::new();
        sales.insert(1, sales_rate(1.0, ""));
        let storage = HashMap::new();

        let merged = merge_product_stats(&sales, &storage);
        assert_eq!(merged[0].display_name, NAME_NOT_AVAILABLE);
    }

    #[test]
    fn test_merge_result_sorted_by_nm_id() {
        let mut sales = HashMap::new();
        sales.insert(30, sales_rate(1.0, "C"));
        sales.insert(10, sales_rate(1.0, "A"));
        sales.insert(20, sales_rate(1.0, "B"));

        let merged = merge_product_stats(&sales, &HashMap::new());
        let ids: Vec<i64> = merged.iter().map(|p| p.nm_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    /// Сервис с клиентом, глядящим на неоткрываемый адрес:
    /// любой поход в сеть завершится ошибкой соединения
    fn unroutable_service() -> (ProductStatsService, CacheStore) {
        let client = Arc::new(WildberriesApiClient::with_base_urls(
            "http://127.0.0.1:9",
            "http://127.0.0.1:9",
            1,
        ));
        let cache = CacheStore::new(Arc::new(MemoryStore::new()));
        (ProductStatsService::new(client, cache.clone()), cache)
    }

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_daily_sales_rates_served_from_warm_cache_without_network() {
        let (service, cache) = unroutable_service();
        let conn = WbConnection::new("store-1", "key");

        let mut rates = HashMap::new();
        rates.insert(1, sales_rate(2.5, "ART-1"));
        cache.save(
            cache::keys::AVERAGE_SALES,
            &conn.store_id,
            &rates,
            cache::DEFAULT_TTL_MS,
        );

        let (from, to) = dates();
        let loaded = service.daily_sales_rates(&conn, from, to).await.unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&1].average_daily_sales, 2.5);
        assert_eq!(loaded[&1].label, "ART-1");
    }

    #[tokio::test]
    async fn test_storage_cost_rates_served_from_warm_cache_without_network() {
        let (service, cache) = unroutable_service();
        let conn = WbConnection::new("store-1", "key");

        let mut rates = HashMap::new();
        rates.insert(2, storage_rate(4.0, "Acme", "Носки"));
        cache.save(
            cache::keys::PAID_STORAGE,
            &conn.store_id,
            &rates,
            cache::DEFAULT_TTL_MS,
        );

        let (from, to) = dates();
        let loaded = service.storage_cost_rates(&conn, from, to).await.unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&2].average_storage_cost, 4.0);
    }

    #[tokio::test]
    async fn test_invalidate_drops_cache_and_next_call_goes_to_network() {
        let (service, cache) = unroutable_service();
        let conn = WbConnection::new("store-1", "key");

        let mut rates = HashMap::new();
        rates.insert(1, sales_rate(2.5, "ART-1"));
        cache.save(
            cache::keys::AVERAGE_SALES,
            &conn.store_id,
            &rates,
            cache::DEFAULT_TTL_MS,
        );

        service.invalidate(&conn);

        // Кэш сброшен — сервис идёт в сеть и падает на недоступном адресе
        let (from, to) = dates();
        let result = service.daily_sales_rates(&conn, from, to).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_aux_data_miss_is_none_not_error() {
        let mut aux = ProductAuxData::default();
        aux.prices.insert(1, 990.0);

        assert_eq!(aux.price(1), Some(990.0));
        assert_eq!(aux.price(2), None);
        assert_eq!(aux.cost_price(1), None);
        assert_eq!(aux.logistics_cost(1), None);
        assert_eq!(aux.commission(1), None);

        // Задокументированные фолбэки — применяются вызывающим кодом
        assert_eq!(DEFAULT_STORAGE_COST_RUB, 5.0);
        assert_eq!(DEFAULT_DAILY_SALES_RATE, 0.1);
    }
}
