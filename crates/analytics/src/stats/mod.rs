//! Агрегация отчётов в per-product метрики и сводный сервис.

pub mod product_stats;
pub mod sales_rate;
pub mod storage_cost;

pub use product_stats::ProductStatsService;
