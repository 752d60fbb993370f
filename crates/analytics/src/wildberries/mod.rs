//! Клиенты Wildberries Statistics/Analytics API: пагинируемый отчёт
//! о продажах и асинхронные задачи отчётов (платное хранение, остатки).

pub mod client;
pub mod models;
pub mod paid_storage;
pub mod report_detail;
pub mod report_task;
pub mod warehouse_remains;

pub use client::WildberriesApiClient;
