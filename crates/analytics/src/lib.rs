//! Аналитика продавца Wildberries: загрузка отчётов и расчёт метрик.
//!
//! Библиотечный слой без UI: клиент Statistics/Analytics API, пагинация
//! отчёта о продажах, опрос асинхронных задач (платное хранение, остатки),
//! кэш с TTL поверх внедряемого key-value хранилища и агрегация
//! per-product метрик (скорость продаж, стоимость хранения).

pub mod shared;
pub mod stats;
pub mod wildberries;
