use serde::{Deserialize, Serialize};

/// Конверт кэшируемого значения: данные + момент записи + срок жизни.
///
/// Хранится в key-value подложке как JSON. Просроченная запись не удаляется
/// при чтении (ленивая инвалидация), она просто перестаёт считаться валидной.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// Полезная нагрузка
    pub data: T,

    /// Момент записи (epoch, миллисекунды)
    pub timestamp: i64,

    /// Срок жизни записи (миллисекунды)
    pub ttl: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, timestamp: i64, ttl: i64) -> Self {
        Self {
            data,
            timestamp,
            ttl,
        }
    }

    /// Просрочена ли запись на момент `now_ms`.
    /// Запись валидна, пока `now - timestamp <= ttl`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp > self.ttl
    }
}
