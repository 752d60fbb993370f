pub mod store;

use contracts::cache::CacheEntry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Префикс всех составных ключей кэша в подложке
pub const CACHE_PREFIX: &str = "wb_analytics_";

/// TTL обычных данных (отчёты, метрики) — 15 минут
pub const DEFAULT_TTL_MS: i64 = 15 * 60 * 1000;

/// TTL коэффициентов приёмки — 60 минут
pub const COEFFICIENTS_TTL_MS: i64 = 60 * 60 * 1000;

/// TTL списка складов — 24 часа
pub const WAREHOUSE_LIST_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Логические пространства имён кэша
pub mod keys {
    /// Остатки на складах
    pub const WAREHOUSE_REMAINS: &str = "warehouse_remains";
    /// Справочник складов
    pub const WAREHOUSE_LIST: &str = "warehouse_list";
    /// Коэффициенты приёмки
    pub const COEFFICIENTS: &str = "coefficients";
    /// Отчёт о платном хранении
    pub const PAID_STORAGE: &str = "paid_storage";
    /// Средняя скорость продаж
    pub const AVERAGE_SALES: &str = "average_sales";
}

/// Известные пространства имён для `clear_all` — фиксированный список,
/// не скан по префиксу.
const KNOWN_KEYS: &[&str] = &[
    keys::WAREHOUSE_REMAINS,
    keys::WAREHOUSE_LIST,
    keys::COEFFICIENTS,
    keys::PAID_STORAGE,
    keys::AVERAGE_SALES,
];

/// Конверт без полезной нагрузки: проверка срока жизни читает только
/// `timestamp` и `ttl`, поле `data` пропускается без разбора.
#[derive(serde::Deserialize)]
struct EntryEnvelope {
    timestamp: i64,
    ttl: i64,
}

impl EntryEnvelope {
    fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp > self.ttl
    }
}

/// Кэш с TTL поверх key-value подложки.
///
/// Семантика чтения ленивая: просроченная запись возвращается как промах,
/// но из подложки не удаляется (перезаписывается следующим `save`).
/// Любая ошибка сериализации/разбора логируется и превращается в промах —
/// кэш не может уронить вызывающий код.
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
}

impl CacheStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Составной ключ: префикс + логический ключ + id сущности
    fn composite_key(logical_key: &str, entity_id: &str) -> String {
        format!("{}{}_{}", CACHE_PREFIX, logical_key, entity_id)
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Сохранить значение с заданным TTL. Перезаписывает молча.
    pub fn save<T: Serialize>(&self, logical_key: &str, entity_id: &str, data: &T, ttl_ms: i64) {
        let entry = CacheEntry::new(data, Self::now_ms(), ttl_ms);
        match serde_json::to_string(&entry) {
            Ok(json) => {
                self.store.set(&Self::composite_key(logical_key, entity_id), &json);
                tracing::debug!(
                    "Cache save: key={}, entity={}, ttl={}ms",
                    logical_key,
                    entity_id,
                    ttl_ms
                );
            }
            Err(e) => {
                tracing::warn!("Failed to serialize cache entry for {}: {}", logical_key, e);
            }
        }
    }

    /// Прочитать значение; None — если записи нет, она просрочена
    /// или не разбирается. Просроченная запись НЕ удаляется.
    pub fn load<T: DeserializeOwned>(&self, logical_key: &str, entity_id: &str) -> Option<T> {
        let raw = self.store.get(&Self::composite_key(logical_key, entity_id))?;
        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Corrupted cache entry for {}: {}", logical_key, e);
                return None;
            }
        };
        if entry.is_expired_at(Self::now_ms()) {
            tracing::debug!("Cache expired: key={}, entity={}", logical_key, entity_id);
            return None;
        }
        Some(entry.data)
    }

    /// Проверка валидности без десериализации полезной нагрузки.
    /// Любая ошибка разбора — false (fail closed).
    pub fn is_valid(&self, logical_key: &str, entity_id: &str) -> bool {
        let raw = match self.store.get(&Self::composite_key(logical_key, entity_id)) {
            Some(raw) => raw,
            None => return false,
        };
        match serde_json::from_str::<EntryEnvelope>(&raw) {
            Ok(envelope) => !envelope.is_expired_at(Self::now_ms()),
            Err(e) => {
                tracing::warn!("Corrupted cache entry for {}: {}", logical_key, e);
                false
            }
        }
    }

    /// Удалить одну запись
    pub fn clear(&self, logical_key: &str, entity_id: &str) {
        self.store.remove(&Self::composite_key(logical_key, entity_id));
    }

    /// Удалить все известные пространства имён для сущности
    pub fn clear_all(&self, entity_id: &str) {
        for key in KNOWN_KEYS {
            self.clear(key, entity_id);
        }
        tracing::debug!("Cache cleared for entity {}", entity_id);
    }

    /// Сервисная зачистка: удалить из подложки все просроченные
    /// (и нечитаемые) записи кэша. Возвращает число удалённых.
    ///
    /// Отступление от исходной системы: там записи жили в хранилище
    /// вечно и только перезаписывались.
    pub fn purge_expired(&self) -> usize {
        let now = Self::now_ms();
        let mut removed = 0;
        for key in self.store.keys() {
            if !key.starts_with(CACHE_PREFIX) {
                continue;
            }
            let Some(raw) = self.store.get(&key) else {
                continue;
            };
            let stale = match serde_json::from_str::<EntryEnvelope>(&raw) {
                Ok(envelope) => envelope.is_expired_at(now),
                // Нечитаемая запись бесполезна — тоже убираем
                Err(_) => true,
            };
            if stale {
                self.store.remove(&key);
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::info!("Purged {} expired cache entries", removed);
        }
        removed
    }
}
