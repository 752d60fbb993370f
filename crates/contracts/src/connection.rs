use serde::{Deserialize, Serialize};

/// Параметры подключения к кабинету продавца Wildberries.
///
/// API-ключ всегда передаётся явно (параметром), библиотека не читает его
/// из переменных окружения.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WbConnection {
    /// Идентификатор магазина/кабинета — используется как entity_id
    /// в ключах кэша
    pub store_id: String,

    /// API-ключ продавца (заголовок Authorization)
    pub api_key: String,
}

impl WbConnection {
    pub fn new(store_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            api_key: api_key.into(),
        }
    }
}
