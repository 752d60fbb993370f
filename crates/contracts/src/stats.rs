use serde::{Deserialize, Serialize};

/// Средняя дневная скорость продаж товара за период
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySalesRate {
    /// Штук в день: сумма количества по продажам / дней в периоде
    pub average_daily_sales: f64,

    /// Отображаемое имя (артикул продавца из отчёта о продажах)
    pub label: String,
}

/// Средняя стоимость хранения товара
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageCostRate {
    /// Руб/день: сумма стоимости хранения / число строк отчёта
    pub average_storage_cost: f64,

    /// Артикул продавца
    pub vendor_code: String,

    /// Бренд
    pub brand: String,

    /// Предмет (категория)
    pub subject: String,
}

/// Сводные метрики по товару: объединение данных о продажах и хранении.
/// Товар попадает в сводку, если есть хотя бы в одном из двух отчётов
/// (объединение ключей, не пересечение).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductStats {
    /// nmId — ID номенклатуры WB
    pub nm_id: i64,

    /// Отображаемое имя (артикул -> бренд+предмет -> "Нет данных")
    pub display_name: String,

    /// Средняя дневная скорость продаж (0, если продаж не было)
    pub average_daily_sales: f64,

    /// Средняя стоимость хранения (0, если нет данных о хранении)
    pub average_storage_cost: f64,
}
