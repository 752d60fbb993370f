use serde::{Deserialize, Serialize};

/// Тип документа в строке отчёта о продажах
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    /// Продажа
    Sale,
    /// Возврат
    Return,
    /// Прочие операции (корректировки, штрафы и т.п.)
    Other,
}

impl DocType {
    /// Нормализация поля `doc_type_name` из отчёта WB.
    /// API возвращает русские наименования ("Продажа", "Возврат"),
    /// но принимаем и английские варианты.
    pub fn from_doc_type_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        if lower.contains("продажа") || lower.contains("sale") {
            DocType::Sale
        } else if lower.contains("возврат") || lower.contains("return") {
            DocType::Return
        } else {
            DocType::Other
        }
    }
}

/// Одна строка отчёта о продажах (reportDetailByPeriod).
///
/// Неизменяема после получения; живёт в пределах одного вызова агрегации.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    /// nmId — ID номенклатуры WB
    pub nm_id: i64,

    /// Тип документа (продажа/возврат/прочее)
    pub doc_type: DocType,

    /// Количество (знаковое)
    pub quantity: i64,

    /// Позиция строки в отчёте (rrd_id из API).
    /// Особенность внешнего протокола: это поле одновременно служит
    /// курсором продолжения пагинации.
    pub cursor: i64,

    /// Артикул продавца (sa_name)
    pub article: String,
}

/// Одна строка отчёта о платном хранении (paid_storage)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageCostRecord {
    /// nmId — ID номенклатуры WB
    pub nm_id: i64,

    /// Стоимость хранения за период строки
    pub warehouse_price: f64,

    /// Артикул продавца
    pub vendor_code: String,

    /// Бренд
    pub brand: String,

    /// Предмет (категория)
    pub subject: String,
}

/// Одна строка отчёта об остатках на складах (warehouse_remains)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseRemainRecord {
    /// nmId — ID номенклатуры WB
    pub nm_id: i64,

    /// Артикул продавца
    pub vendor_code: String,

    /// Бренд
    pub brand: String,

    /// Предмет (категория)
    pub subject: String,

    /// Суммарный остаток по всем складам
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_type_from_russian_names() {
        assert_eq!(DocType::from_doc_type_name("Продажа"), DocType::Sale);
        assert_eq!(DocType::from_doc_type_name("Возврат"), DocType::Return);
    }

    #[test]
    fn test_doc_type_from_english_names() {
        assert_eq!(DocType::from_doc_type_name("sale"), DocType::Sale);
        assert_eq!(DocType::from_doc_type_name("RETURN"), DocType::Return);
    }

    #[test]
    fn test_doc_type_unknown_is_other() {
        assert_eq!(DocType::from_doc_type_name("Штраф"), DocType::Other);
        assert_eq!(DocType::from_doc_type_name(""), DocType::Other);
    }
}
