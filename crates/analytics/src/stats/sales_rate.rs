use chrono::NaiveDate;
use contracts::reports::{DocType, SalesRecord};
use contracts::stats::DailySalesRate;
use std::collections::HashMap;

use crate::shared::dates::days_in_period;

struct SalesAcc {
    total_quantity: i64,
    label: String,
}

/// Средняя дневная скорость продаж по товарам за период.
///
/// В числителе — только строки типа "продажа"; возвраты и прочие операции
/// группу не пополняют, но и знаменатель (число дней) не меняют. Товар,
/// у которого были только возвраты, остаётся в результате со скоростью 0.
///
/// При `date_from > date_to` период невалиден и результат пуст
/// (товары не заполняются нулями).
pub fn average_daily_sales(
    records: &[SalesRecord],
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> HashMap<i64, DailySalesRate> {
    let days = days_in_period(date_from, date_to);
    if days <= 0 {
        tracing::warn!(
            "Invalid sales period {} - {}, skipping rate calculation",
            date_from,
            date_to
        );
        return HashMap::new();
    }

    let mut groups: HashMap<i64, SalesAcc> = HashMap::new();
    for record in records {
        let acc = groups.entry(record.nm_id).or_insert_with(|| SalesAcc {
            total_quantity: 0,
            label: record.article.clone(),
        });
        if record.doc_type == DocType::Sale {
            acc.total_quantity += record.quantity;
        }
        if acc.label.is_empty() && !record.article.is_empty() {
            acc.label = record.article.clone();
        }
    }

    groups
        .into_iter()
        .map(|(nm_id, acc)| {
            (
                nm_id,
                DailySalesRate {
                    average_daily_sales: acc.total_quantity as f64 / days as f64,
                    label: acc.label,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(nm_id: i64, doc_type: DocType, quantity: i64) -> SalesRecord {
        SalesRecord {
            nm_id,
            doc_type,
            quantity,
            cursor: 0,
            article: format!("ART-{}", nm_id),
        }
    }

    #[test]
    fn test_single_day_period_excludes_returns_from_numerator() {
        // Сценарий из наблюдаемого поведения источника:
        // продажи 10 + 5, возврат 3, период в один день
        let records = vec![
            record(1, DocType::Sale, 10),
            record(1, DocType::Sale, 5),
            record(1, DocType::Return, 3),
        ];
        let day = date(2025, 3, 15);

        let rates = average_daily_sales(&records, day, day);

        assert_eq!(rates.len(), 1);
        assert_eq!(rates[&1].average_daily_sales, 15.0);
    }

    #[test]
    fn test_rate_divided_by_inclusive_day_count() {
        let records = vec![record(1, DocType::Sale, 30)];
        // 1..10 марта включительно = 10 дней
        let rates = average_daily_sales(&records, date(2025, 3, 1), date(2025, 3, 10));
        assert_eq!(rates[&1].average_daily_sales, 3.0);
    }

    #[test]
    fn test_returns_only_product_has_zero_rate() {
        let records = vec![
            record(1, DocType::Return, 2),
            record(1, DocType::Other, 1),
        ];
        let rates = average_daily_sales(&records, date(2025, 3, 1), date(2025, 3, 10));

        let rate = rates[&1].average_daily_sales;
        assert_eq!(rate, 0.0);
        assert!(!rate.is_nan());
        assert!(rate >= 0.0);
    }

    #[test]
    fn test_groups_by_product() {
        let records = vec![
            record(1, DocType::Sale, 4),
            record(2, DocType::Sale, 8),
            record(1, DocType::Sale, 6),
        ];
        let rates = average_daily_sales(&records, date(2025, 3, 1), date(2025, 3, 5));

        assert_eq!(rates.len(), 2);
        assert_eq!(rates[&1].average_daily_sales, 2.0);
        assert_eq!(rates[&2].average_daily_sales, 1.6);
        assert_eq!(rates[&1].label, "ART-1");
    }

    #[test]
    fn test_reversed_period_yields_empty_map() {
        let records = vec![record(1, DocType::Sale, 10)];
        let rates = average_daily_sales(&records, date(2025, 3, 10), date(2025, 3, 1));
        assert!(rates.is_empty());
    }

    #[test]
    fn test_label_falls_back_to_first_non_empty_article() {
        let mut first = record(1, DocType::Sale, 1);
        first.article = String::new();
        let second = record(1, DocType::Sale, 1);

        let rates = average_daily_sales(&[first, second], date(2025, 3, 1), date(2025, 3, 1));
        assert_eq!(rates[&1].label, "ART-1");
    }
}
