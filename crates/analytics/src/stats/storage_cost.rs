use contracts::reports::StorageCostRecord;
use contracts::stats::StorageCostRate;
use std::collections::HashMap;

struct StorageAcc {
    total_price: f64,
    count: u32,
    vendor_code: String,
    brand: String,
    subject: String,
}

/// Средняя стоимость хранения по товарам: сумма стоимости / число строк.
///
/// Группа с нулём строк в HashMap появиться не может, но деление
/// всё равно защищено (count == 0 -> 0).
pub fn average_storage_cost(records: &[StorageCostRecord]) -> HashMap<i64, StorageCostRate> {
    let mut groups: HashMap<i64, StorageAcc> = HashMap::new();
    for record in records {
        let acc = groups.entry(record.nm_id).or_insert_with(|| StorageAcc {
            total_price: 0.0,
            count: 0,
            vendor_code: record.vendor_code.clone(),
            brand: record.brand.clone(),
            subject: record.subject.clone(),
        });
        acc.total_price += record.warehouse_price;
        acc.count += 1;
    }

    groups
        .into_iter()
        .map(|(nm_id, acc)| {
            let average = if acc.count > 0 {
                acc.total_price / acc.count as f64
            } else {
                0.0
            };
            (
                nm_id,
                StorageCostRate {
                    average_storage_cost: average,
                    vendor_code: acc.vendor_code,
                    brand: acc.brand,
                    subject: acc.subject,
                },
            )
        })
        .collect()
}
