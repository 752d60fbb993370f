use chrono::NaiveDate;

/// Число дней в периоде, оба конца включительно.
///
/// Формула источника: `ceil((date_to - date_from) / 1 день) + 1`;
/// для целых календарных дат ceil вырождается в обычную разницу.
/// Для любого периода с `from <= to` результат >= 1; при `from > to`
/// результат <= 0 и вызывающий код обязан отбросить такой период.
pub fn days_in_period(date_from: NaiveDate, date_to: NaiveDate) -> i64 {
    (date_to - date_from).num_days() + 1
}
