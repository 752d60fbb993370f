use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::reports::SalesRecord;

use super::client::WildberriesApiClient;
use super::models::ReportDetailRow;

/// Размер страницы reportDetailByPeriod
pub const REPORT_DETAIL_PAGE_LIMIT: i64 = 100_000;

/// Источник страниц отчёта о продажах.
///
/// Курсор продолжения — `rrd_id` последней строки предыдущей страницы
/// (особенность протокола: отдельного конверта "next page" нет).
#[async_trait]
pub trait ReportDetailSource {
    async fn fetch_page(
        &self,
        api_key: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        cursor: i64,
        limit: i64,
    ) -> Result<Vec<SalesRecord>>;
}

#[async_trait]
impl ReportDetailSource for WildberriesApiClient {
    async fn fetch_page(
        &self,
        api_key: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        cursor: i64,
        limit: i64,
    ) -> Result<Vec<SalesRecord>> {
        let url = self.statistics_url("/api/v5/supplier/reportDetailByPeriod");
        let query = [
            ("dateFrom", date_from.format("%Y-%m-%d").to_string()),
            ("dateTo", date_to.format("%Y-%m-%d").to_string()),
            ("rrdid", cursor.to_string()),
            ("limit", limit.to_string()),
        ];

        // На пустом периоде API возвращает null вместо пустого массива
        let rows: Option<Vec<ReportDetailRow>> = self.get_json(&url, api_key, &query).await?;

        Ok(rows
            .unwrap_or_default()
            .into_iter()
            .map(ReportDetailRow::into_record)
            .collect())
    }
}

/// Выкачать отчёт о продажах целиком, страница за страницей.
///
/// Контракт "всё или ничего": ошибка любой страницы прерывает весь вызов,
/// частично накопленные строки не возвращаются. Повторов на этом уровне
/// нет — политика retry принадлежит вызывающему коду.
pub async fn fetch_full_report<S: ReportDetailSource + Sync>(
    source: &S,
    api_key: &str,
    date_from: NaiveDate,
    date_to: NaiveDate,
    start_cursor: i64,
) -> Result<Vec<SalesRecord>> {
    fetch_full_report_paged(
        source,
        api_key,
        date_from,
        date_to,
        start_cursor,
        REPORT_DETAIL_PAGE_LIMIT,
    )
    .await
}

pub(crate) async fn fetch_full_report_paged<S: ReportDetailSource + Sync>(
    source: &S,
    api_key: &str,
    date_from: NaiveDate,
    date_to: NaiveDate,
    start_cursor: i64,
    limit: i64,
) -> Result<Vec<SalesRecord>> {
    let mut all_records = Vec::new();
    let mut cursor = start_cursor;

    loop {
        let page = source
            .fetch_page(api_key, date_from, date_to, cursor, limit)
            .await?;

        let page_len = page.len() as i64;
        let next_cursor = page.last().map(|r| r.cursor).unwrap_or(0);
        all_records.extend(page);

        tracing::debug!(
            "Report detail page: {} rows, next cursor {}",
            page_len,
            next_cursor
        );

        // Неполная (в т.ч. пустая) страница — отчёт исчерпан
        if page_len < limit {
            break;
        }
        if next_cursor == 0 {
            break;
        }
        // Защита от зацикливания на сервере, возвращающем тот же курсор
        if next_cursor == cursor {
            tracing::warn!("Report detail cursor stalled at {}, stopping", cursor);
            break;
        }
        cursor = next_cursor;
    }

    tracing::info!(
        "Fetched {} report detail rows for {} - {}",
        all_records.len(),
        date_from,
        date_to
    );
    Ok(all_records)
}
