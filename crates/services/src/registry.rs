use chrono::{DateTime, Datelike, Utc};
use portal_core::Clock;
use portal_core::model::ProtocolRecord;
use storage::stores::ProtocolRegistryStore;

/// Status facet of the registry screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Passed,
    Failed,
}

/// Sort orders the registry screen offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Newest completion first.
    #[default]
    Date,
    /// Protocol label, descending.
    Number,
    /// Listener name, ascending; records without a name sort first.
    Name,
}

/// Read-side query over the registry. Never mutates stored data.
#[derive(Debug, Clone, Default)]
pub struct ProtocolQuery {
    pub status: StatusFilter,
    pub search: Option<String>,
    pub sort: SortBy,
}

/// Counters shown above the registry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub this_month: usize,
}

fn matches_search(record: &ProtocolRecord, query: &str) -> bool {
    let query = query.to_lowercase();
    record.protocol_number().to_lowercase().contains(&query)
        || record.test_title().to_lowercase().contains(&query)
        || record
            .listener_name()
            .is_some_and(|name| name.to_lowercase().contains(&query))
}

/// Applies status/search filtering and then sorting, as a pure projection.
#[must_use]
pub fn filter_protocols(records: &[ProtocolRecord], query: &ProtocolQuery) -> Vec<ProtocolRecord> {
    let mut filtered: Vec<ProtocolRecord> = records
        .iter()
        .filter(|record| match query.status {
            StatusFilter::All => true,
            StatusFilter::Passed => record.passed(),
            StatusFilter::Failed => !record.passed(),
        })
        .filter(|record| match query.search.as_deref() {
            Some(search) if !search.is_empty() => matches_search(record, search),
            _ => true,
        })
        .cloned()
        .collect();

    match query.sort {
        SortBy::Date => filtered.sort_by(|a, b| b.completed_at().cmp(&a.completed_at())),
        SortBy::Number => {
            filtered.sort_by(|a, b| b.protocol_number().cmp(a.protocol_number()));
        }
        SortBy::Name => filtered.sort_by(|a, b| {
            a.listener_name()
                .unwrap_or_default()
                .cmp(b.listener_name().unwrap_or_default())
        }),
    }

    filtered
}

/// Counters over the unfiltered registry.
#[must_use]
pub fn registry_stats(records: &[ProtocolRecord], now: DateTime<Utc>) -> RegistryStats {
    let passed = records.iter().filter(|r| r.passed()).count();
    let this_month = records
        .iter()
        .filter(|r| {
            r.completed_at().month() == now.month() && r.completed_at().year() == now.year()
        })
        .count();
    RegistryStats {
        total: records.len(),
        passed,
        failed: records.len() - passed,
        this_month,
    }
}

// ─── CSV export ────────────────────────────────────────────────────────────────

const EXPORT_HEADERS: [&str; 6] = [
    "№ протокола",
    "Дата",
    "Тест",
    "ФИО",
    "Результат %",
    "Статус",
];

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Renders records as the registry export: UTF-8 with a BOM prefix, comma
/// delimiters, every field double-quoted (embedded quotes doubled), one row
/// per record under the fixed header.
#[must_use]
pub fn export_csv(records: &[ProtocolRecord]) -> String {
    let mut csv = String::from('\u{FEFF}');
    csv.push_str(&EXPORT_HEADERS.join(","));
    csv.push('\n');

    for record in records {
        let status = if record.passed() {
            "Пройден"
        } else {
            "Не пройден"
        };
        let row = [
            csv_field(record.protocol_number()),
            csv_field(
                &record
                    .completed_at()
                    .format("%d.%m.%Y %H:%M:%S")
                    .to_string(),
            ),
            csv_field(record.test_title()),
            csv_field(record.listener_name().unwrap_or("Не указано")),
            csv_field(&record.percentage().to_string()),
            csv_field(status),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

/// Download name for an export taken on the given day.
#[must_use]
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("protocols_registry_{}.csv", now.format("%Y-%m-%d"))
}

/// Registry screen backend: projections plus export over the persisted list.
#[derive(Clone)]
pub struct RegistryService {
    clock: Clock,
    protocols: ProtocolRegistryStore,
}

impl RegistryService {
    #[must_use]
    pub fn new(clock: Clock, protocols: ProtocolRegistryStore) -> Self {
        Self { clock, protocols }
    }

    /// Filtered and sorted records for the table.
    pub async fn list(&self, query: &ProtocolQuery) -> Vec<ProtocolRecord> {
        filter_protocols(&self.protocols.list().await, query)
    }

    /// Header counters.
    pub async fn stats(&self) -> RegistryStats {
        registry_stats(&self.protocols.list().await, self.clock.now())
    }

    /// Export blob and its filename for the current filter.
    pub async fn export(&self, query: &ProtocolQuery) -> (String, String) {
        let records = self.list(query).await;
        (export_csv(&records), export_filename(self.clock.now()))
    }

    /// Deletes one protocol from the registry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write cannot be performed.
    pub async fn delete(
        &self,
        id: &portal_core::model::ProtocolId,
    ) -> Result<(), storage::kv::StorageError> {
        self.protocols.remove(id).await
    }
}
