//! Read interfaces the engine needs from the surrounding application.
//!
//! The engine never touches storage directly. Implementations must report
//! fetch failures as `Err`; returning an empty list on failure would produce
//! a zero-valued declaration indistinguishable from a legitimate one.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::error::{DeclaracionError, SourceError};
use super::period::DateRange;
use super::types::{CounterpartyInfo, FinancialRecord, RecordKind};

/// Collaborator that supplies records for a date range.
pub trait RecordSource {
    /// Invoices issued with a date in `[from, to]`.
    fn issued_invoices(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinancialRecord>, SourceError>;

    /// Received invoices and standalone expenses with a date in `[from, to]`.
    fn received_invoices_and_expenses(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinancialRecord>, SourceError>;

    /// Display data for a client or supplier id. `Ok(None)` if unknown.
    fn counterparty_info(&self, id: &str) -> Result<Option<CounterpartyInfo>, SourceError>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn issued_invoices(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinancialRecord>, SourceError> {
        (**self).issued_invoices(from, to)
    }

    fn received_invoices_and_expenses(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinancialRecord>, SourceError> {
        (**self).received_invoices_and_expenses(from, to)
    }

    fn counterparty_info(&self, id: &str) -> Result<Option<CounterpartyInfo>, SourceError> {
        (**self).counterparty_info(id)
    }
}

/// Fetch issued invoices, mapping a failure to [`DeclaracionError::DataUnavailable`].
pub(crate) fn fetch_issued<S: RecordSource + ?Sized>(
    source: &S,
    range: DateRange,
) -> Result<Vec<FinancialRecord>, DeclaracionError> {
    source
        .issued_invoices(range.from, range.to)
        .map_err(|e| DeclaracionError::unavailable("issued_invoices", e))
}

/// Fetch received invoices and expenses, mapping a failure to
/// [`DeclaracionError::DataUnavailable`].
pub(crate) fn fetch_received<S: RecordSource + ?Sized>(
    source: &S,
    range: DateRange,
) -> Result<Vec<FinancialRecord>, DeclaracionError> {
    source
        .received_invoices_and_expenses(range.from, range.to)
        .map_err(|e| DeclaracionError::unavailable("received_invoices_and_expenses", e))
}

/// Look up a counterparty, mapping a failure to [`DeclaracionError::DataUnavailable`].
pub(crate) fn fetch_counterparty<S: RecordSource + ?Sized>(
    source: &S,
    id: &str,
) -> Result<Option<CounterpartyInfo>, DeclaracionError> {
    source
        .counterparty_info(id)
        .map_err(|e| DeclaracionError::unavailable("counterparty_info", e))
}

/// A [`RecordSource`] over records already held in memory.
///
/// Undated records are returned by neither query, matching a storage backend
/// that filters by date.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<FinancialRecord>,
    counterparties: HashMap<String, CounterpartyInfo>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = FinancialRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
            counterparties: HashMap::new(),
        }
    }

    pub fn add_record(&mut self, record: FinancialRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    pub fn add_counterparty(&mut self, id: impl Into<String>, info: CounterpartyInfo) -> &mut Self {
        self.counterparties.insert(id.into(), info);
        self
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    fn select(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        pred: impl Fn(RecordKind) -> bool,
    ) -> Vec<FinancialRecord> {
        let range = DateRange::new(from, to);
        self.records
            .iter()
            .filter(|r| pred(r.kind))
            .filter(|r| r.date.is_some_and(|d| range.contains(d)))
            .cloned()
            .collect()
    }
}

impl RecordSource for InMemorySource {
    fn issued_invoices(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinancialRecord>, SourceError> {
        Ok(self.select(from, to, |k| k == RecordKind::IssuedInvoice))
    }

    fn received_invoices_and_expenses(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinancialRecord>, SourceError> {
        Ok(self.select(from, to, |k| k != RecordKind::IssuedInvoice))
    }

    fn counterparty_info(&self, id: &str) -> Result<Option<CounterpartyInfo>, SourceError> {
        Ok(self.counterparties.get(id).cloned())
    }
}
