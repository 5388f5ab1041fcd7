//! Modelo 347: annual declaration of operations with third parties.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::threshold::check_threshold;
use crate::core::{
    CounterpartyInfo, DateRange, DeclaracionError, Declarant, DeclarationPeriod, FinancialRecord,
    Quarter, RecordSource, ResultType, fetch_counterparty, fetch_issued, fetch_received,
    add_amounts, looks_like_tax_id, round2, sum_amounts,
};

/// Kind of operation declared for a counterparty.
///
/// Variant order follows the letter code, so sorting by code sorts by variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperationCode {
    /// A: purchases (adquisiciones de bienes y servicios).
    Purchase,
    /// B: sales (entregas de bienes y prestaciones de servicios).
    Sale,
}

impl OperationCode {
    pub fn code(&self) -> char {
        match self {
            Self::Purchase => 'A',
            Self::Sale => 'B',
        }
    }
}

/// One disclosed counterparty line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredCounterparty {
    /// Set only when the grouping key has a tax-id shape.
    pub tax_id: Option<String>,
    pub name: String,
    pub operation: OperationCode,
    /// VAT-inclusive total for the year.
    pub annual_total: Decimal,
    /// Totals per quarter by invoice month, Q1 first.
    pub quarterly: [Decimal; 4],
    pub operation_count: u32,
}

/// A computed Modelo 347.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThirdPartyReport {
    declarant: Declarant,
    period: DeclarationPeriod,
    counterparties: Vec<DeclaredCounterparty>,
    importe_total: Decimal,
    sales_count: usize,
    sales_amount: Decimal,
    purchases_count: usize,
    purchases_amount: Decimal,
    result_type: ResultType,
}

impl ThirdPartyReport {
    pub fn declarant(&self) -> &Declarant {
        &self.declarant
    }

    pub fn period(&self) -> &DeclarationPeriod {
        &self.period
    }

    /// Disclosed counterparties, purchases (A) first, then by key.
    pub fn counterparties(&self) -> &[DeclaredCounterparty] {
        &self.counterparties
    }

    pub fn num_declarados(&self) -> usize {
        self.counterparties.len()
    }

    pub fn importe_total(&self) -> Decimal {
        self.importe_total
    }

    pub fn sales_count(&self) -> usize {
        self.sales_count
    }

    pub fn sales_amount(&self) -> Decimal {
        self.sales_amount
    }

    pub fn purchases_count(&self) -> usize {
        self.purchases_count
    }

    pub fn purchases_amount(&self) -> Decimal {
        self.purchases_amount
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }
}

#[derive(Default)]
struct Group {
    name: Option<String>,
    counterparty_id: Option<String>,
    total: Decimal,
    quarterly: [Decimal; 4],
    count: u32,
}

/// Compute a Modelo 347 from a year of fetched records.
///
/// `directory` maps counterparty ids to display data; ids missing from it
/// fall back to the name on the records.
pub fn compute_347(
    declarant: &Declarant,
    year: i32,
    issued: &[FinancialRecord],
    received: &[FinancialRecord],
    directory: &HashMap<String, CounterpartyInfo>,
) -> Result<ThirdPartyReport, DeclaracionError> {
    let period = DeclarationPeriod::annual(year)?;
    let range = period.range();

    let mut groups: BTreeMap<(OperationCode, String), Group> = BTreeMap::new();
    group_into(&mut groups, OperationCode::Sale, issued, range)?;
    group_into(&mut groups, OperationCode::Purchase, received, range)?;

    let mut counterparties = Vec::new();
    for ((operation, key), group) in groups {
        let annual_total = round2(group.total);
        let check = check_threshold(annual_total);
        if !check.included {
            tracing::debug!(
                key = %key,
                operation = %operation.code(),
                total = %annual_total,
                margin = %check.margin,
                "counterparty below disclosure threshold"
            );
            continue;
        }

        let known = group
            .counterparty_id
            .as_deref()
            .and_then(|id| directory.get(id));
        let name = known
            .map(|info| info.name.clone())
            .or(group.name)
            .unwrap_or_else(|| key.clone());
        let tax_id = looks_like_tax_id(&key).then(|| key.clone());

        counterparties.push(DeclaredCounterparty {
            tax_id,
            name,
            operation,
            annual_total,
            quarterly: group.quarterly.map(round2),
            operation_count: group.count,
        });
    }

    // Totals come from the filtered list only.
    let importe_total = sum_amounts("importe_total", counterparties.iter().map(|c| c.annual_total))?;
    let (sales, purchases): (Vec<_>, Vec<_>) = counterparties
        .iter()
        .partition(|c| c.operation == OperationCode::Sale);
    let sales_amount = sum_amounts("sales_amount", sales.iter().map(|c| c.annual_total))?;
    let purchases_amount =
        sum_amounts("purchases_amount", purchases.iter().map(|c| c.annual_total))?;
    let (sales_count, purchases_count) = (sales.len(), purchases.len());

    let result_type = if counterparties.is_empty() {
        ResultType::Zero
    } else {
        ResultType::Informative
    };

    tracing::debug!(
        model = "347",
        period = %period,
        declared = counterparties.len(),
        importe_total = %importe_total,
        "computed third-party report"
    );

    Ok(ThirdPartyReport {
        declarant: declarant.clone(),
        period,
        counterparties,
        importe_total,
        sales_count,
        sales_amount,
        purchases_count,
        purchases_amount,
        result_type,
    })
}

/// Fetch the year's records and counterparty data from `source` and compute a Modelo 347.
pub fn build_347<S: RecordSource + ?Sized>(
    source: &S,
    declarant: &Declarant,
    year: i32,
) -> Result<ThirdPartyReport, DeclaracionError> {
    let period = DeclarationPeriod::annual(year)?;
    let issued = fetch_issued(source, period.range())?;
    let received = fetch_received(source, period.range())?;

    let ids: BTreeSet<&str> = issued
        .iter()
        .chain(&received)
        .filter_map(|r| r.counterparty_id.as_deref())
        .collect();
    let mut directory = HashMap::with_capacity(ids.len());
    for id in ids {
        if let Some(info) = fetch_counterparty(source, id)? {
            directory.insert(id.to_string(), info);
        }
    }

    compute_347(declarant, year, &issued, &received, &directory)
}

fn group_into(
    groups: &mut BTreeMap<(OperationCode, String), Group>,
    operation: OperationCode,
    records: &[FinancialRecord],
    range: DateRange,
) -> Result<(), DeclaracionError> {
    for record in records {
        let Some(date) = record.date.filter(|d| range.contains(*d)) else {
            continue;
        };
        let Some(key) = group_key(record) else {
            tracing::debug!(
                reference = record.reference.as_deref().unwrap_or(""),
                "record has no counterparty; not attributable"
            );
            continue;
        };

        record.check_amounts()?;
        let group = groups.entry((operation, key)).or_default();
        group.total = add_amounts("total", group.total, record.total)?;
        let bucket = &mut group.quarterly[usize::from(Quarter::of_date(date).number() - 1)];
        *bucket = add_amounts("total", *bucket, record.total)?;
        group.count += 1;
        if group.name.is_none() {
            group.name = record.counterparty_name.clone();
        }
        if group.counterparty_id.is_none() {
            group.counterparty_id = record.counterparty_id.clone();
        }
    }
    Ok(())
}

/// Tax id if present, else name, else collaborator id.
fn group_key(record: &FinancialRecord) -> Option<String> {
    record
        .counterparty_tax_id
        .clone()
        .or_else(|| record.counterparty_name.clone())
        .or_else(|| record.counterparty_id.clone())
}
