use propensity_core::{pays_capital_tax, total_months, ExchangeRates, MortgageRecord};
use serde::Deserialize;
use std::io::Read;
use tracing::info;

use crate::rates::{convert_salaries, RateSource};
use crate::table::{read_rows, ImportError, TableProfile};

pub const MORTGAGE_COLUMNS: [&str; 8] = [
    "full_name",
    "salary_band",
    "years_with_employer",
    "months_with_employer",
    "hours_per_week",
    "capital_gain",
    "capital_loss",
    "workclass",
];

/// Placeholder the mortgage extract uses for an unknown workclass.
const MISSING_WORKCLASS: &str = "?";

#[derive(Debug, Deserialize)]
struct MortgageRow {
    full_name: Option<String>,
    salary_band: Option<String>,
    years_with_employer: u32,
    months_with_employer: u32,
    hours_per_week: i32,
    capital_gain: i64,
    capital_loss: i64,
    workclass: Option<String>,
}

/// Trims the cell; `?` (and a blank cell) mean "not recorded", not a
/// category of its own.
pub fn normalize_workclass(workclass: Option<String>) -> Option<String> {
    workclass
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty() && w != MISSING_WORKCLASS)
}

/// Imports and cleans the mortgage table: salaries become yearly pounds,
/// tenure becomes months and capital gain/loss becomes a flag.
///
/// `rates` is used as given when non-empty; otherwise one table is fetched
/// from `source` and a fetch failure fails the import.
pub async fn import_mortgage<R: Read>(
    data: R,
    profile: &TableProfile,
    rates: Option<&ExchangeRates>,
    source: &impl RateSource,
) -> Result<Vec<MortgageRecord>, ImportError> {
    let rows: Vec<MortgageRow> = read_rows(data, profile, &MORTGAGE_COLUMNS)?;

    let salary_text: Vec<&str> = rows
        .iter()
        .map(|r| r.salary_band.as_deref().unwrap_or_default())
        .collect();
    let salaries = convert_salaries(&salary_text, rates, source).await?;

    let records = rows
        .into_iter()
        .zip(salaries)
        .enumerate()
        .map(|(index, (row, salary_band))| {
            let total_months_with_employer =
                total_months(row.years_with_employer, row.months_with_employer).ok_or(
                    ImportError::TenureOverflow {
                        row: index + 1,
                        years: row.years_with_employer,
                        months: row.months_with_employer,
                    },
                )?;
            Ok(MortgageRecord {
                full_name: row.full_name.unwrap_or_default(),
                salary_band,
                hours_per_week: row.hours_per_week,
                workclass: normalize_workclass(row.workclass),
                total_months_with_employer,
                pays_capital_tax: pays_capital_tax(row.capital_gain, row.capital_loss),
            })
        })
        .collect::<Result<Vec<_>, ImportError>>()?;

    info!(rows = records.len(), "imported mortgage table");
    Ok(records)
}
