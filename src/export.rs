//! Export of the monthly series as CSV for spreadsheets.

use std::{fs::File, io::Write, path::Path};

use crate::{Error, aggregation::MonthlyTotals};

const HEADER: [&str; 4] = ["month", "income", "expenses", "balance"];

/// Writes one `month,income,expenses,balance` row per month to `writer`.
///
/// # Errors
/// Returns [Error::CsvError] if a row cannot be written.
pub fn write_monthly_csv<W: Write>(writer: W, monthly_totals: &[MonthlyTotals]) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;

    for totals in monthly_totals {
        writer.write_record([
            totals.key.to_string(),
            totals.income.round_dp(2).to_string(),
            totals.expenses.round_dp(2).to_string(),
            totals.balance().round_dp(2).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the monthly series to a CSV file at `path`, replacing any existing file.
///
/// # Errors
/// Returns [Error::Io] if the file cannot be created, or [Error::CsvError]
/// if a row cannot be written.
pub fn export_monthly_csv(path: &Path, monthly_totals: &[MonthlyTotals]) -> Result<(), Error> {
    let file = File::create(path).map_err(|error| {
        tracing::error!("could not create {}: {error}", path.display());
        Error::Io(format!("{}: {error}", path.display()))
    })?;

    write_monthly_csv(file, monthly_totals)?;
    tracing::info!("Wrote {} months to {}", monthly_totals.len(), path.display());

    Ok(())
}
