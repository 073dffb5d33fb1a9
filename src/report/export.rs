//! The CSV export of the fund report.

use axum::{
    extract::{Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};

use crate::{
    error::Error,
    html::format_date,
    ledger::EntryCategory,
    report::{
        engine::{ReportEntry, filter_by_campaign, sorted_by_newest},
        handlers::{ReportQuery, ReportState, load_report_entries, parse_campaign_filter},
    },
};

/// The file name the browser saves the export as.
const EXPORT_FILE_NAME: &str = "fund-report.csv";

/// Download the filtered, newest-first listing as a CSV file.
pub async fn get_transparency_export(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let campaign_filter = parse_campaign_filter(query.campaign.as_deref());

    let entries = load_report_entries(&state)?;
    let entries = sorted_by_newest(filter_by_campaign(entries, campaign_filter));

    let csv = write_csv(&entries)?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Write the entries as CSV with the columns date, description, campaign,
/// category, and amount.
///
/// Expense amounts are written as negative numbers so the column sums to the
/// fund balance in a spreadsheet.
pub(super) fn write_csv(entries: &[ReportEntry]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["date", "description", "campaign", "category", "amount"])
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for entry in entries {
        let amount = match entry.category {
            EntryCategory::Income => entry.amount.abs(),
            EntryCategory::Expense => -entry.amount.abs(),
        };

        writer
            .write_record([
                format_date(entry.date),
                entry.description.clone(),
                entry.campaign_title.clone().unwrap_or_default(),
                entry.category.as_str().to_owned(),
                format!("{amount}"),
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}
