//! The pure functions that turn ledger entries into the fund report.
//!
//! Everything in this module is synchronous and side-effect free: the
//! handlers fetch a snapshot of the ledger, then call these functions with
//! the snapshot and an explicit `today`. That keeps the report logic easy to
//! test without a database or a clock.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use time::{Date, Month};

use crate::{
    database_id::CampaignId,
    html::month_short_name,
    ledger::{EntryCategory, LedgerEntry},
};

/// How many entries the recent-transactions feed shows.
pub const RECENT_COUNT: usize = 10;

/// The source label for income with no campaign attached.
pub const GENERAL_DONATION_LABEL: &str = "General Donation";

/// The source label for expenses with no campaign attached.
pub const GENERAL_EXPENSE_LABEL: &str = "General Operating Expense";

/// A ledger entry with its campaign title resolved, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// The entry's ID in the database.
    pub id: i64,
    /// What the money was for.
    pub description: String,
    /// The amount of money that moved, in rupiah. Never negative.
    pub amount: f64,
    /// Whether the money came in or went out.
    pub category: EntryCategory,
    /// The campaign the entry belongs to, if any.
    pub campaign_id: Option<CampaignId>,
    /// The day the money moved.
    pub date: Date,
    /// The title of the campaign, once resolved by
    /// [enrich_with_campaign_titles].
    pub campaign_title: Option<String>,
}

impl From<LedgerEntry> for ReportEntry {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id,
            description: entry.description,
            amount: entry.amount,
            category: entry.category,
            campaign_id: entry.campaign_id,
            date: entry.date,
            campaign_title: None,
        }
    }
}

/// The time window the report is bucketed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Buckets by weekday over the last seven days.
    Week,
    /// Buckets by day of month.
    #[default]
    Month,
    /// Buckets by month.
    Year,
    /// Buckets by month and year, over the whole ledger.
    All,
}

impl Granularity {
    /// The string used for this granularity in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
            Granularity::All => "all",
        }
    }

    /// The label shown to the user for this granularity.
    pub fn display_name(&self) -> &'static str {
        match self {
            Granularity::Week => "This week",
            Granularity::Month => "This month",
            Granularity::Year => "This year",
            Granularity::All => "All time",
        }
    }
}

/// The kind of chart to render on the transparency page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Grouped bars of income and expense per bucket.
    #[default]
    Bar,
    /// Lines of income and expense per bucket.
    Line,
    /// A pie of income by source.
    Pie,
}

impl ChartKind {
    /// The string used for this chart kind in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        }
    }
}

/// The fund totals shown on the summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FundTotals {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts, as a positive number.
    pub expense: f64,
    /// Income minus expense.
    pub balance: f64,
}

/// Income, expense, and balance for one period bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodBucket {
    /// The label shown on the chart axis, e.g. "Mon", "05", or "Jun 2024".
    pub label: String,
    /// The income in this bucket.
    pub income: f64,
    /// The expense in this bucket, as a positive number.
    pub expense: f64,
    /// Income minus expense for this bucket.
    pub balance: f64,
}

/// The total for one source of income or expense.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSlice {
    /// The campaign title, or the generic label for uncategorised entries.
    pub name: String,
    /// The summed amount for this source, as a positive number.
    pub total: f64,
}

/// Percent changes against the previous period.
///
/// `None` means there is no previous period to compare against, which is the
/// case for the all-time view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodComparison {
    /// Percent change in income versus the previous period.
    pub income_change: Option<f64>,
    /// Percent change in expense versus the previous period.
    pub expense_change: Option<f64>,
}

/// Attach campaign titles to entries using the id to title map.
///
/// Entries whose campaign id is absent from the map keep their title unset.
/// Applying this twice with the same map changes nothing.
pub fn enrich_with_campaign_titles(
    entries: Vec<ReportEntry>,
    titles: &HashMap<CampaignId, String>,
) -> Vec<ReportEntry> {
    entries
        .into_iter()
        .map(|mut entry| {
            if let Some(campaign_id) = entry.campaign_id
                && let Some(title) = titles.get(&campaign_id)
            {
                entry.campaign_title = Some(title.clone());
            }

            entry
        })
        .collect()
}

/// Keep only the entries for `campaign`, or everything when `campaign` is
/// `None`.
pub fn filter_by_campaign(
    entries: Vec<ReportEntry>,
    campaign: Option<CampaignId>,
) -> Vec<ReportEntry> {
    match campaign {
        None => entries,
        Some(campaign_id) => entries
            .into_iter()
            .filter(|entry| entry.campaign_id == Some(campaign_id))
            .collect(),
    }
}

/// Sum the entries into the totals for the summary cards.
pub fn summarise(entries: &[ReportEntry]) -> FundTotals {
    let mut totals = FundTotals::default();

    for entry in entries {
        match entry.category {
            EntryCategory::Income => totals.income += entry.amount,
            EntryCategory::Expense => totals.expense += entry.amount.abs(),
        }
    }

    totals.balance = totals.income - totals.expense;

    totals
}

/// Group the entries into period buckets for the bar and line charts.
///
/// Buckets with no entries are omitted, and the buckets come back in
/// chronological order of their period start.
pub fn bucket_by_period(entries: &[ReportEntry], granularity: Granularity) -> Vec<PeriodBucket> {
    // Keyed by (year, ordinal within year) so that iteration order is
    // chronological. Week, month, and year views all fold over years, so
    // their year component is zero.
    let mut buckets: BTreeMap<(i32, u8), PeriodBucket> = BTreeMap::new();

    for entry in entries {
        let (key, label) = bucket_key(entry.date, granularity);

        let bucket = buckets.entry(key).or_insert_with(|| PeriodBucket {
            label,
            income: 0.0,
            expense: 0.0,
            balance: 0.0,
        });

        match entry.category {
            EntryCategory::Income => bucket.income += entry.amount,
            EntryCategory::Expense => bucket.expense += entry.amount.abs(),
        }
    }

    buckets
        .into_values()
        .map(|mut bucket| {
            bucket.balance = bucket.income - bucket.expense;
            bucket
        })
        .collect()
}

fn bucket_key(date: Date, granularity: Granularity) -> ((i32, u8), String) {
    match granularity {
        Granularity::Week => {
            let weekday = date.weekday();
            (
                (0, weekday.number_days_from_monday()),
                weekday_short_name(weekday).to_owned(),
            )
        }
        Granularity::Month => ((0, date.day()), format!("{:02}", date.day())),
        Granularity::Year => (
            (0, date.month() as u8),
            month_short_name(date.month()).to_owned(),
        ),
        Granularity::All => (
            (date.year(), date.month() as u8),
            format!("{} {}", month_short_name(date.month()), date.year()),
        ),
    }
}

fn weekday_short_name(weekday: time::Weekday) -> &'static str {
    match weekday {
        time::Weekday::Monday => "Mon",
        time::Weekday::Tuesday => "Tue",
        time::Weekday::Wednesday => "Wed",
        time::Weekday::Thursday => "Thu",
        time::Weekday::Friday => "Fri",
        time::Weekday::Saturday => "Sat",
        time::Weekday::Sunday => "Sun",
    }
}

/// Compare the current period against the one before it.
///
/// The current period is the half-open window from one period length before
/// `today` up to but not including `today`. The previous period is the window
/// before that. When the previous period has no money movement at all, the
/// change is reported as exactly 100.
///
/// The all-time view has nothing to compare against, so both changes are
/// `None`.
pub fn compare_periods(
    entries: &[ReportEntry],
    granularity: Granularity,
    today: Date,
) -> PeriodComparison {
    let boundary = match period_start(today, granularity) {
        Some(boundary) => boundary,
        None => return PeriodComparison::default(),
    };
    // period_start is only None for All, so the second call cannot fail.
    let previous_boundary = period_start(boundary, granularity).unwrap();

    let current = summarise_window(entries, boundary, today);
    let previous = summarise_window(entries, previous_boundary, boundary);

    PeriodComparison {
        income_change: Some(percent_change(current.income, previous.income)),
        expense_change: Some(percent_change(current.expense, previous.expense)),
    }
}

fn period_start(date: Date, granularity: Granularity) -> Option<Date> {
    match granularity {
        Granularity::Week => Some(date - time::Duration::days(7)),
        Granularity::Month => Some(months_earlier(date, 1)),
        Granularity::Year => Some(months_earlier(date, 12)),
        Granularity::All => None,
    }
}

/// The date `months` calendar months before `date`, with the day clamped to
/// the length of the target month, e.g. 31 Mar minus one month is 29 Feb in a
/// leap year.
fn months_earlier(date: Date, months: u32) -> Date {
    let mut year = date.year();
    let mut month = date.month();

    for _ in 0..months {
        month = month.previous();
        if month == Month::December {
            year -= 1;
        }
    }

    let day = date.day().min(time::util::days_in_year_month(year, month));

    Date::from_calendar_date(year, month, day).unwrap()
}

fn summarise_window(entries: &[ReportEntry], start: Date, end: Date) -> FundTotals {
    let in_window: Vec<ReportEntry> = entries
        .iter()
        .filter(|entry| entry.date >= start && entry.date < end)
        .cloned()
        .collect();

    summarise(&in_window)
}

fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        100.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Group the entries by source for the pie chart and the breakdown lists.
///
/// Returns the income slices and the expense slices, each sorted by total
/// descending, ties broken by name.
pub fn category_slices(entries: &[ReportEntry]) -> (Vec<SourceSlice>, Vec<SourceSlice>) {
    let mut income: HashMap<String, f64> = HashMap::new();
    let mut expense: HashMap<String, f64> = HashMap::new();

    for entry in entries {
        let (totals, fallback) = match entry.category {
            EntryCategory::Income => (&mut income, GENERAL_DONATION_LABEL),
            EntryCategory::Expense => (&mut expense, GENERAL_EXPENSE_LABEL),
        };

        let name = entry
            .campaign_title
            .clone()
            .unwrap_or_else(|| fallback.to_owned());

        *totals.entry(name).or_insert(0.0) += entry.amount.abs();
    }

    (sorted_slices(income), sorted_slices(expense))
}

fn sorted_slices(totals: HashMap<String, f64>) -> Vec<SourceSlice> {
    let mut slices: Vec<SourceSlice> = totals
        .into_iter()
        .map(|(name, total)| SourceSlice { name, total })
        .collect();

    slices.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    slices
}

/// Sort the entries newest first.
///
/// The sort is stable, so entries on the same day keep their relative order.
pub fn sorted_by_newest(mut entries: Vec<ReportEntry>) -> Vec<ReportEntry> {
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    entries
}

/// The first [RECENT_COUNT] entries of the newest-first listing.
pub fn recent(entries: &[ReportEntry]) -> &[ReportEntry] {
    &entries[..entries.len().min(RECENT_COUNT)]
}

#[cfg(test)]
mod engine_tests {
    use std::collections::HashMap;

    use time::{Date, macros::date};

    use crate::ledger::EntryCategory;

    use super::{
        FundTotals, GENERAL_DONATION_LABEL, GENERAL_EXPENSE_LABEL, Granularity, ReportEntry,
        bucket_by_period, category_slices, compare_periods, enrich_with_campaign_titles,
        filter_by_campaign, recent, sorted_by_newest, summarise,
    };

    fn entry(
        id: i64,
        amount: f64,
        category: EntryCategory,
        campaign_id: Option<i64>,
        date: Date,
    ) -> ReportEntry {
        ReportEntry {
            id,
            description: format!("Entry {id}"),
            amount,
            category,
            campaign_id,
            date,
            campaign_title: None,
        }
    }

    fn feeding_program_entries() -> Vec<ReportEntry> {
        let titles = HashMap::from([(1, "Feeding Program".to_owned())]);

        enrich_with_campaign_titles(
            vec![
                entry(
                    1,
                    1_250_000.0,
                    EntryCategory::Expense,
                    Some(1),
                    date!(2024 - 06 - 05),
                ),
                entry(2, 5_000_000.0, EntryCategory::Income, None, date!(2024 - 06 - 03)),
            ],
            &titles,
        )
    }

    #[test]
    fn feeding_program_totals() {
        let totals = summarise(&feeding_program_entries());

        assert_eq!(
            totals,
            FundTotals {
                income: 5_000_000.0,
                expense: 1_250_000.0,
                balance: 3_750_000.0,
            }
        );
    }

    #[test]
    fn feeding_program_slices() {
        let (income, expense) = category_slices(&feeding_program_entries());

        assert_eq!(income.len(), 1);
        assert_eq!(income[0].name, GENERAL_DONATION_LABEL);
        assert_eq!(income[0].total, 5_000_000.0);

        assert_eq!(expense.len(), 1);
        assert_eq!(expense[0].name, "Feeding Program");
        assert_eq!(expense[0].total, 1_250_000.0);
    }

    #[test]
    fn slice_totals_match_summary_totals() {
        let entries = feeding_program_entries();

        let totals = summarise(&entries);
        let (income, expense) = category_slices(&entries);

        let income_sum: f64 = income.iter().map(|slice| slice.total).sum();
        let expense_sum: f64 = expense.iter().map(|slice| slice.total).sum();

        assert_eq!(income_sum, totals.income);
        assert_eq!(expense_sum, totals.expense);
    }

    #[test]
    fn empty_ledger_yields_zero_totals() {
        let totals = summarise(&[]);

        assert_eq!(totals, FundTotals::default());
        assert!(bucket_by_period(&[], Granularity::Month).is_empty());
        let (income, expense) = category_slices(&[]);
        assert!(income.is_empty());
        assert!(expense.is_empty());
        assert!(recent(&[]).is_empty());
    }

    #[test]
    fn enrichment_resolves_titles_and_leaves_misses_unset() {
        let titles = HashMap::from([(1, "Feeding Program".to_owned())]);
        let entries = vec![
            entry(1, 100.0, EntryCategory::Expense, Some(1), date!(2024 - 06 - 05)),
            entry(2, 100.0, EntryCategory::Expense, Some(99), date!(2024 - 06 - 05)),
            entry(3, 100.0, EntryCategory::Income, None, date!(2024 - 06 - 05)),
        ];

        let enriched = enrich_with_campaign_titles(entries, &titles);

        assert_eq!(enriched[0].campaign_title.as_deref(), Some("Feeding Program"));
        assert_eq!(enriched[1].campaign_title, None);
        assert_eq!(enriched[2].campaign_title, None);
    }

    #[test]
    fn enrichment_is_idempotent() {
        let titles = HashMap::from([(1, "Feeding Program".to_owned())]);
        let entries = vec![entry(
            1,
            100.0,
            EntryCategory::Expense,
            Some(1),
            date!(2024 - 06 - 05),
        )];

        let once = enrich_with_campaign_titles(entries, &titles);
        let twice = enrich_with_campaign_titles(once.clone(), &titles);

        assert_eq!(once, twice);
    }

    #[test]
    fn filter_by_none_returns_input_unchanged() {
        let entries = feeding_program_entries();

        assert_eq!(filter_by_campaign(entries.clone(), None), entries);
    }

    #[test]
    fn filter_by_campaign_keeps_only_that_campaign() {
        let entries = feeding_program_entries();

        let filtered = filter_by_campaign(entries, Some(1));

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].campaign_id, Some(1));
    }

    #[test]
    fn buckets_are_chronological_and_balanced() {
        // Fifteen entries spread over three months.
        let mut entries = Vec::new();
        for n in 0..5 {
            entries.push(entry(
                n,
                100_000.0,
                EntryCategory::Income,
                None,
                date!(2024 - 06 - 10),
            ));
            entries.push(entry(
                n + 5,
                50_000.0,
                EntryCategory::Expense,
                None,
                date!(2024 - 05 - 10),
            ));
            entries.push(entry(
                n + 10,
                20_000.0,
                EntryCategory::Income,
                None,
                date!(2024 - 04 - 10),
            ));
        }

        let buckets = bucket_by_period(&entries, Granularity::All);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].label, "Apr 2024");
        assert_eq!(buckets[1].label, "May 2024");
        assert_eq!(buckets[2].label, "Jun 2024");

        assert_eq!(buckets[0].income, 100_000.0);
        assert_eq!(buckets[1].expense, 250_000.0);
        assert_eq!(buckets[1].balance, -250_000.0);
        assert_eq!(buckets[2].balance, 500_000.0);
    }

    #[test]
    fn week_buckets_use_weekday_labels() {
        let entries = vec![
            // 2024-06-03 is a Monday.
            entry(1, 100.0, EntryCategory::Income, None, date!(2024 - 06 - 05)),
            entry(2, 100.0, EntryCategory::Income, None, date!(2024 - 06 - 03)),
        ];

        let buckets = bucket_by_period(&entries, Granularity::Week);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "Mon");
        assert_eq!(buckets[1].label, "Wed");
    }

    #[test]
    fn month_buckets_use_zero_padded_days() {
        let entries = vec![
            entry(1, 100.0, EntryCategory::Income, None, date!(2024 - 06 - 21)),
            entry(2, 100.0, EntryCategory::Income, None, date!(2024 - 06 - 05)),
        ];

        let buckets = bucket_by_period(&entries, Granularity::Month);

        assert_eq!(buckets[0].label, "05");
        assert_eq!(buckets[1].label, "21");
    }

    #[test]
    fn expense_amounts_are_absolute() {
        let entries = vec![entry(
            1,
            -1_250_000.0,
            EntryCategory::Expense,
            None,
            date!(2024 - 06 - 05),
        )];

        let totals = summarise(&entries);
        assert_eq!(totals.expense, 1_250_000.0);
        assert_eq!(totals.balance, -1_250_000.0);

        let buckets = bucket_by_period(&entries, Granularity::Month);
        assert_eq!(buckets[0].expense, 1_250_000.0);
    }

    #[test]
    fn comparison_uses_half_open_windows() {
        let today = date!(2024 - 06 - 15);
        let entries = vec![
            // Current window [2024-05-15, 2024-06-15).
            entry(1, 300.0, EntryCategory::Income, None, date!(2024 - 05 - 15)),
            entry(2, 100.0, EntryCategory::Income, None, date!(2024 - 06 - 10)),
            // Previous window [2024-04-15, 2024-05-15).
            entry(3, 200.0, EntryCategory::Income, None, date!(2024 - 04 - 20)),
            // Today itself is outside the current window.
            entry(4, 999.0, EntryCategory::Income, None, date!(2024 - 06 - 15)),
        ];

        let comparison = compare_periods(&entries, Granularity::Month, today);

        assert_eq!(comparison.income_change, Some(100.0));
        assert_eq!(comparison.expense_change, Some(100.0));
    }

    #[test]
    fn zero_previous_period_reports_sentinel() {
        let today = date!(2024 - 06 - 15);
        let entries = vec![entry(
            1,
            5_000_000.0,
            EntryCategory::Income,
            None,
            date!(2024 - 06 - 10),
        )];

        let comparison = compare_periods(&entries, Granularity::Month, today);

        assert_eq!(comparison.income_change, Some(100.0));
    }

    #[test]
    fn zero_current_and_previous_still_reports_sentinel() {
        let comparison = compare_periods(&[], Granularity::Week, date!(2024 - 06 - 15));

        assert_eq!(comparison.income_change, Some(100.0));
        assert_eq!(comparison.expense_change, Some(100.0));
    }

    #[test]
    fn all_time_has_no_comparison() {
        let comparison =
            compare_periods(&feeding_program_entries(), Granularity::All, date!(2024 - 06 - 15));

        assert_eq!(comparison.income_change, None);
        assert_eq!(comparison.expense_change, None);
    }

    #[test]
    fn month_boundary_clamps_to_month_length() {
        let today = date!(2024 - 03 - 31);
        // One month before 31 Mar 2024 is 29 Feb 2024, so this entry falls
        // inside the current window.
        let entries = vec![entry(
            1,
            100.0,
            EntryCategory::Income,
            None,
            date!(2024 - 02 - 29),
        )];

        let comparison = compare_periods(&entries, Granularity::Month, today);

        assert_eq!(comparison.income_change, Some(100.0));
    }

    #[test]
    fn expense_slices_fall_back_to_generic_label() {
        let entries = vec![entry(
            1,
            100.0,
            EntryCategory::Expense,
            None,
            date!(2024 - 06 - 05),
        )];

        let (_, expense) = category_slices(&entries);

        assert_eq!(expense[0].name, GENERAL_EXPENSE_LABEL);
    }

    #[test]
    fn slices_sort_descending_by_total() {
        let titles = HashMap::from([
            (1, "Feeding Program".to_owned()),
            (2, "Sterilisation Drive".to_owned()),
        ]);
        let entries = enrich_with_campaign_titles(
            vec![
                entry(1, 100.0, EntryCategory::Expense, Some(1), date!(2024 - 06 - 05)),
                entry(2, 900.0, EntryCategory::Expense, Some(2), date!(2024 - 06 - 05)),
                entry(3, 400.0, EntryCategory::Expense, None, date!(2024 - 06 - 05)),
            ],
            &titles,
        );

        let (_, expense) = category_slices(&entries);

        let names: Vec<_> = expense.iter().map(|slice| slice.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Sterilisation Drive",
                GENERAL_EXPENSE_LABEL,
                "Feeding Program"
            ]
        );
    }

    #[test]
    fn recent_is_a_prefix_of_the_newest_first_listing() {
        let mut entries = Vec::new();
        for n in 0..15 {
            entries.push(entry(
                n,
                100.0,
                EntryCategory::Income,
                None,
                date!(2024 - 06 - 01) + time::Duration::days(n),
            ));
        }

        let sorted = sorted_by_newest(entries);
        let recent_entries = recent(&sorted);

        assert_eq!(recent_entries.len(), 10);
        assert_eq!(recent_entries, &sorted[..10]);
        assert_eq!(recent_entries[0].date, date!(2024 - 06 - 15));
    }

    #[test]
    fn newest_first_sort_is_stable_within_a_day() {
        let entries = vec![
            entry(1, 100.0, EntryCategory::Income, None, date!(2024 - 06 - 05)),
            entry(2, 200.0, EntryCategory::Income, None, date!(2024 - 06 - 05)),
            entry(3, 300.0, EntryCategory::Income, None, date!(2024 - 06 - 10)),
        ];

        let sorted = sorted_by_newest(entries);

        assert_eq!(sorted[0].id, 3);
        assert_eq!(sorted[1].id, 1);
        assert_eq!(sorted[2].id, 2);
    }
}
