//! The markup for the transparency page.

use maud::{Markup, html};

use crate::{
    database_id::CampaignId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, format_date,
    },
    ledger::EntryCategory,
    navigation::NavBar,
    report::{
        charts::{ReportChart, chart_script, chart_view},
        engine::{ChartKind, FundTotals, Granularity, PeriodComparison, ReportEntry},
    },
};

/// Everything the transparency page needs to render.
pub(super) struct ReportPage<'a> {
    /// The selected time window.
    pub granularity: Granularity,
    /// The selected chart kind.
    pub chart_kind: ChartKind,
    /// The selected campaign filter, `None` meaning all campaigns.
    pub campaign_filter: Option<CampaignId>,
    /// Every campaign, for the filter dropdown.
    pub campaign_refs: &'a [(CampaignId, String)],
    /// The fund totals for the summary cards.
    pub totals: FundTotals,
    /// The percent changes against the previous period.
    pub comparison: PeriodComparison,
    /// The newest-first listing of all entries.
    pub entries: &'a [ReportEntry],
    /// The first few entries of the listing.
    pub recent: &'a [ReportEntry],
    /// The chart to render.
    pub chart: ReportChart,
}

/// Render the transparency page.
pub(super) fn transparency_page(page: ReportPage) -> Markup {
    let head_elements = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        chart_script(&page.chart),
    ];

    let content = html! {
        (NavBar::new(endpoints::TRANSPARENCY_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                div class="flex flex-wrap items-center justify-between mb-6"
                {
                    h1 class="text-3xl font-bold" { "Fund transparency" }

                    a
                        href=(export_url(page.campaign_filter))
                        class=(LINK_STYLE)
                    {
                        "Download CSV"
                    }
                }

                (filter_controls(&page))

                (summary_cards(&page.totals, &page.comparison))

                @if page.entries.is_empty() {
                    p class="text-gray-500 dark:text-gray-400 py-12 text-center"
                    {
                        "No transactions recorded yet. Totals will appear here as soon as \
                        money moves through the fund."
                    }
                } @else {
                    (chart_view(&page.chart))

                    div class="grid gap-6 lg:grid-cols-3"
                    {
                        div class="lg:col-span-1"
                        {
                            (recent_feed(page.recent))
                        }

                        div class="lg:col-span-2"
                        {
                            (entries_table(page.entries))
                        }
                    }
                }
            }
        }
    };

    base("Fund transparency", &head_elements, &content)
}

fn export_url(campaign_filter: Option<CampaignId>) -> String {
    match campaign_filter {
        Some(campaign_id) => format!(
            "{}?campaign={campaign_id}",
            endpoints::TRANSPARENCY_EXPORT
        ),
        None => endpoints::TRANSPARENCY_EXPORT.to_owned(),
    }
}

fn filter_controls(page: &ReportPage) -> Markup {
    const GRANULARITIES: [Granularity; 4] = [
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
        Granularity::All,
    ];
    const CHART_KINDS: [(ChartKind, &str); 3] = [
        (ChartKind::Bar, "Bar chart"),
        (ChartKind::Line, "Line chart"),
        (ChartKind::Pie, "Pie chart"),
    ];

    html! {
        form method="get" action=(endpoints::TRANSPARENCY_VIEW) class="flex flex-wrap gap-4 mb-6"
        {
            select name="period" class=(FORM_TEXT_INPUT_STYLE) style="width: auto;"
            {
                @for granularity in GRANULARITIES {
                    option
                        value=(granularity.as_str())
                        selected[granularity == page.granularity]
                    {
                        (granularity.display_name())
                    }
                }
            }

            select name="campaign" class=(FORM_TEXT_INPUT_STYLE) style="width: auto;"
            {
                option value="all" { "All campaigns" }

                @for (id, title) in page.campaign_refs {
                    option value=(id) selected[page.campaign_filter == Some(*id)] { (title) }
                }
            }

            select name="chart" class=(FORM_TEXT_INPUT_STYLE) style="width: auto;"
            {
                @for (kind, label) in CHART_KINDS {
                    option value=(kind.as_str()) selected[kind == page.chart_kind] { (label) }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) style="width: auto;" { "Apply" }
        }
    }
}

fn summary_cards(totals: &FundTotals, comparison: &PeriodComparison) -> Markup {
    html! {
        div class="grid gap-4 md:grid-cols-3 mb-6"
        {
            (summary_card("Total income", totals.income, comparison.income_change))
            (summary_card("Total expenses", totals.expense, comparison.expense_change))
            (summary_card("Balance", totals.balance, None))
        }
    }
}

fn summary_card(title: &str, amount: f64, change: Option<f64>) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h2 class="text-sm font-medium text-gray-500 dark:text-gray-400 mb-1" { (title) }

            p class="text-2xl font-bold mb-1" { (format_currency(amount)) }

            @match change {
                Some(change) => p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (format_percent_change(change)) " vs previous period"
                }
                None => p class="text-sm text-gray-500 dark:text-gray-400" { "\u{2014}" }
            }
        }
    }
}

fn format_percent_change(change: f64) -> String {
    if change >= 0.0 {
        format!("+{change:.1}%")
    } else {
        format!("{change:.1}%")
    }
}

fn recent_feed(recent: &[ReportEntry]) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold mb-4" { "Recent transactions" }

            ul class="space-y-3"
            {
                @for entry in recent {
                    li class="flex justify-between gap-2 text-sm"
                    {
                        div
                        {
                            p class="font-medium" { (entry.description) }
                            p class="text-gray-500 dark:text-gray-400"
                            {
                                (format_date(entry.date))
                            }
                        }

                        (signed_amount(entry))
                    }
                }
            }
        }
    }
}

fn entries_table(entries: &[ReportEntry]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md rounded-lg"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Campaign" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    }
                }

                tbody
                {
                    @for entry in entries {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (format_date(entry.date)) }
                            td class=(TABLE_CELL_STYLE) { (entry.description) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @match &entry.campaign_title {
                                    Some(title) => (title)
                                    None => "General fund"
                                }
                            }
                            td class=(TABLE_CELL_STYLE) { (signed_amount(entry)) }
                        }
                    }
                }
            }
        }
    }
}

fn signed_amount(entry: &ReportEntry) -> Markup {
    match entry.category {
        EntryCategory::Income => html! {
            span class="text-green-600 dark:text-green-400 whitespace-nowrap"
            {
                "+" (format_currency(entry.amount.abs()))
            }
        },
        EntryCategory::Expense => html! {
            span class="text-red-600 dark:text-red-400 whitespace-nowrap"
            {
                "-" (format_currency(entry.amount.abs()))
            }
        },
    }
}
