//! Chart generation for the transparency page.
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with an HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::HeadElement,
    report::engine::{ChartKind, PeriodBucket, SourceSlice},
};

/// A transparency page chart with its HTML container ID and ECharts
/// configuration.
pub(super) struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the chart the user asked for.
pub(super) fn build_chart(
    kind: ChartKind,
    buckets: &[PeriodBucket],
    income_slices: &[SourceSlice],
) -> ReportChart {
    let chart = match kind {
        ChartKind::Bar => income_expense_bar_chart(buckets),
        ChartKind::Line => income_expense_line_chart(buckets),
        ChartKind::Pie => income_sources_pie_chart(income_slices),
    };

    ReportChart {
        id: "fund-chart",
        options: chart.to_string(),
    }
}

/// Renders the HTML container for the chart.
pub(super) fn chart_view(chart: &ReportChart) -> Markup {
    html!(
        section
            id="chart"
            class="w-full mx-auto mb-4"
        {
            div
                id=(chart.id)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// Generates JavaScript initialization code for the chart, with dark mode
/// support and responsive resizing.
pub(super) fn chart_script(chart: &ReportChart) -> HeadElement {
    let script_content = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            const option = {};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#,
        chart.id, chart.options
    );

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn income_expense_bar_chart(buckets: &[PeriodBucket]) -> Chart {
    let (labels, income, expense) = bucket_series(buckets);

    Chart::new()
        .title(Title::new().text("Income and expenses"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Income").data(income))
        .series(Bar::new().name("Expense").data(expense))
}

fn income_expense_line_chart(buckets: &[PeriodBucket]) -> Chart {
    let (labels, income, expense) = bucket_series(buckets);

    Chart::new()
        .title(Title::new().text("Income and expenses"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Income").data(income))
        .series(Line::new().name("Expense").data(expense))
}

fn income_sources_pie_chart(income_slices: &[SourceSlice]) -> Chart {
    let data: Vec<(f64, String)> = income_slices
        .iter()
        .map(|slice| (slice.total, slice.name.clone()))
        .collect();

    Chart::new()
        .title(Title::new().text("Income by source"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(Pie::new().name("Income").radius("55%").data(data))
}

fn bucket_series(buckets: &[PeriodBucket]) -> (Vec<String>, Vec<f64>, Vec<f64>) {
    let labels = buckets.iter().map(|bucket| bucket.label.clone()).collect();
    let income = buckets.iter().map(|bucket| bucket.income).collect();
    let expense = buckets.iter().map(|bucket| bucket.expense).collect();

    (labels, income, expense)
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('id-ID', {
              style: 'currency',
              currency: 'IDR',
              maximumFractionDigits: 0
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod chart_tests {
    use crate::report::engine::{ChartKind, PeriodBucket, SourceSlice};

    use super::{build_chart, chart_script, chart_view};

    fn test_buckets() -> Vec<PeriodBucket> {
        vec![
            PeriodBucket {
                label: "Apr 2024".to_owned(),
                income: 100_000.0,
                expense: 50_000.0,
                balance: 50_000.0,
            },
            PeriodBucket {
                label: "May 2024".to_owned(),
                income: 0.0,
                expense: 250_000.0,
                balance: -250_000.0,
            },
        ]
    }

    fn test_slices() -> Vec<SourceSlice> {
        vec![SourceSlice {
            name: "Feeding Program".to_owned(),
            total: 100_000.0,
        }]
    }

    #[test]
    fn bar_chart_contains_bucket_labels() {
        let chart = build_chart(ChartKind::Bar, &test_buckets(), &test_slices());

        assert!(chart.options.contains("Apr 2024"));
        assert!(chart.options.contains("May 2024"));
        assert!(chart.options.contains("\"bar\""));
    }

    #[test]
    fn pie_chart_contains_source_names() {
        let chart = build_chart(ChartKind::Pie, &test_buckets(), &test_slices());

        assert!(chart.options.contains("Feeding Program"));
        assert!(chart.options.contains("\"pie\""));
    }

    #[test]
    fn chart_view_renders_container_with_id() {
        let chart = build_chart(ChartKind::Bar, &test_buckets(), &test_slices());

        let markup = chart_view(&chart).into_string();

        assert!(markup.contains("id=\"fund-chart\""));
    }

    #[test]
    fn chart_script_initialises_echarts() {
        let chart = build_chart(ChartKind::Line, &test_buckets(), &test_slices());

        match chart_script(&chart) {
            crate::html::HeadElement::ScriptSource(script) => {
                assert!(script.0.contains("echarts.init"));
                assert!(script.0.contains("fund-chart"));
            }
            _ => panic!("expected an inline script"),
        }
    }
}
