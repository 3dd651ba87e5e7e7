//! Chart generation and rendering for the budget report.
//!
//! This module creates ECharts visualizations for the aggregated operations:
//! - **Income and Expenses Chart**: Monthly income and expense totals side by side
//! - **Balance Chart**: Each month's own balance next to the running balance
//! - **Category Chart**: This month's expenses per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title, VisualMap, VisualMapPiece},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Bar, Line},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregation::{CategoryTotal, MonthlyBalance, MonthlyTotals},
    html::{HeadElement, to_chart_value},
};

/// A report chart with its HTML container ID and ECharts configuration.
pub(crate) struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for report charts.
///
/// # Arguments
/// * `charts` - The charts to render containers for
///
/// # Returns
/// Maud markup containing a grid of chart container divs.
pub(crate) fn charts_view(charts: &[ReportChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for report charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(crate) fn charts_script(charts: &[ReportChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
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
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn month_labels(monthly_totals: &[MonthlyTotals]) -> Vec<String> {
    monthly_totals
        .iter()
        .map(|totals| totals.key.short_label())
        .collect()
}

pub(crate) fn income_expense_chart(monthly_totals: &[MonthlyTotals]) -> Chart {
    let labels = month_labels(monthly_totals);
    let income: Vec<f64> = monthly_totals
        .iter()
        .map(|totals| to_chart_value(totals.income))
        .collect();
    let expenses: Vec<f64> = monthly_totals
        .iter()
        .map(|totals| to_chart_value(totals.expenses))
        .collect();

    Chart::new()
        .title(Title::new().text("Income and Expenses").subtext("Per month"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
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
        .series(Bar::new().name("Expenses").data(expenses))
}

/// Plots each month's balance, and the running balance when it is given.
pub(crate) fn balance_chart(
    monthly_balances: &[MonthlyBalance],
    running_balances: &[MonthlyBalance],
) -> Chart {
    let labels: Vec<String> = monthly_balances
        .iter()
        .map(|point| point.month.short_label())
        .collect();
    let values: Vec<f64> = monthly_balances
        .iter()
        .map(|point| to_chart_value(point.balance))
        .collect();

    let mut chart = Chart::new()
        .title(Title::new().text("Balance").subtext("Per month"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
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
        .visual_map(
            VisualMap::new().show(false).pieces(vec![
                VisualMapPiece::new().lte(-1).color("red"),
                VisualMapPiece::new().gte(0).color("green"),
            ]),
        )
        .series(Bar::new().name("Monthly balance").data(values));

    if !running_balances.is_empty() {
        let running: Vec<f64> = running_balances
            .iter()
            .map(|point| to_chart_value(point.balance))
            .collect();
        chart = chart.series(Line::new().name("Running balance").data(running));
    }

    chart
}

pub(crate) fn category_chart(category_totals: &[CategoryTotal]) -> Chart {
    let labels: Vec<String> = category_totals
        .iter()
        .map(|total| total.category.clone())
        .collect();
    let values: Vec<f64> = category_totals
        .iter()
        .map(|total| to_chart_value(total.total))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Expenses by Category")
                .subtext("This month"),
        )
        .tooltip(currency_tooltip())
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
        .series(Bar::new().name("Expenses").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
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
