//! Static HTML report of a household budget.
//!
//! The report is the offline counterpart of the budget's operations view. It
//! shows:
//! - Summary cards with total income, expenses and balance
//! - Charts of the monthly series and this month's categories
//! - A monthly summary table
//! - This month's expenses by category
//! - The most recent operations

use std::{fs, path::Path};

use maud::{Markup, html};

use crate::{
    Error,
    aggregation::{
        CategoryTotal, MonthlyTotals, Totals, compute_totals, cumulative_balance_series,
        current_month_expense_by_category, group_by_month, monthly_balance_series,
        sort_by_recency,
    },
    charts::{
        ReportChart, balance_chart, category_chart, charts_script, charts_view,
        income_expense_chart,
    },
    config::ReportConfig,
    html::{
        CATEGORY_BADGE_STYLE, ECHARTS_URL, HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_GREEN_STYLE,
        TABLE_CELL_RED_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        amount_color_class, base, format_currency,
    },
    month::MonthKey,
    operation::{Operation, OperationKind},
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

/// Renders the full report page for `operations`.
///
/// Renders a short "nothing here yet" page when there are no operations.
pub fn render_report(operations: &[Operation], config: &ReportConfig) -> Markup {
    if operations.is_empty() {
        return report_no_data_view(config);
    }

    let totals = compute_totals(operations);
    let monthly_totals = group_by_month(operations);
    let monthly_balances = monthly_balance_series(operations);
    let running_balances = cumulative_balance_series(&monthly_totals);

    let mut category_totals = current_month_expense_by_category(operations, config.today);
    category_totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    let recent_operations: Vec<&Operation> = sort_by_recency(operations)
        .into_iter()
        .take(config.recent_limit)
        .collect();

    let mut charts = vec![
        ReportChart {
            id: "income-expense-chart",
            options: income_expense_chart(&monthly_totals).to_string(),
        },
        ReportChart {
            id: "balance-chart",
            options: balance_chart(&monthly_balances, &running_balances).to_string(),
        },
    ];

    if !category_totals.is_empty() {
        charts.push(ReportChart {
            id: "category-chart",
            options: category_chart(&category_totals).to_string(),
        });
    }

    let content = html!(
        div
            id="report-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (report_header(config))
            (summary_cards(&totals))
            (charts_view(&charts))

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full"
            {
                (monthly_summary_table(&monthly_totals))
                (category_table(&category_totals, MonthKey::from_date(config.today)))
            }

            (recent_operations_table(&recent_operations))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    base(&config.title, &scripts, &content)
}

/// Renders the report and writes it to `path`.
///
/// # Errors
/// Returns [Error::Io] if the file cannot be written.
pub fn write_report(
    path: &Path,
    operations: &[Operation],
    config: &ReportConfig,
) -> Result<(), Error> {
    let markup = render_report(operations, config);

    fs::write(path, markup.into_string()).map_err(|error| {
        tracing::error!("could not write report to {}: {error}", path.display());
        Error::Io(format!("{}: {error}", path.display()))
    })?;

    tracing::info!("Wrote report to {}", path.display());
    Ok(())
}

fn report_header(config: &ReportConfig) -> Markup {
    html! {
        header class="w-full mb-6"
        {
            h1 class="text-2xl font-bold" { (config.title) }
            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                "As of " (config.today)
            }
        }
    }
}

/// Renders the report page when there are no operations.
fn report_no_data_view(config: &ReportConfig) -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            (report_header(config))

            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once the budget has some operations."
            }
        }
    );

    base(&config.title, &[], &content)
}

fn summary_cards(totals: &Totals) -> Markup {
    html! {
        section id="summary" class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-8"
        {
            (summary_card("income-card", "Income", totals.income, TABLE_CELL_GREEN_STYLE))
            (summary_card("expenses-card", "Expenses", totals.expenses, TABLE_CELL_RED_STYLE))
            (summary_card("balance-card", "Balance", totals.balance, amount_color_class(totals.balance)))
        }
    }
}

fn summary_card(
    id: &str,
    label: &str,
    amount: rust_decimal::Decimal,
    color_class: &str,
) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            h3 class="text-lg font-semibold mb-3" { (label) }
            div class={"text-3xl font-bold " (color_class)} data-amount=(amount)
            {
                (format_currency(amount))
            }
        }
    }
}

/// Renders a table with one column per month and income, expense and balance rows.
fn monthly_summary_table(monthly_totals: &[MonthlyTotals]) -> Markup {
    html! {
        div
        {
            h3 class="text-xl font-semibold mb-4" { "Monthly Summary" }

            div id="monthly-summary-table" class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "" }
                            @for totals in monthly_totals {
                                th scope="col" class=(TABLE_CELL_STYLE) data-month=(totals.key)
                                {
                                    (totals.key.short_label())
                                }
                            }
                        }
                    }
                    tbody
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Income" }
                            @for totals in monthly_totals {
                                td class={(TABLE_CELL_STYLE) " " (TABLE_CELL_GREEN_STYLE)}
                                {
                                    (format_currency(totals.income))
                                }
                            }
                        }

                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Expenses" }
                            @for totals in monthly_totals {
                                td class={(TABLE_CELL_STYLE) " " (TABLE_CELL_RED_STYLE)}
                                {
                                    (format_currency(totals.expenses))
                                }
                            }
                        }

                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Balance" }
                            @for totals in monthly_totals {
                                @let balance = totals.balance();
                                td class={(TABLE_CELL_STYLE) " font-semibold " (amount_color_class(balance))}
                                {
                                    (format_currency(balance))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn category_table(category_totals: &[CategoryTotal], month: MonthKey) -> Markup {
    html! {
        div
        {
            h3 class="text-xl font-semibold mb-4"
            {
                "Expenses in " (month.short_label())
            }

            @if category_totals.is_empty() {
                p id="category-table-empty" class="text-gray-600 dark:text-gray-400"
                {
                    "No expenses this month."
                }
            } @else {
                div class="overflow-x-auto rounded-lg shadow"
                {
                    table id="category-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                            }
                        }
                        tbody
                        {
                            @for total in category_totals {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        span class=(CATEGORY_BADGE_STYLE) { (total.category) }
                                    }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(total.total)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn recent_operations_table(operations: &[&Operation]) -> Markup {
    html! {
        section class="w-full mt-8 mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Recent Operations" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table id="recent-operations" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "By" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Value" }
                        }
                    }
                    tbody
                    {
                        @for operation in operations {
                            tr class=(TABLE_ROW_STYLE) data-operation-id=(operation.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (operation.date) }
                                td class=(TABLE_CELL_STYLE) { (operation.title) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(CATEGORY_BADGE_STYLE) { (operation.category_name()) }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @match operation.kind {
                                        Some(kind) => { (kind) }
                                        None => { "Unknown" }
                                    }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @if let Some(member) = &operation.by {
                                        (member.username)
                                    }
                                }
                                td class={(TABLE_CELL_STYLE) " text-right " (operation_color_class(operation))}
                                {
                                    (signed_value(operation))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn operation_color_class(operation: &Operation) -> &'static str {
    match operation.kind {
        Some(OperationKind::Income) => TABLE_CELL_GREEN_STYLE,
        Some(OperationKind::Expense) => TABLE_CELL_RED_STYLE,
        None => "",
    }
}

/// Formats the value with a minus sign for expenses.
fn signed_value(operation: &Operation) -> String {
    match operation.kind {
        Some(OperationKind::Expense) => format_currency(-operation.value),
        _ => format_currency(operation.value),
    }
}
