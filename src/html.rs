//! Shared HTML building blocks for the report: the page skeleton, table
//! styles and currency formatting.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use rust_decimal::{Decimal, prelude::ToPrimitive};

/// The ECharts build loaded by reports that contain charts.
pub const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// Style for a table's `thead`.
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

/// Style for a table row.
pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

/// Padding for table cells.
pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

/// Text color for income and positive amounts.
pub const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";

/// Text color for expenses and negative amounts.
pub const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Pill shown around category names.
pub const CATEGORY_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-blue-800 bg-blue-100 rounded-full \
    dark:bg-blue-900 dark:text-blue-300";

/// Centered column used by pages without charts.
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// A script to include in the page's `head`.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

/// Wraps `content` in a complete HTML document titled `title`.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
pub fn amount_color_class(amount: Decimal) -> &'static str {
    if amount.is_sign_negative() && !amount.is_zero() {
        TABLE_CELL_RED_STYLE
    } else {
        TABLE_CELL_GREEN_STYLE
    }
}

/// Converts an amount for charting. Chart libraries only deal in floats.
pub fn to_chart_value(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

/// Formats an amount as dollars and cents, e.g. "$1.50" or "-$3.00".
pub fn format_currency(amount: Decimal) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("currency prefix is valid")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .expect("currency prefix is valid")
            .precision(Precision::Decimals(2))
    });

    let number = to_chart_value(amount.round_dp(2));

    let formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    };

    pad_cents(formatted_string)
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3", so put
/// them back.
fn pad_cents(mut formatted_string: String) -> String {
    let digits_after_point = match formatted_string.rfind('.') {
        Some(point) => formatted_string.len() - point - 1,
        None => {
            formatted_string.push('.');
            0
        }
    };

    for _ in digits_after_point..2 {
        formatted_string.push('0');
    }

    formatted_string
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{
        TABLE_CELL_GREEN_STYLE, TABLE_CELL_RED_STYLE, amount_color_class, format_currency,
        pad_cents,
    };

    #[test]
    fn format_currency_uses_two_decimal_places() {
        assert_eq!(format_currency(dec!(12.3)), "$12.30");
        assert_eq!(format_currency(dec!(-5)), "-$5.00");
        assert_eq!(format_currency(dec!(0)), "$0.00");
    }

    #[test]
    fn pad_cents_fills_missing_digits() {
        assert_eq!(pad_cents("$12".to_owned()), "$12.00");
        assert_eq!(pad_cents("$12.3".to_owned()), "$12.30");
        assert_eq!(pad_cents("$12.34".to_owned()), "$12.34");
    }

    #[test]
    fn amount_color_class_marks_negative_amounts_red() {
        assert_eq!(amount_color_class(dec!(-0.01)), TABLE_CELL_RED_STYLE);
        assert_eq!(amount_color_class(dec!(0)), TABLE_CELL_GREEN_STYLE);
        assert_eq!(amount_color_class(dec!(10)), TABLE_CELL_GREEN_STYLE);
    }
}
