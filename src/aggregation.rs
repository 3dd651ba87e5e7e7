//! Operation aggregation and transformation for summaries and charts.
//!
//! Provides functions to total operations, order them by recency, bucket them
//! by month, and break down the current month's expenses by category.
//!
//! Every function here only reads the operations it is given and returns new
//! values, so the results can be recomputed whenever the operation list changes.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use time::Date;

use crate::{
    month::MonthKey,
    operation::{Operation, OperationKind},
};

/// Income, expense and balance totals over a set of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    /// The sum of all income values.
    pub income: Decimal,
    /// The sum of all expense values.
    pub expenses: Decimal,
    /// `income - expenses`.
    pub balance: Decimal,
}

/// Income and expense totals for the operations in one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTotals<K> {
    /// The key shared by the operations in the bucket.
    pub key: K,
    /// The sum of income values in the bucket.
    pub income: Decimal,
    /// The sum of expense values in the bucket.
    pub expenses: Decimal,
}

impl<K> BucketTotals<K> {
    fn empty(key: K) -> Self {
        Self {
            key,
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
        }
    }

    /// `income - expenses` for this bucket alone.
    pub fn balance(&self) -> Decimal {
        self.income - self.expenses
    }
}

/// Income and expense totals for one calendar month.
pub type MonthlyTotals = BucketTotals<MonthKey>;

/// A balance value for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyBalance {
    /// The month the balance belongs to.
    pub month: MonthKey,
    /// The balance value.
    pub balance: Decimal,
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// The display name of the category.
    pub category: String,
    /// The sum of expense values in the category.
    pub total: Decimal,
}

/// Adds the operation's value to the income or expense total.
///
/// Operations without a known kind are ignored.
fn accumulate(income: &mut Decimal, expenses: &mut Decimal, operation: &Operation) {
    match operation.kind {
        Some(OperationKind::Income) => *income += operation.value,
        Some(OperationKind::Expense) => *expenses += operation.value,
        None => {}
    }
}

/// Calculates the income, expense and balance totals of `operations`.
///
/// Operations without a known kind contribute to neither sum. An empty slice
/// yields all-zero totals.
pub fn compute_totals(operations: &[Operation]) -> Totals {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;

    for operation in operations {
        accumulate(&mut income, &mut expenses, operation);
    }

    Totals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Orders operations from most to least recent.
///
/// Operations are sorted by date, newest first. Operations on the same date
/// are ordered by ID, highest first, since higher IDs were created later.
///
/// # Returns
/// A new vector of references into `operations`, which is left untouched.
pub fn sort_by_recency(operations: &[Operation]) -> Vec<&Operation> {
    let mut sorted: Vec<&Operation> = operations.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    sorted
}

/// Groups operations into buckets and totals the income and expenses of each.
///
/// # Arguments
/// * `operations` - The operations to group
/// * `bucket` - Maps each operation to the key of its bucket
///
/// # Returns
/// One entry per key produced by `bucket`, in ascending key order. Keys with
/// no operations are never produced.
pub fn group_by_bucket<K, F>(operations: &[Operation], bucket: F) -> Vec<BucketTotals<K>>
where
    K: Ord + Clone,
    F: Fn(&Operation) -> K,
{
    let mut buckets: BTreeMap<K, BucketTotals<K>> = BTreeMap::new();

    for operation in operations {
        let key = bucket(operation);
        let totals = buckets
            .entry(key.clone())
            .or_insert_with(|| BucketTotals::empty(key));
        accumulate(&mut totals.income, &mut totals.expenses, operation);
    }

    buckets.into_values().collect()
}

/// Totals income and expenses for each calendar month.
///
/// # Returns
/// Monthly totals in chronological order. Only months that have at least one
/// operation appear, gaps are not filled in.
pub fn group_by_month(operations: &[Operation]) -> Vec<MonthlyTotals> {
    group_by_bucket(operations, Operation::month)
}

/// Calculates the balance of each calendar month on its own.
///
/// Each value is that month's income minus that month's expenses. Values do
/// not carry over between months, see [cumulative_balance_series] for that.
pub fn monthly_balance_series(operations: &[Operation]) -> Vec<MonthlyBalance> {
    group_by_month(operations)
        .iter()
        .map(|totals| MonthlyBalance {
            month: totals.key,
            balance: totals.balance(),
        })
        .collect()
}

/// Calculates the running balance at the end of each month.
///
/// # Arguments
/// * `monthly_totals` - Monthly totals in chronological order, as returned by
///   [group_by_month]
pub fn cumulative_balance_series(monthly_totals: &[MonthlyTotals]) -> Vec<MonthlyBalance> {
    let mut running = Decimal::ZERO;

    monthly_totals
        .iter()
        .map(|totals| {
            running += totals.balance();
            MonthlyBalance {
                month: totals.key,
                balance: running,
            }
        })
        .collect()
}

/// Sums the expenses in the same calendar month as `now`, per category.
///
/// # Arguments
/// * `operations` - All operations to consider
/// * `now` - The reference date that decides which month is current
///
/// # Returns
/// One total per category in the order each category is first seen among the
/// matching expenses. Callers that need a stable display order must sort.
pub fn current_month_expense_by_category(
    operations: &[Operation],
    now: Date,
) -> Vec<CategoryTotal> {
    let current_month = MonthKey::from_date(now);
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for operation in operations
        .iter()
        .filter(|operation| operation.is_expense() && current_month.contains(operation.date))
    {
        let name = operation.category_name();

        match positions.get(name) {
            Some(&position) => totals[position].total += operation.value,
            None => {
                positions.insert(name, totals.len());
                totals.push(CategoryTotal {
                    category: name.to_owned(),
                    total: operation.value,
                });
            }
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, macros::date};

    use crate::{
        month::MonthKey,
        operation::{Category, Operation, OperationBuilder, OperationKind, UNCATEGORIZED_LABEL},
    };

    use super::{
        CategoryTotal, Totals, compute_totals, cumulative_balance_series,
        current_month_expense_by_category, group_by_bucket, group_by_month,
        monthly_balance_series, sort_by_recency,
    };

    fn create_test_operation(
        id: i64,
        kind: OperationKind,
        date: Date,
        value: Decimal,
        category: &str,
    ) -> Operation {
        Operation::build(kind, date, value)
            .id(id)
            .title("Test operation")
            .category(Some(Category::new(id, category)))
            .finalise()
            .unwrap()
    }

    fn income(id: i64, date: Date, value: Decimal) -> Operation {
        create_test_operation(id, OperationKind::Income, date, value, "Salary")
    }

    fn expense(id: i64, date: Date, value: Decimal, category: &str) -> Operation {
        create_test_operation(id, OperationKind::Expense, date, value, category)
    }

    fn month(date: Date) -> MonthKey {
        MonthKey::from_date(date)
    }

    #[test]
    fn compute_totals_sums_income_and_expenses() {
        let operations = vec![
            income(1, date!(2024 - 01 - 05), dec!(1000)),
            expense(2, date!(2024 - 01 - 10), dec!(300), "Food"),
        ];

        let totals = compute_totals(&operations);

        assert_eq!(
            totals,
            Totals {
                income: dec!(1000),
                expenses: dec!(300),
                balance: dec!(700),
            }
        );
    }

    #[test]
    fn compute_totals_handles_empty_input() {
        assert_eq!(compute_totals(&[]), Totals::default());
        assert_eq!(Totals::default().balance, Decimal::ZERO);
    }

    #[test]
    fn compute_totals_ignores_operations_without_kind() {
        let unknown = OperationBuilder::new(None, date!(2024 - 01 - 01), dec!(999))
            .finalise()
            .unwrap();
        let operations = vec![unknown, expense(2, date!(2024 - 01 - 02), dec!(10), "Food")];

        let totals = compute_totals(&operations);

        assert_eq!(totals.income, dec!(0));
        assert_eq!(totals.expenses, dec!(10));
        assert_eq!(totals.balance, dec!(-10));
    }

    #[test]
    fn compute_totals_balance_is_income_minus_expenses() {
        let operations = vec![
            income(1, date!(2023 - 11 - 30), dec!(12.34)),
            expense(2, date!(2023 - 12 - 01), dec!(0.66), "Food"),
            expense(3, date!(2024 - 02 - 29), dec!(100.10), "Rent"),
            income(4, date!(2024 - 03 - 01), dec!(0.01)),
        ];

        let totals = compute_totals(&operations);

        assert_eq!(totals.income - totals.expenses, totals.balance);
        assert_eq!(totals.balance, dec!(-88.41));
    }

    #[test]
    fn sort_by_recency_orders_newest_first() {
        let operations = vec![
            expense(1, date!(2023 - 12 - 31), dec!(1), "Food"),
            expense(2, date!(2024 - 01 - 02), dec!(1), "Food"),
            expense(3, date!(2024 - 01 - 01), dec!(1), "Food"),
        ];

        let sorted = sort_by_recency(&operations);

        let ids: Vec<_> = sorted.iter().map(|operation| operation.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn sort_by_recency_breaks_ties_with_higher_id_first() {
        let operations = vec![
            expense(5, date!(2024 - 03 - 01), dec!(1), "Food"),
            expense(7, date!(2024 - 03 - 01), dec!(1), "Food"),
        ];

        let sorted = sort_by_recency(&operations);

        assert_eq!(sorted[0].id, 7);
        assert_eq!(sorted[1].id, 5);
    }

    #[test]
    fn sort_by_recency_is_idempotent_and_leaves_input_untouched() {
        let operations = vec![
            expense(1, date!(2024 - 01 - 01), dec!(1), "Food"),
            expense(3, date!(2024 - 02 - 01), dec!(1), "Food"),
            expense(2, date!(2024 - 02 - 01), dec!(1), "Food"),
        ];
        let original = operations.clone();

        let once: Vec<Operation> = sort_by_recency(&operations).into_iter().cloned().collect();
        let twice: Vec<Operation> = sort_by_recency(&once).into_iter().cloned().collect();

        assert_eq!(once, twice);
        assert_eq!(operations, original);
    }

    #[test]
    fn group_by_month_totals_each_month() {
        let operations = vec![
            expense(1, date!(2024 - 01 - 03), dec!(50), "Food"),
            expense(2, date!(2024 - 02 - 11), dec!(20), "Food"),
            expense(3, date!(2024 - 01 - 28), dec!(50), "Transport"),
        ];

        let result = group_by_month(&operations);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].key.to_string(), "2024-01");
        assert_eq!(result[0].income, dec!(0));
        assert_eq!(result[0].expenses, dec!(100));
        assert_eq!(result[1].key.to_string(), "2024-02");
        assert_eq!(result[1].income, dec!(0));
        assert_eq!(result[1].expenses, dec!(20));
    }

    #[test]
    fn group_by_month_does_not_fill_gaps() {
        let operations = vec![
            income(1, date!(2024 - 01 - 15), dec!(10)),
            income(2, date!(2024 - 04 - 15), dec!(10)),
        ];

        let result = group_by_month(&operations);

        let keys: Vec<_> = result.iter().map(|totals| totals.key).collect();
        assert_eq!(
            keys,
            vec![month(date!(2024 - 01 - 01)), month(date!(2024 - 04 - 01))]
        );
    }

    #[test]
    fn group_by_month_orders_across_year_boundary() {
        let operations = vec![
            income(1, date!(2024 - 01 - 01), dec!(1)),
            income(2, date!(2023 - 12 - 31), dec!(2)),
            income(3, date!(2023 - 02 - 01), dec!(3)),
        ];

        let result = group_by_month(&operations);

        let keys: Vec<_> = result.iter().map(|totals| totals.key.to_string()).collect();
        assert_eq!(keys, vec!["2023-02", "2023-12", "2024-01"]);
    }

    #[test]
    fn group_by_month_only_uses_months_from_input_and_preserves_income_sum() {
        let operations = vec![
            income(1, date!(2024 - 01 - 05), dec!(1000)),
            expense(2, date!(2024 - 01 - 10), dec!(300), "Food"),
            income(3, date!(2024 - 03 - 05), dec!(250.50)),
            expense(4, date!(2024 - 05 - 10), dec!(80), "Rent"),
        ];

        let result = group_by_month(&operations);

        for totals in &result {
            assert!(
                operations.iter().any(|operation| operation.month() == totals.key),
                "{} is not a month of any input operation",
                totals.key
            );
        }

        let income_sum: Decimal = result.iter().map(|totals| totals.income).sum();
        let expense_sum: Decimal = result.iter().map(|totals| totals.expenses).sum();
        let totals = compute_totals(&operations);
        assert_eq!(income_sum, totals.income);
        assert_eq!(expense_sum, totals.expenses);
    }

    #[test]
    fn group_by_month_keeps_month_of_operations_without_kind() {
        let unknown = OperationBuilder::new(None, date!(2024 - 06 - 01), dec!(5))
            .finalise()
            .unwrap();

        let result = group_by_month(&[unknown]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].income, dec!(0));
        assert_eq!(result[0].expenses, dec!(0));
    }

    #[test]
    fn group_by_bucket_accepts_custom_keys() {
        let operations = vec![
            income(1, date!(2023 - 06 - 01), dec!(10)),
            expense(2, date!(2024 - 06 - 01), dec!(4), "Food"),
            income(3, date!(2024 - 01 - 01), dec!(1)),
        ];

        let result = group_by_bucket(&operations, |operation| operation.date.year());

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].key, 2023);
        assert_eq!(result[0].balance(), dec!(10));
        assert_eq!(result[1].key, 2024);
        assert_eq!(result[1].balance(), dec!(-3));
    }

    #[test]
    fn monthly_balance_series_is_per_month() {
        let operations = vec![
            income(1, date!(2024 - 01 - 01), dec!(100)),
            expense(2, date!(2024 - 01 - 15), dec!(30), "Food"),
            expense(3, date!(2024 - 02 - 15), dec!(50), "Food"),
        ];

        let result = monthly_balance_series(&operations);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].month.to_string(), "2024-01");
        assert_eq!(result[0].balance, dec!(70));
        assert_eq!(result[1].month.to_string(), "2024-02");
        // Not 20: January's surplus does not carry over.
        assert_eq!(result[1].balance, dec!(-50));
    }

    #[test]
    fn monthly_balance_series_is_independent_between_months() {
        let mut operations = vec![
            income(1, date!(2024 - 01 - 01), dec!(100)),
            expense(2, date!(2024 - 02 - 15), dec!(50), "Food"),
        ];
        let before = monthly_balance_series(&operations);

        operations.push(expense(3, date!(2024 - 01 - 20), dec!(500), "Rent"));
        let after = monthly_balance_series(&operations);

        assert_ne!(before[0], after[0]);
        assert_eq!(before[1], after[1]);
    }

    #[test]
    fn cumulative_balance_series_carries_over() {
        let operations = vec![
            income(1, date!(2024 - 01 - 01), dec!(100)),
            expense(2, date!(2024 - 01 - 15), dec!(30), "Food"),
            expense(3, date!(2024 - 02 - 15), dec!(50), "Food"),
            income(4, date!(2024 - 04 - 01), dec!(5)),
        ];

        let result = cumulative_balance_series(&group_by_month(&operations));

        let balances: Vec<_> = result.iter().map(|point| point.balance).collect();
        assert_eq!(balances, vec![dec!(70), dec!(20), dec!(25)]);
    }

    #[test]
    fn current_month_expense_by_category_only_uses_reference_month() {
        let operations = vec![
            expense(1, date!(2024 - 03 - 02), dec!(40), "Food"),
            expense(2, date!(2024 - 02 - 28), dec!(999), "Food"),
        ];

        let result = current_month_expense_by_category(&operations, date!(2024 - 03 - 15));

        assert_eq!(
            result,
            vec![CategoryTotal {
                category: "Food".to_owned(),
                total: dec!(40),
            }]
        );
    }

    #[test]
    fn current_month_expense_by_category_excludes_income_and_other_years() {
        let operations = vec![
            income(1, date!(2024 - 03 - 01), dec!(1000)),
            expense(2, date!(2023 - 03 - 10), dec!(70), "Food"),
            expense(3, date!(2024 - 03 - 10), dec!(30), "Transport"),
        ];

        let result = current_month_expense_by_category(&operations, date!(2024 - 03 - 31));

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, "Transport");
        assert_eq!(result[0].total, dec!(30));
    }

    #[test]
    fn current_month_expense_by_category_keeps_first_seen_order() {
        let uncategorized =
            Operation::build(OperationKind::Expense, date!(2024 - 03 - 04), dec!(2))
                .id(4)
                .finalise()
                .unwrap();
        let operations = vec![
            expense(1, date!(2024 - 03 - 05), dec!(10), "Transport"),
            expense(2, date!(2024 - 03 - 01), dec!(20), "Food"),
            expense(3, date!(2024 - 03 - 09), dec!(5), "Transport"),
            uncategorized,
        ];

        let result = current_month_expense_by_category(&operations, date!(2024 - 03 - 15));

        let names: Vec<_> = result.iter().map(|total| total.category.as_str()).collect();
        assert_eq!(names, vec!["Transport", "Food", UNCATEGORIZED_LABEL]);
        assert_eq!(result[0].total, dec!(15));
    }

    #[test]
    fn all_aggregations_handle_empty_input() {
        let operations: Vec<Operation> = Vec::new();

        assert_eq!(compute_totals(&operations), Totals::default());
        assert!(sort_by_recency(&operations).is_empty());
        assert!(group_by_month(&operations).is_empty());
        assert!(monthly_balance_series(&operations).is_empty());
        assert!(current_month_expense_by_category(&operations, date!(2024 - 03 - 15)).is_empty());
    }
}
