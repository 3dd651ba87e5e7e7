//! Defines the core data model for budget operations.

use std::fmt::Display;

use rust_decimal::Decimal;
use time::Date;

use crate::{
    intake::{MalformedOperation, MalformedReason},
    month::MonthKey,
};

/// Alias for the integer type the budget service uses for operation IDs.
pub type OperationId = i64;

/// The label used for operations that do not reference a category.
pub const UNCATEGORIZED_LABEL: &str = "No category";

/// Whether an operation brought money into the household or took it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Money earned, e.g. a salary.
    Income,
    /// Money spent, e.g. groceries or rent.
    Expense,
}

impl OperationKind {
    /// The name the budget service uses for this kind of operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Income => "income",
            OperationKind::Expense => "expense",
        }
    }

    /// Match an operation type name from the budget service, ignoring case.
    ///
    /// Returns `None` for names other than "income" and "expense".
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();

        if name.eq_ignore_ascii_case("income") {
            Some(OperationKind::Income)
        } else if name.eq_ignore_ascii_case("expense") {
            Some(OperationKind::Expense)
        } else {
            None
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Income => write!(f, "Income"),
            OperationKind::Expense => write!(f, "Expense"),
        }
    }
}

/// A category such as "Groceries" or "Rent".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    /// The ID the budget service assigned to the category.
    pub id: i64,
    /// The display name of the category.
    pub name: String,
}

impl Category {
    /// Create a new category.
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
        }
    }
}

/// A member of the household budget.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    /// The user ID of the member.
    pub id: i64,
    /// The member's username.
    pub username: String,
}

impl Member {
    /// Create a new member.
    pub fn new(id: i64, username: &str) -> Self {
        Self {
            id,
            username: username.to_owned(),
        }
    }
}

/// An expense or income recorded in a household budget.
///
/// To create a new `Operation`, use [Operation::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// The ID of the operation.
    pub id: OperationId,
    /// Whether the operation is an income or an expense.
    ///
    /// `None` when the budget service no longer knows the operation's type.
    /// These operations are listed but never counted towards totals.
    pub kind: Option<OperationKind>,
    /// When the operation happened.
    pub date: Date,
    /// A short description of the operation.
    pub title: String,
    /// The category of the operation, if any.
    pub category: Option<Category>,
    /// The amount of money. Never negative, the sign comes from `kind`.
    pub value: Decimal,
    /// The member who recorded the operation.
    pub by: Option<Member>,
}

impl Operation {
    /// Create a new operation.
    ///
    /// Shortcut for [OperationBuilder] for discoverability.
    pub fn build(kind: OperationKind, date: Date, value: Decimal) -> OperationBuilder {
        OperationBuilder::new(Some(kind), date, value)
    }

    /// The calendar month the operation belongs to.
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    /// The display name of the operation's category, or [UNCATEGORIZED_LABEL].
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|category| category.name.as_str())
            .unwrap_or(UNCATEGORIZED_LABEL)
    }

    /// Whether the operation is an income.
    pub fn is_income(&self) -> bool {
        self.kind == Some(OperationKind::Income)
    }

    /// Whether the operation is an expense.
    pub fn is_expense(&self) -> bool {
        self.kind == Some(OperationKind::Expense)
    }
}

/// A builder for creating [Operation] instances.
///
/// # Examples
///
/// ```
/// use household_budget::operation::{Category, Operation, OperationKind};
/// use rust_decimal::Decimal;
/// use time::macros::date;
///
/// let operation = Operation::build(OperationKind::Expense, date!(2024 - 01 - 10), Decimal::new(300, 0))
///     .id(2)
///     .title("Weekly shop")
///     .category(Some(Category::new(1, "Food")))
///     .finalise()
///     .unwrap();
///
/// assert_eq!(operation.category_name(), "Food");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct OperationBuilder {
    id: OperationId,
    kind: Option<OperationKind>,
    date: Date,
    title: String,
    category: Option<Category>,
    value: Decimal,
    by: Option<Member>,
}

impl OperationBuilder {
    /// Start building an operation whose kind may be unknown.
    ///
    /// Use [Operation::build] when the kind is known.
    pub fn new(kind: Option<OperationKind>, date: Date, value: Decimal) -> Self {
        Self {
            id: 0,
            kind,
            date,
            title: String::new(),
            category: None,
            value,
            by: None,
        }
    }

    /// Set the ID of the operation.
    pub fn id(mut self, id: OperationId) -> Self {
        self.id = id;
        self
    }

    /// Set the title of the operation.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    /// Set the category of the operation.
    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Set the member who recorded the operation.
    pub fn by(mut self, by: Option<Member>) -> Self {
        self.by = by;
        self
    }

    /// Create the [Operation].
    ///
    /// # Errors
    /// Returns a [MalformedOperation] if the value is negative.
    pub fn finalise(self) -> Result<Operation, MalformedOperation> {
        if self.value.is_sign_negative() && !self.value.is_zero() {
            return Err(MalformedOperation::new(
                Some(self.id),
                MalformedReason::NegativeValue(self.value),
            ));
        }

        Ok(Operation {
            id: self.id,
            kind: self.kind,
            date: self.date,
            title: self.title,
            category: self.category,
            value: self.value,
            by: self.by,
        })
    }
}
