//! Validation of operation records as served by the budget REST API.
//!
//! The operations list endpoint returns records with nested `type`,
//! `category` and `by` objects, a `YYYY-MM-DD` date and a decimal value that
//! may arrive as a string or a number. This module turns those records into
//! [Operation]s, so the aggregation functions never see malformed data.

use std::{fs, path::Path, str::FromStr};

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    operation::{Category, Member, Operation, OperationBuilder, OperationId, OperationKind},
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Values must be strictly below this amount, i.e. at most eight digits with
/// two of them after the decimal point.
pub const MAX_VALUE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Why an operation record was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedReason {
    /// The date is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date \"{0}\"")]
    InvalidDate(String),

    /// The value could not be parsed as a decimal number.
    #[error("invalid value \"{0}\"")]
    InvalidValue(String),

    /// The value is below zero. Expenses are marked by their type, not their sign.
    #[error("value {0} is negative")]
    NegativeValue(Decimal),

    /// The value is too large for a household budget, see [MAX_VALUE].
    #[error("value {0} is out of range")]
    OutOfRange(Decimal),

    /// The value has fractions of a cent.
    #[error("value {0} has more than two decimal places")]
    TooManyDecimalPlaces(Decimal),

    /// The record is missing fields or has fields of the wrong JSON type.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// An operation record that could not be turned into an [Operation].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("malformed operation{}: {reason}", format_id(.id))]
pub struct MalformedOperation {
    /// The ID of the record, if it could be read.
    pub id: Option<OperationId>,
    /// What was wrong with the record.
    pub reason: MalformedReason,
}

impl MalformedOperation {
    pub(crate) fn new(id: Option<OperationId>, reason: MalformedReason) -> Self {
        Self { id, reason }
    }
}

fn format_id(id: &Option<OperationId>) -> String {
    match id {
        Some(id) => format!(" {id}"),
        None => String::new(),
    }
}

/// What to do when a record in an operation list is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntakePolicy {
    /// Leave the record out and report it in [IntakeReport::skipped].
    #[default]
    SkipMalformed,
    /// Fail the whole list on the first malformed record.
    RejectMalformed,
}

/// The outcome of reading an operation list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntakeReport {
    /// The records that passed validation, in their original order.
    pub operations: Vec<Operation>,
    /// The records that were left out and why.
    pub skipped: Vec<MalformedOperation>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    id: i64,
    username: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Deserialize)]
struct RawOperation {
    id: OperationId,
    #[serde(rename = "type")]
    kind: Option<RawNamed>,
    date: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: Option<RawNamed>,
    value: RawValue,
    #[serde(default)]
    by: Option<RawMember>,
}

/// Reads and validates an operation list from a JSON file.
///
/// # Errors
/// Returns [Error::Io] if the file cannot be read, otherwise see
/// [parse_operations].
pub fn read_operations(path: &Path, policy: IntakePolicy) -> Result<IntakeReport, Error> {
    let json = fs::read_to_string(path).map_err(|error| {
        tracing::error!("could not read operations from {}: {error}", path.display());
        Error::Io(format!("{}: {error}", path.display()))
    })?;

    parse_operations(&json, policy)
}

/// Parses and validates an operation list.
///
/// Accepts either a JSON array of operation records or a paginated object
/// with the records under `"results"`.
///
/// # Errors
/// Returns [Error::InvalidJson] if `json` is not an operation list, or
/// [Error::MalformedOperation] for the first bad record when `policy` is
/// [IntakePolicy::RejectMalformed].
pub fn parse_operations(json: &str, policy: IntakePolicy) -> Result<IntakeReport, Error> {
    let records = match serde_json::from_str::<Value>(json)? {
        Value::Array(records) => records,
        Value::Object(mut page) => match page.remove("results") {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(Error::InvalidJson(
                    "expected a list of operations or an object with \"results\"".to_owned(),
                ));
            }
        },
        _ => {
            return Err(Error::InvalidJson(
                "expected a list of operations".to_owned(),
            ));
        }
    };

    tracing::debug!("validating {} operation records", records.len());

    let mut report = IntakeReport::default();

    for record in records {
        match validate_record(record) {
            Ok(operation) => report.operations.push(operation),
            Err(error) => match policy {
                IntakePolicy::RejectMalformed => {
                    tracing::error!("rejecting operation list: {error}");
                    return Err(error.into());
                }
                IntakePolicy::SkipMalformed => {
                    tracing::warn!("skipping {error}");
                    report.skipped.push(error);
                }
            },
        }
    }

    Ok(report)
}

/// Validates a single operation record.
///
/// # Errors
/// Returns a [MalformedOperation] naming the first problem found.
pub fn validate_record(record: Value) -> Result<Operation, MalformedOperation> {
    let id = record.get("id").and_then(Value::as_i64);
    let raw: RawOperation = serde_json::from_value(record).map_err(|error| {
        MalformedOperation::new(id, MalformedReason::InvalidRecord(error.to_string()))
    })?;
    let id = Some(raw.id);

    // Types other than income and expense are listed but never counted.
    let kind = raw.kind.and_then(|kind| {
        let parsed = OperationKind::from_name(&kind.name);
        if parsed.is_none() {
            tracing::debug!("operation {} has unrecognised type \"{}\"", raw.id, kind.name);
        }
        parsed
    });

    let date = Date::parse(raw.date.trim(), DATE_FORMAT)
        .map_err(|_| MalformedOperation::new(id, MalformedReason::InvalidDate(raw.date.clone())))?;

    let value = parse_value(&raw.value).map_err(|reason| MalformedOperation::new(id, reason))?;

    OperationBuilder::new(kind, date, value)
        .id(raw.id)
        .title(&raw.title)
        .category(raw.category.map(|category| Category {
            id: category.id,
            name: category.name,
        }))
        .by(raw.by.map(|member| Member {
            id: member.id,
            username: member.username,
        }))
        .finalise()
}

fn parse_value(value: &RawValue) -> Result<Decimal, MalformedReason> {
    let text = match value {
        RawValue::Text(text) => text.trim().to_owned(),
        RawValue::Number(number) => number.to_string(),
    };

    let parsed = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| MalformedReason::InvalidValue(text.clone()))?;

    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(MalformedReason::NegativeValue(parsed));
    }

    if parsed >= MAX_VALUE {
        return Err(MalformedReason::OutOfRange(parsed));
    }

    if parsed.normalize().scale() > 2 {
        return Err(MalformedReason::TooManyDecimalPlaces(parsed));
    }

    Ok(parsed)
}
