use crate::error::AppError;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// Constraint names follow the PostgreSQL defaults used by the migrations
/// (`{table}_{column}_key`, `{table}_{column}_fkey`, `{table}_{column}_check`).
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let table = info.table_name().map(str::to_string);
        let constraint = info.constraint_name();

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                let (key, value) = extract_key_value(message).unwrap_or_else(|| {
                    (
                        constraint
                            .and_then(|c| constraint_column(c, "_key"))
                            .unwrap_or_else(|| "unknown".to_string()),
                        "unknown".to_string(),
                    )
                });
                AppError::Duplicate {
                    entity: table
                        .or_else(|| constraint.and_then(constraint_table))
                        .unwrap_or_else(|| "resource".to_string()),
                    field: key,
                    value,
                }
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                let (field, value) = extract_key_value(message).unwrap_or_else(|| {
                    (
                        constraint
                            .and_then(|c| constraint_column(c, "_fkey"))
                            .unwrap_or_else(|| "reference".to_string()),
                        "unknown".to_string(),
                    )
                });
                AppError::Validation {
                    reason: format!("Invalid reference with value '{}'", value),
                    field,
                }
            }
            DatabaseErrorKind::NotNullViolation => AppError::Validation {
                field: info
                    .column_name()
                    .map(str::to_string)
                    .or_else(|| quoted_after(message, "column"))
                    .unwrap_or_else(|| "unknown".to_string()),
                reason: "Field is required".to_string(),
            },
            DatabaseErrorKind::CheckViolation => AppError::Validation {
                field: constraint
                    .and_then(|c| constraint_column(c, "_check"))
                    .unwrap_or_else(|| "unknown".to_string()),
                reason: "Check constraint failed".to_string(),
            },
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Database error: {}", message)),
            },
        }
    }
}

/// Pulls `(column, value)` out of a PostgreSQL `DETAIL: Key (column)=(value)` line.
fn extract_key_value(message: &str) -> Option<(String, String)> {
    let start = message.find("Key (")? + "Key (".len();
    let rest = &message[start..];
    let close = rest.find(")=(")?;
    let column = &rest[..close];
    let value_rest = &rest[close + 3..];
    let value_end = value_rest.find(')')?;
    Some((column.to_string(), value_rest[..value_end].to_string()))
}

fn quoted_after(message: &str, marker: &str) -> Option<String> {
    let start = message.find(marker)? + marker.len();
    let rest = message[start..].trim_start().strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

const KNOWN_TABLES: &[&str] = &["cart_items", "favorites", "users"];

fn constraint_table(constraint: &str) -> Option<String> {
    KNOWN_TABLES
        .iter()
        .find(|t| constraint.starts_with(&format!("{}_", t)))
        .map(|t| t.to_string())
}

fn constraint_column(constraint: &str, suffix: &str) -> Option<String> {
    let table = constraint_table(constraint)?;
    let body = constraint.strip_prefix(&table)?.strip_prefix('_')?;
    let column = body.strip_suffix(suffix)?;
    (!column.is_empty()).then(|| column.to_string())
}
