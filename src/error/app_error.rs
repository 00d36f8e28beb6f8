use crate::config::ConfigError;
use crate::error::DatabaseErrorConverter;
use thiserror::Error;

/// Application-wide error type that represents all possible errors in the system.
///
/// Variants carry structured context so the HTTP layer can pick a status code
/// and a stable error code without inspecting messages.
#[derive(Error, Debug)]
pub enum AppError {
    /// The remote catalog could not be reached, answered with a non-success
    /// status, or returned a body that could not be decoded
    #[error("Catalog unavailable: {message}")]
    CatalogUnavailable {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// The product is already in the user's favorites
    #[error("Product {product_id} is already favorited by user {user_id}")]
    AlreadyFavorited { user_id: i64, product_id: i64 },

    /// The product is not in the user's favorites
    #[error("Product {product_id} is not favorited by user {user_id}")]
    NotFavorited { user_id: i64, product_id: i64 },

    /// The product has no line in the user's cart
    #[error("Product {product_id} is not in the cart of user {user_id}")]
    NotInCart { user_id: i64, product_id: i64 },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Unauthorized access error with authentication message
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn catalog_unavailable(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::CatalogUnavailable {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn product_not_found(product_id: i64) -> Self {
        AppError::NotFound {
            entity: "product".to_string(),
            field: "id".to_string(),
            value: product_id.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
