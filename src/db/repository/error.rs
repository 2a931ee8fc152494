//! Error types for repository operations.
//!
//! Every storage backend reports failures through [`RepositoryError`], with
//! structured [`ErrorContext`] for debugging and monitoring. Transient
//! failures (connection loss, serialization aborts under concurrent writes,
//! timeouts) are marked retryable; the Postgres connection helper reruns
//! those with fresh data before surfacing them.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "create_reservation")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "reservation", "client")
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether this error is retryable
    pub retryable: bool,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity type.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the entity ID.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Mark this error as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum RepositoryError {
    /// Connection pool or database connection errors. Typically transient.
    #[error("Connection error: {message} {context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// SQL query execution errors.
    #[error("Query error: {message} {context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    /// Requested entity was not found.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// A uniqueness or reference rule was violated: duplicate email or name,
    /// duplicate tournament-court link, entity still referenced on delete.
    #[error("Conflict: {message} {context}")]
    Conflict {
        message: String,
        context: ErrorContext,
    },

    /// Data validation failed before or after a database operation.
    #[error("Data validation error: {message} {context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },

    /// Transaction error (aborted, commit/rollback failed).
    #[error("Transaction error: {message} {context}")]
    TransactionError {
        message: String,
        context: ErrorContext,
    },

    /// Timeout waiting for a connection or query.
    #[error("Timeout error: {message} {context}")]
    TimeoutError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    /// Create a connection error; connection problems are retryable.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Create a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a not-found error naming the entity and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        let entity = entity.into();
        let id = id.to_string();
        Self::NotFound {
            message: format!("{entity} {id} not found"),
            context: ErrorContext::default()
                .with_entity(entity)
                .with_entity_id(id),
        }
    }

    /// Create a conflict error naming the entity.
    pub fn conflict(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            context: ErrorContext::default().with_entity(entity),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a transaction error; aborted transactions are retryable
    /// because rerunning re-reads current state.
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::TransactionError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Check if retrying this operation with fresh data may succeed.
    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TransactionError { context, .. }
            | Self::TimeoutError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TransactionError { context, .. }
            | Self::TimeoutError { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::DatabaseErrorKind;

        match err {
            diesel::result::Error::NotFound => Self::NotFound {
                message: "record not found".to_string(),
                context: ErrorContext::default(),
            },
            diesel::result::Error::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                let context =
                    ErrorContext::default().with_details(format!("db_error_kind={:?}", kind));
                match kind {
                    // Racing writers under SERIALIZABLE isolation; rerun
                    // re-reads committed state.
                    DatabaseErrorKind::SerializationFailure => Self::TransactionError {
                        message,
                        context: context.retryable(),
                    },
                    DatabaseErrorKind::UniqueViolation
                    | DatabaseErrorKind::ForeignKeyViolation => {
                        Self::Conflict { message, context }
                    }
                    DatabaseErrorKind::ClosedConnection => Self::ConnectionError {
                        message,
                        context: context.retryable(),
                    },
                    _ => Self::QueryError { message, context },
                }
            }
            diesel::result::Error::QueryBuilderError(e) => {
                Self::query(format!("query builder error: {}", e))
            }
            diesel::result::Error::DeserializationError(e) => {
                Self::internal(format!("deserialization error: {}", e))
            }
            diesel::result::Error::SerializationError(e) => {
                Self::internal(format!("serialization error: {}", e))
            }
            other => Self::query(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::ConnectionError {
            message: err.to_string(),
            context: ErrorContext::default().with_details("pool_error").retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_flags() {
        assert!(RepositoryError::connection("down").is_retryable());
        assert!(RepositoryError::transaction("serialization failure").is_retryable());
        assert!(RepositoryError::timeout("slow").is_retryable());
        assert!(!RepositoryError::query("syntax").is_retryable());
        assert!(!RepositoryError::not_found("client", 4).is_retryable());
        assert!(!RepositoryError::configuration("bad url").is_retryable());
    }

    #[test]
    fn not_found_carries_entity_context() {
        let err = RepositoryError::not_found("client", 42);
        assert!(err.is_not_found());
        let ctx = err.context();
        assert_eq!(ctx.entity.as_deref(), Some("client"));
        assert_eq!(ctx.entity_id.as_deref(), Some("42"));
        assert!(err.to_string().contains("client 42 not found"));
    }

    #[test]
    fn conflict_is_distinguishable_from_not_found() {
        let err = RepositoryError::conflict("client", "email already registered");
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
    }

    #[test]
    fn with_operation_updates_context() {
        let err = RepositoryError::query("boom").with_operation("list_courts");
        assert_eq!(err.context().operation.as_deref(), Some("list_courts"));
        assert!(err.to_string().contains("operation=list_courts"));
    }

    #[test]
    fn context_display_joins_fields() {
        let ctx = ErrorContext::new("store")
            .with_entity("payment")
            .with_entity_id(9)
            .retryable();
        let rendered = ctx.to_string();
        assert!(rendered.contains("operation=store"));
        assert!(rendered.contains("entity=payment"));
        assert!(rendered.contains("id=9"));
        assert!(rendered.contains("retryable=true"));
    }
}
