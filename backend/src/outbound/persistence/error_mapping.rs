//! Shared Diesel error mapping for the persistence adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into an adapter-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Readable message for a Diesel error, logged at debug level.
///
/// Database errors yield the server's message; anything else its display
/// form.
pub fn diesel_error_message(error: &DieselError, operation: &str) -> String {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
            info.message().to_owned()
        }
        _ => {
            let message = error.to_string();
            debug!(
                error_type = %std::any::type_name_of_val(error),
                error = %message,
                %operation,
                "diesel operation failed"
            );
            message
        }
    }
}

/// Map a Diesel error into query/connection constructors.
///
/// Closed connections become connection errors; everything else is a query
/// error carrying the database message.
pub fn map_basic_diesel_error<E, Q, C>(
    error: DieselError,
    operation: &str,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    let message = diesel_error_message(&error, operation);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => connection(message),
        _ => query(message),
    }
}

/// Whether `error` is a unique constraint violation.
pub fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}
