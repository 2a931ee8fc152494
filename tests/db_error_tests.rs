//! Tests for db::repository::error - constructors, context and classification.

use courtbook::db::repository::{ErrorContext, RepositoryError, RepositoryResult};

#[test]
fn test_error_context_new() {
    let ctx = ErrorContext::new("create_reservation");
    assert_eq!(ctx.operation, Some("create_reservation".to_string()));
    assert!(ctx.entity.is_none());
    assert!(ctx.entity_id.is_none());
    assert!(ctx.details.is_none());
    assert!(!ctx.retryable);
}

#[test]
fn test_error_context_builder_chain() {
    let ctx = ErrorContext::new("store_reservation")
        .with_entity("reservation")
        .with_entity_id(42)
        .with_details("lock wait timeout")
        .retryable();

    assert_eq!(ctx.operation, Some("store_reservation".to_string()));
    assert_eq!(ctx.entity, Some("reservation".to_string()));
    assert_eq!(ctx.entity_id, Some("42".to_string()));
    assert_eq!(ctx.details, Some("lock wait timeout".to_string()));
    assert!(ctx.retryable);
}

#[test]
fn test_error_context_display() {
    let ctx = ErrorContext::new("fetch_court")
        .with_entity("court")
        .with_entity_id(7);
    let display = format!("{}", ctx);
    assert!(display.contains("operation=fetch_court"));
    assert!(display.contains("entity=court"));
    assert!(display.contains("id=7"));
}

#[test]
fn test_error_context_display_retryable_and_details() {
    let ctx = ErrorContext::new("op")
        .with_details("pool exhausted")
        .retryable();
    let display = format!("{}", ctx);
    assert!(display.contains("details=pool exhausted"));
    assert!(display.contains("retryable=true"));
}

#[test]
fn test_error_context_default_is_empty() {
    let ctx = ErrorContext::default();
    assert!(ctx.operation.is_none());
    assert!(ctx.entity.is_none());
    assert!(ctx.entity_id.is_none());
    assert!(ctx.details.is_none());
    assert!(!ctx.retryable);
}

#[test]
fn test_repository_error_connection() {
    let err = RepositoryError::connection("pool unavailable");
    assert!(err.to_string().contains("Connection error"));
    assert!(err.to_string().contains("pool unavailable"));
}

#[test]
fn test_repository_error_query() {
    let err = RepositoryError::query("malformed predicate");
    assert!(err.to_string().contains("Query error"));
    assert!(err.to_string().contains("malformed predicate"));
}

#[test]
fn test_repository_error_not_found_names_entity_and_id() {
    let err = RepositoryError::not_found("reservation", 99);
    assert!(err.to_string().contains("Not found"));
    assert!(err.to_string().contains("reservation 99 not found"));
    assert_eq!(err.context().entity.as_deref(), Some("reservation"));
    assert_eq!(err.context().entity_id.as_deref(), Some("99"));
}

#[test]
fn test_repository_error_conflict_names_entity() {
    let err = RepositoryError::conflict("client", "email already registered");
    assert!(err.to_string().contains("Conflict"));
    assert!(err.to_string().contains("email already registered"));
    assert_eq!(err.context().entity.as_deref(), Some("client"));
}

#[test]
fn test_repository_error_validation() {
    let err = RepositoryError::validation("phone must contain 8 to 15 digits");
    assert!(err.to_string().contains("validation error"));
    assert!(err.to_string().contains("phone must contain"));
}

#[test]
fn test_repository_error_configuration() {
    let err = RepositoryError::configuration("DATABASE_URL not set");
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_repository_error_internal() {
    let err = RepositoryError::internal("row vanished mid-update");
    assert!(err.to_string().contains("Internal error"));
}

#[test]
fn test_repository_error_transaction() {
    let err = RepositoryError::transaction("serialization failure");
    assert!(err.to_string().contains("Transaction error"));
}

#[test]
fn test_repository_error_timeout() {
    let err = RepositoryError::timeout("statement exceeded 30s");
    assert!(err.to_string().contains("Timeout error"));
}

#[test]
fn test_transient_errors_are_retryable() {
    assert!(RepositoryError::connection("down").is_retryable());
    assert!(RepositoryError::transaction("aborted").is_retryable());
    assert!(RepositoryError::timeout("slow").is_retryable());
}

#[test]
fn test_permanent_errors_are_not_retryable() {
    assert!(!RepositoryError::query("syntax").is_retryable());
    assert!(!RepositoryError::not_found("court", 1).is_retryable());
    assert!(!RepositoryError::conflict("court", "name taken").is_retryable());
    assert!(!RepositoryError::validation("bad").is_retryable());
    assert!(!RepositoryError::configuration("bad").is_retryable());
    assert!(!RepositoryError::internal("bad").is_retryable());
}

#[test]
fn test_classification_helpers_are_disjoint() {
    let missing = RepositoryError::not_found("payment", 3);
    assert!(missing.is_not_found());
    assert!(!missing.is_conflict());

    let duplicate = RepositoryError::conflict("tournament", "name taken");
    assert!(duplicate.is_conflict());
    assert!(!duplicate.is_not_found());

    let other = RepositoryError::internal("boom");
    assert!(!other.is_not_found());
    assert!(!other.is_conflict());
}

#[test]
fn test_with_operation_tags_the_context() {
    let err = RepositoryError::query("boom").with_operation("list_reservations");
    assert_eq!(err.context().operation.as_deref(), Some("list_reservations"));
    assert!(err.to_string().contains("operation=list_reservations"));
}

#[test]
fn test_with_operation_preserves_retryability() {
    let err = RepositoryError::timeout("slow").with_operation("fetch_for_court_date");
    assert!(err.is_retryable());
}

#[test]
fn test_repository_error_debug_names_the_variant() {
    let err = RepositoryError::internal("test");
    assert!(format!("{:?}", err).contains("InternalError"));
    let err = RepositoryError::not_found("slot", 5);
    assert!(format!("{:?}", err).contains("NotFound"));
}

#[test]
fn test_repository_result_alias() {
    let ok: RepositoryResult<i32> = Ok(42);
    assert_eq!(ok.unwrap(), 42);
    let err: RepositoryResult<i32> = Err(RepositoryError::not_found("client", 1));
    assert!(err.is_err());
}
