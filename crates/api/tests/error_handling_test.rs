use axum::http::StatusCode;
use rstest::rstest;
use schooldesk_api::middleware::error_handling::map_error;
use schooldesk_core::{
    errors::SchoolError,
    models::timetable::{SchoolDay, SlotKey},
};

fn key() -> SlotKey {
    SlotKey::new("c1", None, SchoolDay::Monday, 1)
}

#[rstest]
#[case::not_found(SchoolError::NotFound("Lesson not found".to_string()), StatusCode::NOT_FOUND)]
#[case::conflict(SchoolError::conflict(key(), None), StatusCode::CONFLICT)]
#[case::validation(SchoolError::Validation("subject is required".to_string()), StatusCode::BAD_REQUEST)]
#[case::database(SchoolError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case::internal(
    SchoolError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: SchoolError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}
