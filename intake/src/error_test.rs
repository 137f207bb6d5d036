use super::*;
use crate::form::{FormField, TextField, ValidationKind};

#[test]
fn error_codes_are_stable() {
    assert_eq!(IntakeError::EmptyInput { surface: Surface::Chat }.error_code(), "E_EMPTY_INPUT");
    assert_eq!(IntakeError::Busy { surface: Surface::Audit }.error_code(), "E_SURFACE_BUSY");
    assert_eq!(IntakeError::UnknownIdea(4).error_code(), "E_UNKNOWN_IDEA");
}

#[test]
fn validation_delegates_to_form_error() {
    let err: IntakeError =
        FormError { field: FormField::Text(TextField::Email), kind: ValidationKind::InvalidEmail }.into();
    assert_eq!(err.error_code(), "E_INVALID_EMAIL");
    assert!(err.to_string().contains("valid email"));
}

#[test]
fn only_busy_is_retryable() {
    assert!(IntakeError::Busy { surface: Surface::Ideas }.retryable());
    assert!(!IntakeError::EmptyInput { surface: Surface::Ideas }.retryable());
    assert!(!IntakeError::UnknownIdea(0).retryable());
}

#[test]
fn display_names_the_surface() {
    assert_eq!(IntakeError::EmptyInput { surface: Surface::Refine }.to_string(), "refine input is empty");
}
