use std::str::FromStr;

use semporna::domain::DocumentStatus;

#[test]
fn given_pending_status_when_transitioning_to_processing_then_allowed() {
    assert!(DocumentStatus::Pending.can_transition_to(DocumentStatus::Processing));
}

#[test]
fn given_processing_status_when_re_entering_processing_then_allowed() {
    assert!(DocumentStatus::Processing.can_transition_to(DocumentStatus::Processing));
}

#[test]
fn given_processing_status_when_transitioning_to_terminal_then_allowed() {
    assert!(DocumentStatus::Processing.can_transition_to(DocumentStatus::Completed));
    assert!(DocumentStatus::Processing.can_transition_to(DocumentStatus::Failed));
}

#[test]
fn given_terminal_status_when_transitioning_backwards_then_rejected() {
    for terminal in [DocumentStatus::Completed, DocumentStatus::Failed] {
        assert!(!terminal.can_transition_to(DocumentStatus::Pending));
        assert!(!terminal.can_transition_to(DocumentStatus::Processing));
    }
}

#[test]
fn given_terminal_status_when_rewriting_with_terminal_then_allowed() {
    assert!(DocumentStatus::Completed.can_transition_to(DocumentStatus::Completed));
    assert!(DocumentStatus::Failed.can_transition_to(DocumentStatus::Completed));
    assert!(DocumentStatus::Completed.can_transition_to(DocumentStatus::Failed));
}

#[test]
fn given_pending_status_when_jumping_to_terminal_then_rejected() {
    assert!(!DocumentStatus::Pending.can_transition_to(DocumentStatus::Completed));
    assert!(!DocumentStatus::Pending.can_transition_to(DocumentStatus::Failed));
}

#[test]
fn given_all_statuses_when_round_tripping_through_strings_then_values_match() {
    for status in [
        DocumentStatus::Pending,
        DocumentStatus::Processing,
        DocumentStatus::Completed,
        DocumentStatus::Failed,
    ] {
        let recovered = DocumentStatus::from_str(status.as_str()).unwrap();
        assert_eq!(status, recovered);
    }
}

#[test]
fn given_unknown_string_when_parsing_then_returns_error() {
    assert!(DocumentStatus::from_str("RUNNING").is_err());
    assert!(DocumentStatus::from_str("").is_err());
}

#[test]
fn given_statuses_when_checking_terminality_then_only_completed_and_failed_are_terminal() {
    assert!(!DocumentStatus::Pending.is_terminal());
    assert!(!DocumentStatus::Processing.is_terminal());
    assert!(DocumentStatus::Completed.is_terminal());
    assert!(DocumentStatus::Failed.is_terminal());
}
