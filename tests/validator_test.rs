use semporna::application::services::{
    validate_letter_data, validate_resume_data, ValidationCause,
};
use semporna::domain::{
    DiscoveredSkill, ExtractedLetterData, ExtractedResumeData, LetterAuthor, SkillMention,
};

fn valid_letter() -> ExtractedLetterData {
    ExtractedLetterData {
        author: LetterAuthor {
            name: "Jane Doe".to_string(),
            title: Some("Engineering Manager".to_string()),
            company: Some("Acme Corp".to_string()),
            relationship: Some("manager".to_string()),
        },
        testimonials: vec!["One of the strongest engineers I have worked with.".to_string()],
        skill_mentions: vec![SkillMention {
            skill: "Rust".to_string(),
            quote: "She rewrote the ingestion service in Rust in a quarter.".to_string(),
        }],
        experience_mentions: vec![],
        discovered_skills: vec![DiscoveredSkill {
            name: "Rust".to_string(),
            category: "technical".to_string(),
        }],
        metadata: None,
    }
}

fn valid_resume() -> ExtractedResumeData {
    ExtractedResumeData {
        name: "John Candidate".to_string(),
        email: Some("john@example.com".to_string()),
        phone: None,
        location: Some("Oslo".to_string()),
        summary: Some("Backend engineer with ten years of experience.".to_string()),
        work_experience: vec![],
        education: vec![],
        skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
        confidence: 0.92,
        metadata: None,
    }
}

#[test]
fn given_valid_letter_when_validating_then_passes() {
    assert!(validate_letter_data(&valid_letter()).is_ok());
}

#[test]
fn given_empty_author_name_when_validating_letter_then_fails_empty_required() {
    let mut letter = valid_letter();
    letter.author.name = "".to_string();

    let err = validate_letter_data(&letter).unwrap_err();
    assert_eq!(err.cause, ValidationCause::EmptyRequired);
    assert_eq!(err.field, "author.name");
}

#[test]
fn given_unknown_placeholder_author_when_validating_letter_then_fails_empty_required() {
    for name in ["unknown", "Unknown", "UNKNOWN", "  unknown  "] {
        let mut letter = valid_letter();
        letter.author.name = name.to_string();

        let err = validate_letter_data(&letter).unwrap_err();
        assert_eq!(err.cause, ValidationCause::EmptyRequired);
        assert_eq!(err.field, "author.name");
    }
}

#[test]
fn given_oversized_testimonial_when_validating_letter_then_fails_too_long() {
    let mut letter = valid_letter();
    letter.testimonials.push("x".repeat(5_001));

    let err = validate_letter_data(&letter).unwrap_err();
    assert_eq!(err.cause, ValidationCause::FieldTooLong);
    assert!(err.field.starts_with("testimonials["));
}

#[test]
fn given_control_characters_in_author_name_when_validating_letter_then_fails_invalid_character() {
    let mut letter = valid_letter();
    letter.author.name = "Jane\u{0000}Doe".to_string();

    let err = validate_letter_data(&letter).unwrap_err();
    assert_eq!(err.cause, ValidationCause::InvalidCharacter);
    assert_eq!(err.field, "author.name");
}

#[test]
fn given_newlines_in_testimonial_when_validating_letter_then_passes() {
    let mut letter = valid_letter();
    letter.testimonials = vec!["First line.\nSecond line.".to_string()];

    assert!(validate_letter_data(&letter).is_ok());
}

#[test]
fn given_valid_resume_when_validating_then_passes() {
    assert!(validate_resume_data(&valid_resume()).is_ok());
}

#[test]
fn given_empty_name_when_validating_resume_then_fails_empty_required() {
    let mut resume = valid_resume();
    resume.name = "   ".to_string();

    let err = validate_resume_data(&resume).unwrap_err();
    assert_eq!(err.cause, ValidationCause::EmptyRequired);
    assert_eq!(err.field, "name");
}

#[test]
fn given_oversized_summary_when_validating_resume_then_fails_too_long() {
    let mut resume = valid_resume();
    resume.summary = Some("y".repeat(6_000));

    let err = validate_resume_data(&resume).unwrap_err();
    assert_eq!(err.cause, ValidationCause::FieldTooLong);
    assert_eq!(err.field, "summary");
}

#[test]
fn given_control_characters_in_skill_when_validating_resume_then_fails_invalid_character() {
    let mut resume = valid_resume();
    resume.skills.push("Ru\u{0008}st".to_string());

    let err = validate_resume_data(&resume).unwrap_err();
    assert_eq!(err.cause, ValidationCause::InvalidCharacter);
}

#[test]
fn given_error_when_formatting_then_message_names_field_and_cause() {
    let mut letter = valid_letter();
    letter.author.name = "".to_string();

    let err = validate_letter_data(&letter).unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("author.name"));
    assert!(rendered.contains("empty-required"));
}
