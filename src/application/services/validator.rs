//! Post-extraction sanitizer gate.
//!
//! Runs after every successful extraction call and before any persistence
//! write, so runaway or malformed model output never enters storage. A
//! violation is non-retryable: the same input would produce the same bad
//! output.

use std::fmt;

use crate::domain::{ExtractedLetterData, ExtractedResumeData};

const MAX_SHORT_FIELD_LEN: usize = 500;
const MAX_LONG_FIELD_LEN: usize = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCause {
    FieldTooLong,
    InvalidCharacter,
    EmptyRequired,
}

impl ValidationCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCause::FieldTooLong => "field-too-long",
            ValidationCause::InvalidCharacter => "invalid-character",
            ValidationCause::EmptyRequired => "empty-required",
        }
    }
}

impl fmt::Display for ValidationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("{field} [{cause}]: {message}")]
pub struct ValidationError {
    pub field: String,
    pub cause: ValidationCause,
    pub message: String,
}

impl ValidationError {
    fn too_long(field: &str, len: usize, limit: usize) -> Self {
        Self {
            field: field.to_string(),
            cause: ValidationCause::FieldTooLong,
            message: format!("{len} characters exceeds the {limit} character limit"),
        }
    }

    fn invalid_character(field: &str) -> Self {
        Self {
            field: field.to_string(),
            cause: ValidationCause::InvalidCharacter,
            message: "contains control or otherwise disallowed characters".to_string(),
        }
    }

    fn empty_required(field: &str) -> Self {
        Self {
            field: field.to_string(),
            cause: ValidationCause::EmptyRequired,
            message: "required field is missing or empty".to_string(),
        }
    }
}

pub fn validate_resume_data(data: &ExtractedResumeData) -> Result<(), ValidationError> {
    check_required("name", &data.name)?;
    check_short("name", &data.name)?;
    check_opt_short("email", data.email.as_deref())?;
    check_opt_short("phone", data.phone.as_deref())?;
    check_opt_short("location", data.location.as_deref())?;
    check_opt_long("summary", data.summary.as_deref())?;

    for (i, exp) in data.work_experience.iter().enumerate() {
        check_short(&format!("workExperience[{i}].company"), &exp.company)?;
        check_short(&format!("workExperience[{i}].title"), &exp.title)?;
        check_opt_short(&format!("workExperience[{i}].startDate"), exp.start_date.as_deref())?;
        check_opt_short(&format!("workExperience[{i}].endDate"), exp.end_date.as_deref())?;
        check_opt_long(
            &format!("workExperience[{i}].description"),
            exp.description.as_deref(),
        )?;
    }

    for (i, edu) in data.education.iter().enumerate() {
        check_short(&format!("education[{i}].institution"), &edu.institution)?;
        check_opt_short(&format!("education[{i}].degree"), edu.degree.as_deref())?;
        check_opt_short(&format!("education[{i}].field"), edu.field.as_deref())?;
        check_opt_short(
            &format!("education[{i}].graduationYear"),
            edu.graduation_year.as_deref(),
        )?;
    }

    for (i, skill) in data.skills.iter().enumerate() {
        check_short(&format!("skills[{i}]"), skill)?;
    }

    Ok(())
}

pub fn validate_letter_data(data: &ExtractedLetterData) -> Result<(), ValidationError> {
    // An author of "" or the placeholder "unknown" makes every downstream
    // mention meaningless, so it fails as a missing required field rather
    // than passing through silently.
    let author_name = data.author.name.trim();
    if author_name.is_empty() || author_name.eq_ignore_ascii_case("unknown") {
        return Err(ValidationError::empty_required("author.name"));
    }
    check_short("author.name", &data.author.name)?;
    check_opt_short("author.title", data.author.title.as_deref())?;
    check_opt_short("author.company", data.author.company.as_deref())?;
    check_opt_short("author.relationship", data.author.relationship.as_deref())?;

    for (i, quote) in data.testimonials.iter().enumerate() {
        check_long(&format!("testimonials[{i}]"), quote)?;
    }

    for (i, mention) in data.skill_mentions.iter().enumerate() {
        check_short(&format!("skillMentions[{i}].skill"), &mention.skill)?;
        check_long(&format!("skillMentions[{i}].quote"), &mention.quote)?;
    }

    for (i, mention) in data.experience_mentions.iter().enumerate() {
        check_long(&format!("experienceMentions[{i}].experience"), &mention.experience)?;
        check_opt_long(&format!("experienceMentions[{i}].quote"), mention.quote.as_deref())?;
    }

    for (i, skill) in data.discovered_skills.iter().enumerate() {
        check_short(&format!("discoveredSkills[{i}].name"), &skill.name)?;
        check_short(&format!("discoveredSkills[{i}].category"), &skill.category)?;
    }

    Ok(())
}

fn check_required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_required(field));
    }
    Ok(())
}

fn check_field(field: &str, value: &str, limit: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > limit {
        return Err(ValidationError::too_long(field, len, limit));
    }
    if value.chars().any(disallowed) {
        return Err(ValidationError::invalid_character(field));
    }
    Ok(())
}

fn check_short(field: &str, value: &str) -> Result<(), ValidationError> {
    check_field(field, value, MAX_SHORT_FIELD_LEN)
}

fn check_long(field: &str, value: &str) -> Result<(), ValidationError> {
    check_field(field, value, MAX_LONG_FIELD_LEN)
}

fn check_opt_short(field: &str, value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| check_short(field, v))
}

fn check_opt_long(field: &str, value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| check_long(field, v))
}

// Newlines and tabs are legitimate in multi-line fields; every other
// control character is rejected.
fn disallowed(c: char) -> bool {
    c.is_control() && c != '\n' && c != '\t' && c != '\r'
}
