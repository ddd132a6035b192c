//! Extraction prompt catalog.
//!
//! Each prompt carries a semantic-version-like tag that is stamped into the
//! metadata of every structured result it produces. Bump the version on any
//! wording change that can alter model behavior.

use serde_json::{json, Value as JsonValue};

pub const TEXT_PROMPT_VERSION: &str = "1.1.0";
pub const TEXT_EXTRACTION_PROMPT: &str = "Extract every piece of text from this document exactly as written.\n\
\n\
Follow these strict rules:\n\
1. Transcribe all visible text, preserving reading order.\n\
2. Keep section headings, list structure and line breaks between paragraphs.\n\
3. Do NOT summarize, translate, or correct spelling.\n\
4. Do NOT describe images, logos or page decoration.\n\
5. Output ONLY the transcribed text. No conversational filler.";

pub const RESUME_PROMPT_VERSION: &str = "2.1.0";
pub const RESUME_EXTRACTION_PROMPT: &str = "You are given the plain text of a resume. \
Extract the candidate's structured profile.\n\
\n\
Follow these strict rules:\n\
1. Use ONLY information stated in the text; never invent values.\n\
2. Leave a field empty when the text does not state it.\n\
3. Dates stay in the format the resume uses.\n\
4. `confidence` is your 0.0-1.0 estimate that the extraction is faithful.\n\
\n\
Resume text:\n";

pub const LETTER_PROMPT_VERSION: &str = "1.3.0";
pub const LETTER_EXTRACTION_PROMPT: &str = "You are given the plain text of a reference letter. \
Extract who wrote it and what they attest to.\n\
\n\
Follow these strict rules:\n\
1. Use ONLY information stated in the text; never invent values.\n\
2. `author.name` is the person who signed the letter, not the subject.\n\
3. Every skill or experience mention must carry the exact supporting quote.\n\
4. `testimonials` are verbatim sentences praising the subject.\n\
5. `discoveredSkills` are skills the author credits to the subject, each \
with a category of technical, leadership, communication, or domain.\n\
\n\
Letter text:\n";

/// JSON schema for constrained resume extraction.
pub fn resume_schema() -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "email": { "type": "string" },
            "phone": { "type": "string" },
            "location": { "type": "string" },
            "summary": { "type": "string" },
            "workExperience": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "company": { "type": "string" },
                        "title": { "type": "string" },
                        "startDate": { "type": "string" },
                        "endDate": { "type": "string" },
                        "description": { "type": "string" }
                    },
                    "required": ["company", "title"]
                }
            },
            "education": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "institution": { "type": "string" },
                        "degree": { "type": "string" },
                        "field": { "type": "string" },
                        "graduationYear": { "type": "string" }
                    },
                    "required": ["institution"]
                }
            },
            "skills": { "type": "array", "items": { "type": "string" } },
            "confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 }
        },
        "required": ["name", "confidence"]
    })
}

/// JSON schema for constrained reference-letter extraction.
pub fn letter_schema() -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "author": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "title": { "type": "string" },
                    "company": { "type": "string" },
                    "relationship": { "type": "string" }
                },
                "required": ["name"]
            },
            "testimonials": { "type": "array", "items": { "type": "string" } },
            "skillMentions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "skill": { "type": "string" },
                        "quote": { "type": "string" }
                    },
                    "required": ["skill", "quote"]
                }
            },
            "experienceMentions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "experience": { "type": "string" },
                        "quote": { "type": "string" }
                    },
                    "required": ["experience"]
                }
            },
            "discoveredSkills": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "category": {
                            "type": "string",
                            "enum": ["technical", "leadership", "communication", "domain"]
                        }
                    },
                    "required": ["name", "category"]
                }
            }
        },
        "required": ["author"]
    })
}
