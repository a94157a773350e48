//! Schema Validator: turns the generative service's free-form reply into a
//! `ResumeContent`, or rejects it.
//!
//! The reply is untrusted text. Extraction is parse-then-validate with no
//! partial results:
//! 1. locate exactly one delimited block (a fenced code block, or a reply
//!    that is nothing but a JSON object)
//! 2. parse it as JSON → `Malformed` on failure
//! 3. check every required top-level key is present → `SchemaMismatch`
//! 4. deserialize into the typed schema → `SchemaMismatch` on wrong shapes or
//!    missing nested keys
//! 5. reject blank identity fields (name, employer, role, institution)
//!
//! Unknown keys are dropped, so a reply cannot smuggle `storedResumes` or
//! anything else into the pipeline.

use serde_json::Value;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::profile::{ResumeContent, REQUIRED_CONTENT_FIELDS};

const FENCE: &str = "```";

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("{0}")]
    Malformed(String),

    #[error("{0}")]
    SchemaMismatch(String),
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Malformed(msg) => AppError::MalformedAiOutput(msg),
            ExtractError::SchemaMismatch(msg) => AppError::SchemaMismatch(msg),
        }
    }
}

/// Extracts and validates the tailored resume from a raw model reply.
pub fn extract_payload(raw_reply: &str) -> Result<ResumeContent, ExtractError> {
    let block = locate_block(raw_reply)?;

    let value: Value = serde_json::from_str(block)
        .map_err(|e| ExtractError::Malformed(format!("structured block is not valid JSON: {e}")))?;

    let Value::Object(fields) = &value else {
        return Err(ExtractError::SchemaMismatch(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    };

    let missing: Vec<&str> = REQUIRED_CONTENT_FIELDS
        .iter()
        .copied()
        .filter(|key| !fields.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(ExtractError::SchemaMismatch(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let content: ResumeContent = serde_json::from_value(value)
        .map_err(|e| ExtractError::SchemaMismatch(format!("field has the wrong shape: {e}")))?;

    check_identity_fields(&content)?;
    Ok(content)
}

/// Fields a resume cannot meaningfully render without.
fn check_identity_fields(content: &ResumeContent) -> Result<(), ExtractError> {
    let mut blank = Vec::new();
    if content.personal_info.name.trim().is_empty() {
        blank.push("personalInfo.name".to_string());
    }
    for (i, job) in content.work_experience.iter().enumerate() {
        if job.company.trim().is_empty() {
            blank.push(format!("workExperience[{i}].company"));
        }
        if job.role.trim().is_empty() {
            blank.push(format!("workExperience[{i}].role"));
        }
    }
    for (i, school) in content.education.iter().enumerate() {
        if school.institution.trim().is_empty() {
            blank.push(format!("education[{i}].institution"));
        }
    }

    if blank.is_empty() {
        Ok(())
    } else {
        Err(ExtractError::SchemaMismatch(format!(
            "blank required fields: {}",
            blank.join(", ")
        )))
    }
}

/// Finds the single structured block in the reply.
fn locate_block(raw_reply: &str) -> Result<&str, ExtractError> {
    let text = raw_reply.trim();
    let blocks = fenced_blocks(text)?;

    match blocks.as_slice() {
        [single] => Ok(*single),
        [] if text.starts_with('{') && text.ends_with('}') => Ok(text),
        [] => Err(ExtractError::Malformed(
            "reply contains no fenced structured block".to_string(),
        )),
        many => Err(ExtractError::Malformed(format!(
            "reply contains {} fenced blocks; expected exactly one",
            many.len()
        ))),
    }
}

/// Returns the trimmed bodies of all ``` fenced blocks.
///
/// Fences count only at the start of a line, so backticks inside a JSON
/// string value are body text. The info string (e.g. `json`) on the opening
/// fence line is skipped; a closing fence is a line holding only the fence.
fn fenced_blocks(text: &str) -> Result<Vec<&str>, ExtractError> {
    let mut blocks = Vec::new();
    let mut body_start: Option<usize> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        match body_start {
            None if trimmed.starts_with(FENCE) => body_start = Some(offset + line.len()),
            Some(start) if trimmed == FENCE => {
                blocks.push(text[start..offset].trim());
                body_start = None;
            }
            _ => {}
        }
        offset += line.len();
    }

    if body_start.is_some() {
        return Err(ExtractError::Malformed(
            "unterminated fenced block".to_string(),
        ));
    }
    Ok(blocks)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
