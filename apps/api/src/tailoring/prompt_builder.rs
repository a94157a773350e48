//! Prompt Builder: serializes a master profile and a job description into the
//! tailoring instruction. Pure and deterministic: no clock, no randomness.

use crate::errors::AppError;
use crate::models::profile::{MasterResumeProfile, REQUIRED_CONTENT_FIELDS};
use crate::tailoring::prompts::TAILOR_PROMPT_TEMPLATE;

/// Builds the tailoring prompt.
///
/// Only the resume content is embedded; the stored-resume history never leaves
/// the service. Placeholders are filled in one pass over the template, so
/// placeholder-like text in the profile or the job description stays literal.
pub fn build_prompt(
    profile: &MasterResumeProfile,
    job_description: &str,
) -> Result<String, AppError> {
    let profile_json = serde_json::to_string_pretty(&profile.content)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))?;

    let required_fields = REQUIRED_CONTENT_FIELDS
        .iter()
        .map(|f| format!("\"{f}\""))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(fill_placeholders(
        TAILOR_PROMPT_TEMPLATE,
        &[
            ("{required_fields}", required_fields.as_str()),
            ("{profile_json}", profile_json.as_str()),
            ("{job_description}", job_description),
        ],
    ))
}

/// Substitutes `{name}` placeholders found in `template`. Inserted values are
/// never rescanned.
fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
