// All LLM prompt constants for the Tailoring module.

/// System prompt for resume tailoring. Enforces a single fenced JSON block.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer who tailors an existing \
    resume to a specific job description. \
    You rewrite and reorder wording only; you never invent employers, degrees, dates, \
    or accomplishments that are not in the source resume. \
    You MUST respond with exactly one ```json fenced code block and nothing else — \
    no introduction, no explanation, no closing remarks.";

/// Tailoring prompt template.
/// Replace: {required_fields}, {profile_json}, {job_description}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Tailor the resume below to the job description below.

SOURCE RESUME (JSON — the only source of facts):
```json
{profile_json}
```

JOB DESCRIPTION (verbatim):
<<<JOB_DESCRIPTION
{job_description}
JOB_DESCRIPTION>>>

OUTPUT CONTRACT:
1. Reply with ONE ```json fenced block containing ONE JSON object — no text before or after it.
2. The object MUST contain exactly these top-level keys: {required_fields}.
3. Keep every key and nested field name from the source resume; keep the same value types.
   Lists may be shortened or reordered, and may be empty, but the key must still be present.
4. Rewrite careerSummary, responsibilities, highlights, skills and achievements to emphasise
   what the job description asks for. Use the job's vocabulary where the source supports it.
5. Do NOT add employers, schools, dates, titles, metrics or links that are not in the source.
6. Do NOT include markup (HTML, Markdown) inside string values."#;
