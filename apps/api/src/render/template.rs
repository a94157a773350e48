//! Document Renderer: binds a tailored resume into the fixed HTML layout.
//!
//! The template is registered under a `.html` name so tera autoescapes every
//! interpolated value. Model output is untrusted; nothing in this file may
//! use the `safe` filter.

use tera::{Context, Tera};

use crate::models::profile::ResumeContent;
use crate::render::RenderError;

const TEMPLATE_NAME: &str = "resume.html";

/// A4 page with 12mm margins; `print-color-adjust: exact` keeps the header
/// band and section rules when printed.
const RESUME_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ personalInfo.name }} — Resume</title>
<style>
  @page { size: A4; margin: 12mm; }
  * { box-sizing: border-box; -webkit-print-color-adjust: exact; print-color-adjust: exact; }
  body { margin: 0; font-family: "Inter", "Helvetica Neue", Arial, sans-serif; font-size: 10.5pt; color: #1f2933; line-height: 1.4; }
  header { background: #1e3a5f; color: #ffffff; padding: 14px 18px; border-radius: 4px; }
  header h1 { margin: 0 0 4px 0; font-size: 20pt; letter-spacing: 0.5px; }
  header .contact { font-size: 9pt; }
  header .contact span + span::before { content: " · "; }
  section { margin-top: 12px; page-break-inside: avoid; }
  section h2 { font-size: 11.5pt; text-transform: uppercase; color: #1e3a5f; border-bottom: 2px solid #c7d2e0; padding-bottom: 2px; margin: 0 0 6px 0; }
  .entry { margin-bottom: 8px; }
  .entry .heading { display: flex; justify-content: space-between; font-weight: 600; }
  .entry .sub { font-style: italic; color: #52606d; }
  ul { margin: 4px 0 0 18px; padding: 0; }
  .tags span { display: inline-block; background: #e4ebf5; border-radius: 3px; padding: 1px 6px; margin: 0 4px 4px 0; font-size: 9pt; }
</style>
</head>
<body>
<header>
  <h1>{{ personalInfo.name }}</h1>
  <div class="contact">
    {%- if personalInfo.email %}<span>{{ personalInfo.email }}</span>{% endif -%}
    {%- if personalInfo.phone %}<span>{{ personalInfo.phone }}</span>{% endif -%}
    {%- if personalInfo.location %}<span>{{ personalInfo.location }}</span>{% endif -%}
    {%- if personalInfo.linkedin %}<span>{{ personalInfo.linkedin }}</span>{% endif -%}
    {%- if personalInfo.github %}<span>{{ personalInfo.github }}</span>{% endif -%}
    {%- if personalInfo.website %}<span>{{ personalInfo.website }}</span>{% endif -%}
  </div>
</header>
{% if careerSummary %}
<section class="summary">
  <h2>Summary</h2>
  <p>{{ careerSummary }}</p>
</section>
{% endif %}
{% if workExperience | length > 0 %}
<section class="experience">
  <h2>Experience</h2>
  {% for job in workExperience %}
  <div class="entry">
    <div class="heading"><span>{{ job.role }}{% if job.company %} — {{ job.company }}{% endif %}</span><span>{{ job.startDate }}{% if job.endDate %} – {{ job.endDate }}{% endif %}</span></div>
    {% if job.location %}<div class="sub">{{ job.location }}</div>{% endif %}
    {% if job.responsibilities | length > 0 %}
    <ul>{% for item in job.responsibilities %}<li>{{ item }}</li>{% endfor %}</ul>
    {% endif %}
  </div>
  {% endfor %}
</section>
{% endif %}
{% if education | length > 0 %}
<section class="education">
  <h2>Education</h2>
  {% for school in education %}
  <div class="entry">
    <div class="heading"><span>{{ school.institution }}</span><span>{{ school.startDate }}{% if school.endDate %} – {{ school.endDate }}{% endif %}</span></div>
    <div class="sub">{{ school.degree }}{% if school.fieldOfStudy %}, {{ school.fieldOfStudy }}{% endif %}{% if school.location %} · {{ school.location }}{% endif %}</div>
    {% if school.highlights | length > 0 %}
    <ul>{% for item in school.highlights %}<li>{{ item }}</li>{% endfor %}</ul>
    {% endif %}
  </div>
  {% endfor %}
</section>
{% endif %}
{% if skills | length > 0 %}
<section class="skills">
  <h2>Skills</h2>
  <div class="tags">{% for skill in skills %}<span>{{ skill }}</span>{% endfor %}</div>
</section>
{% endif %}
{% if achievements | length > 0 %}
<section class="achievements">
  <h2>Achievements</h2>
  <ul>{% for item in achievements %}<li>{{ item }}</li>{% endfor %}</ul>
</section>
{% endif %}
{% if volunteer | length > 0 %}
<section class="volunteer">
  <h2>Volunteer</h2>
  <ul>{% for item in volunteer %}<li>{{ item }}</li>{% endfor %}</ul>
</section>
{% endif %}
</body>
</html>
"#;

/// Holds the parsed layout template. Built once at startup and shared.
pub struct ResumeRenderer {
    tera: Tera,
}

impl ResumeRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, RESUME_TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Renders the tailored resume to a standalone HTML document.
    pub fn render(&self, content: &ResumeContent) -> Result<String, RenderError> {
        let context = Context::from_serialize(content)?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_profile;

    fn render(content: &ResumeContent) -> String {
        ResumeRenderer::new().unwrap().render(content).unwrap()
    }

    #[test]
    fn test_renders_all_populated_sections() {
        let profile = sample_profile(0);
        let html = render(&profile.content);

        assert!(html.contains(&profile.content.personal_info.name));
        for class in [
            "summary",
            "experience",
            "education",
            "skills",
            "achievements",
            "volunteer",
        ] {
            assert!(
                html.contains(&format!("<section class=\"{class}\">")),
                "missing section {class}"
            );
        }
    }

    #[test]
    fn test_empty_lists_omit_their_sections() {
        let mut content = sample_profile(0).content;
        content.skills.clear();
        content.volunteer.clear();
        content.education.clear();

        let html = render(&content);
        assert!(!html.contains("<section class=\"skills\">"));
        assert!(!html.contains("<section class=\"volunteer\">"));
        assert!(!html.contains("<section class=\"education\">"));
        assert!(html.contains("<section class=\"experience\">"));
    }

    #[test]
    fn test_markup_in_fields_is_escaped() {
        let mut content = sample_profile(0).content;
        content.personal_info.name = "<script>alert('x')</script>".to_string();
        content.skills = vec!["<b>Rust</b> & \"Go\"".to_string()];
        content.work_experience[0].responsibilities =
            vec!["<img src=x onerror=alert(1)>".to_string()];

        let html = render(&content);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>Rust</b>"));
        assert!(!html.contains("<img src=x"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;b&gt;Rust&lt;"));
        assert!(html.contains("&amp;"));
        assert!(html.contains("&lt;img"));
    }

    #[test]
    fn test_document_carries_print_layout() {
        let html = render(&sample_profile(0).content);
        assert!(html.contains("@page { size: A4; margin: 12mm; }"));
        assert!(html.contains("print-color-adjust: exact"));
    }

    #[test]
    fn test_missing_contact_fields_render_nothing() {
        let mut content = sample_profile(0).content;
        content.personal_info.phone.clear();
        content.personal_info.website.clear();
        let html = render(&content);
        assert!(html.contains(&content.personal_info.email));
        assert!(!html.contains("<span></span>"));
    }
}
