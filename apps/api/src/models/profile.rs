use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Top-level keys every resume payload must carry, in template order.
pub const REQUIRED_CONTENT_FIELDS: [&str; 7] = [
    "personalInfo",
    "careerSummary",
    "education",
    "workExperience",
    "skills",
    "achievements",
    "volunteer",
];

/// Contact block. Only the profile links may be omitted; every other key must
/// be present, and `name` must be non-blank (checked at extraction).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceEntry {
    pub company: String,
    pub role: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub responsibilities: Vec<String>,
}

/// The resume body shared by the master profile and every tailored variant.
///
/// Every key is required, at every level, apart from the optional links and
/// highlights on the nested records. No data is filled in for a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeContent {
    pub personal_info: PersonalInfo,
    pub career_summary: String,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<WorkExperienceEntry>,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
    pub volunteer: Vec<String>,
}

/// One generated artifact in a profile's history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResume {
    pub name: String,
    pub link: String,
}

impl StoredResume {
    /// Builds the history entry for the given 1-based position: "Resume N".
    pub fn numbered(position: usize, link: impl Into<String>) -> Self {
        Self {
            name: format!("Resume {position}"),
            link: link.into(),
        }
    }
}

/// A user's canonical resume plus the history of tailored artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterResumeProfile {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub content: ResumeContent,
    pub stored_resumes: Vec<StoredResume>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MasterProfileRow {
    pub user_id: Uuid,
    pub personal_info: Json<PersonalInfo>,
    pub career_summary: String,
    pub education: Json<Vec<EducationEntry>>,
    pub work_experience: Json<Vec<WorkExperienceEntry>>,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
    pub volunteer: Vec<String>,
    pub stored_resumes: Json<Vec<StoredResume>>,
    #[allow(dead_code)]
    pub created_at: DateTime<Utc>,
    #[allow(dead_code)]
    pub updated_at: DateTime<Utc>,
}

impl From<MasterProfileRow> for MasterResumeProfile {
    fn from(row: MasterProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            content: ResumeContent {
                personal_info: row.personal_info.0,
                career_summary: row.career_summary,
                education: row.education.0,
                work_experience: row.work_experience.0,
                skills: row.skills,
                achievements: row.achievements,
                volunteer: row.volunteer,
            },
            stored_resumes: row.stored_resumes.0,
        }
    }
}
