use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Vaga (job opening) as persisted by the job store.
///
/// Every known field is optional; anything the intake form sends beyond the
/// known keys survives in `extra` so exports round-trip byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub professional_level: Option<String>,
    pub academic_level: Option<String>,
    pub main_activities: Option<String>,
    pub competencies: Option<String>,
    pub activity_area: Option<String>,
    pub contract_type: Option<String>,
    pub english_level: Option<String>,
    pub spanish_level: Option<String>,
    pub other_language: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub work_location: Option<String>,
    pub notes: Option<String>,
    pub client: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Candidate profile. The CV is the main matching signal; the structured
/// sub-sections refine it and feed the display columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateRecord {
    pub id: Option<String>,
    pub cv_text: Option<String>,
    pub basic_info: Option<BasicInfo>,
    pub professional_info: Option<ProfessionalInfo>,
    pub education: Option<Education>,
    pub personal_info: Option<PersonalInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub professional_objective: Option<String>,
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessionalInfo {
    pub professional_title: Option<String>,
    pub activity_area: Option<String>,
    pub technical_knowledge: Option<String>,
    pub certifications: Option<String>,
    pub qualifications: Option<String>,
    pub experiences: Option<Vec<ExperienceEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Experience entries arrive either structured or as a bare sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExperienceEntry {
    Structured(Experience),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub role: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub academic_level: Option<String>,
    pub institution: Option<String>,
    pub courses: Option<String>,
    pub english_level: Option<String>,
    pub spanish_level: Option<String>,
    pub other_language: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub linkedin_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Prospect: one logged candidate-vaga interaction with its outcome status.
/// The log is append-only; a candidate accumulates one row per process they
/// ever entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProspectRecord {
    pub candidate_id: String,
    pub job_id: Option<String>,
    pub candidate_name: Option<String>,
    pub job_title: Option<String>,
    pub status: Option<String>,
    pub comment: Option<String>,
    pub registered_at: Option<DateTime<Utc>>,
}
