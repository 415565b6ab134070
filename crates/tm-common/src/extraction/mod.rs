//! Projection of structured records into the single text blob fed to the
//! embedding model.
//!
//! Field order is fixed per kind and only non-empty fields contribute, so the
//! output is deterministic for identical input. The labels stay in
//! Portuguese: the corpus is Portuguese and the embedding model is
//! multilingual, so the labels act as lightweight section markers.

use crate::normalize::{collapse_whitespace, is_absent_level, non_blank};
use crate::schema::{CandidateRecord, ExperienceEntry, JobRecord, ProspectRecord};

fn push_labeled(parts: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(v) = non_blank(value) {
        parts.push(format!("{label}: {v}"));
    }
}

fn push_level(parts: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(v) = non_blank(value) {
        if !is_absent_level(v) {
            parts.push(format!("{label}: {v}"));
        }
    }
}

fn finish(parts: Vec<String>) -> Option<String> {
    let joined = collapse_whitespace(&parts.join(" "));
    if joined.is_empty() { None } else { Some(joined) }
}

/// Matching text for a vaga. `None` when no relevant field carries text,
/// which callers must treat as "not indexable", not as an error.
pub fn job_text(job: &JobRecord) -> Option<String> {
    let mut parts = Vec::new();

    push_labeled(&mut parts, "Vaga", job.title.as_deref());
    push_labeled(&mut parts, "Nível Profissional", job.professional_level.as_deref());
    push_labeled(&mut parts, "Nível Acadêmico", job.academic_level.as_deref());
    push_labeled(&mut parts, "Atividades Principais", job.main_activities.as_deref());
    push_labeled(
        &mut parts,
        "Competências Técnicas e Comportamentais",
        job.competencies.as_deref(),
    );
    push_labeled(&mut parts, "Área de Atuação", job.activity_area.as_deref());
    push_labeled(&mut parts, "Tipo de Contratação", job.contract_type.as_deref());
    push_level(&mut parts, "Inglês Requerido", job.english_level.as_deref());
    push_level(&mut parts, "Espanhol Requerido", job.spanish_level.as_deref());
    push_level(&mut parts, "Outro Idioma Requerido", job.other_language.as_deref());

    let location: Vec<&str> = [job.city.as_deref(), job.state.as_deref()]
        .into_iter()
        .flat_map(non_blank)
        .collect();
    if !location.is_empty() {
        parts.push(format!("Localização da Vaga: {}", location.join(", ")));
    }

    push_labeled(&mut parts, "Local de Trabalho", job.work_location.as_deref());
    push_labeled(&mut parts, "Observações da Vaga", job.notes.as_deref());
    push_labeled(&mut parts, "Cliente", job.client.as_deref());

    finish(parts)
}

/// Matching text for a candidate. The raw CV leads; the structured sections
/// follow in a fixed order.
pub fn candidate_text(candidate: &CandidateRecord) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(cv) = non_blank(candidate.cv_text.as_deref()) {
        parts.push(cv.to_string());
    }

    if let Some(basic) = &candidate.basic_info {
        push_labeled(
            &mut parts,
            "Objetivo Profissional",
            basic.professional_objective.as_deref(),
        );
    }

    if let Some(prof) = &candidate.professional_info {
        push_labeled(&mut parts, "Título Profissional", prof.professional_title.as_deref());
        push_labeled(&mut parts, "Área de Atuação", prof.activity_area.as_deref());
        push_labeled(&mut parts, "Conhecimentos Técnicos", prof.technical_knowledge.as_deref());
        push_labeled(&mut parts, "Certificações", prof.certifications.as_deref());
        push_labeled(&mut parts, "Qualificações", prof.qualifications.as_deref());

        for entry in prof.experiences.as_deref().unwrap_or_default() {
            match entry {
                ExperienceEntry::Structured(exp) => {
                    let mut fragment = Vec::new();
                    push_labeled(&mut fragment, "Cargo", exp.role.as_deref());
                    push_labeled(&mut fragment, "Empresa", exp.company.as_deref());
                    push_labeled(&mut fragment, "Descrição", exp.description.as_deref());
                    if !fragment.is_empty() {
                        parts.push(format!("Experiência: {}", fragment.join(", ")));
                    }
                }
                ExperienceEntry::Text(text) => {
                    if let Some(t) = non_blank(Some(text)) {
                        parts.push(format!("Experiência: {t}"));
                    }
                }
            }
        }
    }

    if let Some(education) = &candidate.education {
        push_labeled(&mut parts, "Nível Acadêmico", education.academic_level.as_deref());
        push_labeled(
            &mut parts,
            "Instituição de Ensino Superior",
            education.institution.as_deref(),
        );
        push_labeled(&mut parts, "Cursos", education.courses.as_deref());
        push_level(&mut parts, "Nível de Inglês", education.english_level.as_deref());
        push_level(&mut parts, "Nível de Espanhol", education.spanish_level.as_deref());
        push_level(&mut parts, "Outro Idioma", education.other_language.as_deref());
    }

    if let Some(personal) = &candidate.personal_info {
        push_labeled(&mut parts, "LinkedIn", personal.linkedin_url.as_deref());
    }

    finish(parts)
}

/// Matching text for a prospect row. Unlabeled: the fields are short and the
/// prospect index is a secondary artifact.
pub fn prospect_text(prospect: &ProspectRecord) -> Option<String> {
    let parts: Vec<String> = [
        prospect.job_title.as_deref(),
        prospect.candidate_name.as_deref(),
        prospect.status.as_deref(),
        prospect.comment.as_deref(),
    ]
    .into_iter()
    .flat_map(non_blank)
    .map(str::to_string)
    .collect();

    finish(parts)
}
