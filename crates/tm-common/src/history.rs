//! Pontuação de histórico: a bounded engagement score derived from a
//! candidate's prospect log.
//!
//! The status table is closed; statuses the pipeline has never seen fall
//! into `Outros` (0 points) rather than failing the ranking.

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString};

use crate::schema::ProspectRecord;

pub const HISTORY_RAW_MIN: f64 = -10.0;
pub const HISTORY_RAW_MAX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum ProspectStatus {
    #[strum(serialize = "Contratado")]
    Contratado,
    #[strum(serialize = "Encaminhado ao Requisitante")]
    EncaminhadoAoRequisitante,
    #[strum(serialize = "Entrevista com Cliente")]
    EntrevistaComCliente,
    #[strum(serialize = "Em Negociação")]
    EmNegociacao,
    #[strum(serialize = "Em Andamento")]
    EmAndamento,
    #[strum(serialize = "Aguardando Contato")]
    AguardandoContato,
    #[strum(serialize = "Em avaliação pelo RH")]
    EmAvaliacaoPeloRh,
    #[strum(serialize = "Desistiu")]
    Desistiu,
    #[strum(serialize = "Rejeitado")]
    Rejeitado,
    #[strum(serialize = "Não Atende aos Requisitos")]
    NaoAtendeAosRequisitos,
    #[strum(serialize = "Outros")]
    Outros,
}

impl ProspectStatus {
    /// Parse the stored label; anything unmapped is `Outros`.
    pub fn from_label(label: &str) -> Self {
        Self::from_str(label.trim()).unwrap_or(Self::Outros)
    }

    pub fn points(self) -> f64 {
        match self {
            Self::Contratado => 10.0,
            Self::EncaminhadoAoRequisitante => 8.0,
            Self::EntrevistaComCliente => 7.0,
            Self::EmNegociacao => 6.0,
            Self::EmAndamento => 3.0,
            Self::AguardandoContato => 2.0,
            Self::EmAvaliacaoPeloRh => -1.0,
            Self::Desistiu => -5.0,
            Self::Rejeitado => -8.0,
            Self::NaoAtendeAosRequisitos => -10.0,
            Self::Outros => 0.0,
        }
    }
}

/// Mean of the status points over every prospect row whose candidate id
/// matches (string comparison), or 0 when the candidate has no history.
/// Always within [`HISTORY_RAW_MIN`, `HISTORY_RAW_MAX`].
pub fn history_score(candidate_id: &str, prospects: &[ProspectRecord]) -> f64 {
    let points: Vec<f64> = prospects
        .iter()
        .filter(|p| p.candidate_id == candidate_id)
        .map(|p| ProspectStatus::from_label(p.status.as_deref().unwrap_or_default()).points())
        .collect();

    if points.is_empty() {
        return 0.0;
    }
    points.iter().sum::<f64>() / points.len() as f64
}

/// Linear rescale of the raw score from [−10, +10] onto [0, 100]. A
/// candidate without history (raw 0) lands exactly on the neutral 50.
pub fn normalize_history_score(raw: f64) -> f64 {
    (raw - HISTORY_RAW_MIN) / (HISTORY_RAW_MAX - HISTORY_RAW_MIN) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn prospect(candidate_id: &str, status: &str) -> ProspectRecord {
        ProspectRecord {
            candidate_id: candidate_id.into(),
            status: Some(status.into()),
            ..ProspectRecord::default()
        }
    }

    #[test]
    fn labels_round_trip_through_strum() {
        assert_eq!(
            ProspectStatus::from_label("Encaminhado ao Requisitante"),
            ProspectStatus::EncaminhadoAoRequisitante
        );
        assert_eq!(
            ProspectStatus::EncaminhadoAoRequisitante.to_string(),
            "Encaminhado ao Requisitante"
        );
    }

    #[test]
    fn unknown_and_missing_statuses_fall_into_outros() {
        assert_eq!(ProspectStatus::from_label("Sumiu do mapa"), ProspectStatus::Outros);
        assert_eq!(ProspectStatus::from_label(""), ProspectStatus::Outros);
    }

    #[test]
    fn every_status_stays_inside_the_raw_bounds() {
        for status in ProspectStatus::iter() {
            let p = status.points();
            assert!((HISTORY_RAW_MIN..=HISTORY_RAW_MAX).contains(&p), "{status}: {p}");
        }
    }

    #[test]
    fn score_is_the_mean_over_matching_rows_only() {
        let log = vec![
            prospect("10001", "Contratado"),
            prospect("10001", "Rejeitado"),
            prospect("10002", "Desistiu"),
        ];

        // (10 + -8) / 2
        assert_eq!(history_score("10001", &log), 1.0);
        assert_eq!(history_score("10002", &log), -5.0);
    }

    #[test]
    fn no_history_scores_zero_raw_and_neutral_normalized() {
        assert_eq!(history_score("99999", &[]), 0.0);
        assert_eq!(normalize_history_score(0.0), 50.0);
    }

    #[test]
    fn normalization_maps_the_raw_bounds_onto_0_and_100() {
        assert_eq!(normalize_history_score(HISTORY_RAW_MIN), 0.0);
        assert_eq!(normalize_history_score(HISTORY_RAW_MAX), 100.0);
        // Contratado + Rejeitado average to 1.0 raw, i.e. 55 on the 0-100 scale.
        assert!((normalize_history_score(1.0) - 55.0).abs() < 1e-9);
    }
}
