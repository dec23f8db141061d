use propensity_core::{CampaignRecord, LinkedRecord, MortgageRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::util::{levenshtein_ratio, SequenceRatio};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameScorer {
    /// Ratcliff/Obershelp matching-block ratio.
    #[default]
    Sequence,
    /// Normalised Levenshtein similarity.
    Levenshtein,
}

impl std::str::FromStr for NameScorer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequence" => Ok(NameScorer::Sequence),
            "levenshtein" => Ok(NameScorer::Levenshtein),
            other => Err(format!("Unknown name scorer: '{other}'")),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LinkError {
    #[error("{names} target names but {ids} target ids")]
    LengthMismatch { names: usize, ids: usize },
}

/// Greedy nearest-name linkage. Each source name is matched on its own
/// against the full target list; nothing stops two sources landing on the
/// same target.
#[derive(Debug, Clone)]
pub struct RecordLinker {
    pub cutoff: f64,
    pub scorer: NameScorer,
}

impl Default for RecordLinker {
    fn default() -> Self {
        Self {
            cutoff: 0.6,
            scorer: NameScorer::Sequence,
        }
    }
}

impl RecordLinker {
    pub fn new(cutoff: f64, scorer: NameScorer) -> Self {
        Self { cutoff, scorer }
    }

    /// For each source name, the id of the closest target name scoring at
    /// least `cutoff`, or `None`.
    pub fn link<T: Clone>(
        &self,
        source_names: &[impl AsRef<str>],
        target_names: &[impl AsRef<str>],
        target_ids: &[T],
    ) -> Result<Vec<Option<T>>, LinkError> {
        if target_names.len() != target_ids.len() {
            return Err(LinkError::LengthMismatch {
                names: target_names.len(),
                ids: target_ids.len(),
            });
        }
        let targets: Vec<&str> = target_names.iter().map(AsRef::as_ref).collect();

        Ok(source_names
            .iter()
            .map(|name| {
                self.best_match(name.as_ref(), &targets)
                    .map(|(idx, _)| target_ids[idx].clone())
            })
            .collect())
    }

    /// Index of the first target spelled like the best candidate, with its
    /// score. Equal scores go to the lexicographically greatest name.
    pub fn best_match(&self, name: &str, targets: &[&str]) -> Option<(usize, f64)> {
        let best = match self.scorer {
            NameScorer::Sequence => {
                let seq = SequenceRatio::new(name);
                targets
                    .iter()
                    .filter(|t| {
                        seq.real_quick_ratio(t) >= self.cutoff && seq.quick_ratio(t) >= self.cutoff
                    })
                    .map(|t| (seq.ratio(t), *t))
                    .filter(|(score, _)| *score >= self.cutoff)
                    .fold(None, pick_best)
            }
            NameScorer::Levenshtein => targets
                .iter()
                .map(|t| (levenshtein_ratio(name, t), *t))
                .filter(|(score, _)| *score >= self.cutoff)
                .fold(None, pick_best),
        }?;

        let (score, matched) = best;
        let idx = targets.iter().position(|t| *t == matched)?;
        Some((idx, score))
    }

    /// Attaches a participant id to each mortgage row by name.
    pub fn link_mortgage(
        &self,
        campaign: &[CampaignRecord],
        mortgage: Vec<MortgageRecord>,
    ) -> Vec<LinkedRecord> {
        let targets: Vec<&str> = campaign.iter().map(|c| c.full_name.as_str()).collect();

        let linked: Vec<LinkedRecord> = mortgage
            .into_iter()
            .map(|m| {
                let participant_id = self
                    .best_match(&m.full_name, &targets)
                    .map(|(idx, _)| campaign[idx].participant_id.clone());
                if participant_id.is_none() {
                    debug!(name = %m.full_name, "no participant above cutoff");
                }
                LinkedRecord {
                    participant_id,
                    mortgage: m,
                }
            })
            .collect();

        let matched = linked.iter().filter(|l| l.participant_id.is_some()).count();
        let distinct: HashSet<_> = linked.iter().filter_map(|l| l.participant_id.as_ref()).collect();
        info!(
            rows = linked.len(),
            matched,
            shared_ids = matched - distinct.len(),
            "linked mortgage rows to participants"
        );
        linked
    }
}

fn pick_best<'a>(best: Option<(f64, &'a str)>, cand: (f64, &'a str)) -> Option<(f64, &'a str)> {
    match best {
        Some(b) if b.0 > cand.0 || (b.0 == cand.0 && b.1 >= cand.1) => Some(b),
        _ => Some(cand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propensity_core::{CreatedAccount, Gbp, ParticipantId};

    // Campaign spellings
    const CAMPAIGN_NAMES: [&str; 20] = [
        "Mr. Dale Coles",
        "Joel Allen",
        "Mr. Craig Marc Davis",
        "Mr. Brandon Thornton",
        "Miss Brett Carol Fletcher",
        "Dr. Christopher Barker",
        "Ms. Jeremy Ward",
        "Mr. Karl Gavin Cox",
        "Hugh Stacey Armstrong",
        "Mr. Mathew Andrew Fox",
        "Aaron Arthur Griffiths",
        "Carl Brandon Dale",
        "Miss Christian Barton",
        "Dr. Declan Hart",
        "Barry Brown",
        "Mathew Kevin Brown",
        "Mr. Raymond Dylan Nicholson",
        "Mr. Benjamin Bartlett",
        "Bradley Rose",
        "Ross Carr",
    ];

    // The same people as the mortgage table spells them
    const MORTGAGE_NAMES: [&str; 20] = [
        "Mr. Dale Coles",
        "Joel Allen",
        "Mr. Craig Davis",
        "Mr. Brandon Thornton",
        "Miss Brett Fletcher",
        "Dr. Christopher Barker",
        "Ms. Jeremy Ward",
        "Mr. Karl Cox",
        "Mrs. Hugh Armstrong",
        "Mr. Mathew Fox",
        "Aaron Griffiths",
        "Carl Dale",
        "Christian Barton",
        "Declan Hart",
        "Mr. Barry Brown",
        "Mathew Brown",
        "Mr. Raymond Nicholson",
        "Mr. Benjamin Bartlett",
        "Bradley Rose",
        "Ms. Ross Carr",
    ];

    #[test]
    fn links_noisy_names_to_their_participant() {
        let ids: Vec<usize> = (0..CAMPAIGN_NAMES.len()).collect();
        let linked = RecordLinker::default()
            .link(&MORTGAGE_NAMES, &CAMPAIGN_NAMES, &ids)
            .unwrap();
        let expected: Vec<Option<usize>> = ids.iter().copied().map(Some).collect();
        assert_eq!(linked, expected);
    }

    #[test]
    fn exact_names_always_match() {
        let ids = ["a", "b", "c"];
        let names = ["Bradley Rose", "Ross Carr", "Joel Allen"];
        let linked = RecordLinker::default().link(&names, &names, &ids).unwrap();
        assert_eq!(linked, vec![Some("a"), Some("b"), Some("c")]);
    }

    #[test]
    fn empty_name_matches_nothing() {
        let ids: Vec<usize> = (0..CAMPAIGN_NAMES.len()).collect();
        let linked = RecordLinker::default().link(&[""], &CAMPAIGN_NAMES, &ids).unwrap();
        assert_eq!(linked, vec![None]);
    }

    #[test]
    fn unrelated_name_matches_nothing() {
        let ids: Vec<usize> = (0..CAMPAIGN_NAMES.len()).collect();
        let linked = RecordLinker::default()
            .link(&["Zzyzx Qq"], &CAMPAIGN_NAMES, &ids)
            .unwrap();
        assert_eq!(linked, vec![None]);
    }

    #[test]
    fn duplicate_target_names_resolve_to_first() {
        let names = ["Joel Allen", "Ross Carr", "Joel Allen"];
        let linked = RecordLinker::default()
            .link(&["Joel Allen"], &names, &[10, 20, 30])
            .unwrap();
        assert_eq!(linked, vec![Some(10)]);
    }

    #[test]
    fn two_sources_can_share_a_target() {
        let linked = RecordLinker::default()
            .link(&["Ross Carr", "Ms. Ross Carr"], &["Ross Carr", "Joel Allen"], &[1, 2])
            .unwrap();
        assert_eq!(linked, vec![Some(1), Some(1)]);
    }

    #[test]
    fn tied_scores_pick_greatest_name() {
        // "abce" and "abcf" both score 0.75 against "abcd"
        let linked = RecordLinker::default()
            .link(&["abcd"], &["abce", "abcf"], &[1, 2])
            .unwrap();
        assert_eq!(linked, vec![Some(2)]);
    }

    #[test]
    fn cutoff_is_inclusive() {
        let linker = RecordLinker::new(0.75, NameScorer::Sequence);
        assert_eq!(linker.best_match("abcd", &["abce"]), Some((0, 0.75)));
        let strict = RecordLinker::new(0.76, NameScorer::Sequence);
        assert_eq!(strict.best_match("abcd", &["abce"]), None);
    }

    #[test]
    fn levenshtein_scorer() {
        let linker = RecordLinker::new(0.7, NameScorer::Levenshtein);
        let targets = ["Mr. Dale Coles", "Joel Allen"];
        assert_eq!(linker.best_match("Mr. Dale Cole", &targets).map(|m| m.0), Some(0));
        assert_eq!(linker.best_match("Bradley Rose", &targets), None);
    }

    #[test]
    fn mismatched_ids_are_rejected() {
        let result = RecordLinker::default().link(&["x"], &["a", "b"], &[1]);
        assert_eq!(result, Err(LinkError::LengthMismatch { names: 2, ids: 1 }));
    }

    #[test]
    fn scorer_from_str() {
        assert_eq!("Sequence".parse::<NameScorer>(), Ok(NameScorer::Sequence));
        assert_eq!("levenshtein".parse::<NameScorer>(), Ok(NameScorer::Levenshtein));
        assert!("jaro".parse::<NameScorer>().is_err());
    }

    fn participant(id: &str, name: &str) -> CampaignRecord {
        CampaignRecord {
            participant_id: ParticipantId::from(id),
            full_name: name.to_string(),
            age: 30,
            marital_status: None,
            occupation_level: 1,
            education_num: 9,
            familiarity_fb: 1,
            view_fb: 1,
            interested_insurance: 0,
            created_account: CreatedAccount::Raw(None),
        }
    }

    fn mortgage(name: &str) -> MortgageRecord {
        MortgageRecord {
            full_name: name.to_string(),
            salary_band: Gbp::from_f64(20000.0),
            hours_per_week: 40,
            workclass: None,
            total_months_with_employer: 12,
            pays_capital_tax: 0,
        }
    }

    #[test]
    fn link_mortgage_attaches_participant_ids() {
        let campaign = vec![participant("P1", "Mr. Karl Gavin Cox"), participant("P2", "Bradley Rose")];
        let linked = RecordLinker::default().link_mortgage(
            &campaign,
            vec![mortgage("Bradley Rose"), mortgage("Mr. Karl Cox"), mortgage("")],
        );
        assert_eq!(linked[0].participant_id, Some(ParticipantId::from("P2")));
        assert_eq!(linked[1].participant_id, Some(ParticipantId::from("P1")));
        assert_eq!(linked[2].participant_id, None);
        assert_eq!(linked[1].mortgage.full_name, "Mr. Karl Cox");
    }
}
