//! Candidate elimination rules.
//!
//! A ghost survives when every observed-present real evidence is one it can
//! produce, the counts fit inside the difficulty's evidence limit, and its
//! guaranteed/fake markers are not contradicted. Fake evidence is the one
//! wrinkle: it renders like any other observation but never counts as real.

use specter_core::catalog::GhostDefinition;
use specter_core::evidence::{Evidence, EvidenceState, MAX_EVIDENCE_LIMIT, ObservationSet};
use tracing::debug;

/// Whether a single catalog entry is still consistent with the observations.
#[must_use]
pub fn is_possible(ghost: &GhostDefinition, observation: &ObservationSet) -> bool {
    let limit = usize::from(observation.limit());

    // Observed-present evidence that counts as real for this ghost. Its fake
    // evidence is excluded even though it renders as a normal observation.
    let present_real: Vec<Evidence> = observation
        .present()
        .filter(|e| ghost.fake != Some(*e))
        .collect();

    // A real observation the ghost cannot produce rules it out.
    if present_real.iter().any(|e| !ghost.has_evidence(*e)) {
        return false;
    }

    // More real evidence observed than the difficulty can ever reveal.
    if present_real.len() > limit {
        return false;
    }

    // The limit structurally hides (3 - limit) of the journal evidences.
    // Ruling out more of them than that leaves the ghost unexplainable.
    let hidden = usize::from(MAX_EVIDENCE_LIMIT) - limit;
    let absent_journal = ghost
        .evidence
        .iter()
        .filter(|e| observation.state(**e) == EvidenceState::Absent)
        .count();
    if absent_journal > hidden {
        return false;
    }

    // A guaranteed evidence must be observed present or still obtainable.
    if let Some(marker) = ghost.guaranteed {
        match observation.state(marker) {
            EvidenceState::Absent => return false,
            EvidenceState::Present => {}
            EvidenceState::Unknown => {
                let remaining_capacity = limit - present_real.len();
                if remaining_capacity < 1 {
                    return false;
                }
            }
        }
    }

    // A fake evidence is mandatory; observing it absent is contradictory.
    if let Some(marker) = ghost.fake {
        if observation.state(marker) == EvidenceState::Absent {
            return false;
        }
    }

    true
}

/// Names of the catalog entries still consistent with the observations, in
/// catalog order.
#[must_use]
pub fn possible_ghosts<'a>(
    observation: &ObservationSet,
    catalog: &'a [GhostDefinition],
) -> Vec<&'a str> {
    let survivors: Vec<&str> = catalog
        .iter()
        .filter(|g| is_possible(g, observation))
        .map(|g| g.name)
        .collect();
    debug!(
        candidates = survivors.len(),
        catalog = catalog.len(),
        limit = observation.limit(),
        "deduction pass"
    );
    survivors
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
