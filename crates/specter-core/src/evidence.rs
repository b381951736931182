//! Evidence types and the per-session observation record.
//!
//! [`Evidence`] enumerates the seven observable evidence kinds in journal
//! order. [`EvidenceState`] is the tri-state a single evidence can be in, and
//! [`ObservationSet`] holds one state per evidence plus the difficulty-imposed
//! evidence limit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

/// Lowest difficulty-imposed evidence limit.
pub const MIN_EVIDENCE_LIMIT: u8 = 1;
/// Highest (and default) evidence limit.
pub const MAX_EVIDENCE_LIMIT: u8 = 3;

/// One observable evidence kind.
///
/// Variant order is the canonical journal order; it is also the render order
/// used by session views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    /// EMF reader spiking to level 5.
    EmfLevelFive,
    /// Silhouette visible through a D.O.T.S projector.
    DotsProjector,
    /// Fingerprints / handprints under ultraviolet light.
    Ultraviolet,
    /// Orb drifting through the ghost room on video.
    GhostOrb,
    /// Writing appearing in a placed journal.
    GhostWriting,
    /// Direct responses over the spirit box.
    SpiritBox,
    /// Below-freezing room temperature.
    FreezingTemperatures,
}

impl Evidence {
    /// Number of evidence kinds.
    pub const COUNT: usize = 7;

    /// All evidence kinds in journal order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::EmfLevelFive,
        Self::DotsProjector,
        Self::Ultraviolet,
        Self::GhostOrb,
        Self::GhostWriting,
        Self::SpiritBox,
        Self::FreezingTemperatures,
    ];

    /// Stable index into per-evidence arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name for rendering.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::EmfLevelFive => "EMF Level 5",
            Self::DotsProjector => "D.O.T.S Projector",
            Self::Ultraviolet => "Ultraviolet",
            Self::GhostOrb => "Ghost Orb",
            Self::GhostWriting => "Ghost Writing",
            Self::SpiritBox => "Spirit Box",
            Self::FreezingTemperatures => "Freezing Temperatures",
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmfLevelFive => write!(f, "emf_level_five"),
            Self::DotsProjector => write!(f, "dots_projector"),
            Self::Ultraviolet => write!(f, "ultraviolet"),
            Self::GhostOrb => write!(f, "ghost_orb"),
            Self::GhostWriting => write!(f, "ghost_writing"),
            Self::SpiritBox => write!(f, "spirit_box"),
            Self::FreezingTemperatures => write!(f, "freezing_temperatures"),
        }
    }
}

/// Observation state of a single evidence kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceState {
    /// Confirmed observed.
    Present,
    /// Not yet determined.
    #[default]
    Unknown,
    /// Confirmed ruled out.
    Absent,
}

impl EvidenceState {
    /// Next state in the toggle rotation.
    ///
    /// The rotation is absent → unknown → present → absent. Buttons cycle,
    /// they do not set/clear, so the order is load-bearing: three presses
    /// return an evidence to where it started.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Absent => Self::Unknown,
            Self::Unknown => Self::Present,
            Self::Present => Self::Absent,
        }
    }
}

impl fmt::Display for EvidenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Unknown => write!(f, "unknown"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

/// Per-session observation record: one [`EvidenceState`] per evidence kind
/// plus the evidence limit the difficulty imposes.
///
/// Owned exclusively by one session controller; nothing else mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSet {
    states: [EvidenceState; Evidence::COUNT],
    limit: u8,
}

impl ObservationSet {
    /// Fresh record: every evidence unknown, limit at the default maximum.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: [EvidenceState::Unknown; Evidence::COUNT],
            limit: MAX_EVIDENCE_LIMIT,
        }
    }

    /// Fresh record with an explicit evidence limit.
    pub fn with_limit(limit: u8) -> Result<Self, CoreError> {
        let mut set = Self::new();
        set.set_limit(limit)?;
        Ok(set)
    }

    /// Current state of one evidence kind.
    #[must_use]
    pub fn state(&self, evidence: Evidence) -> EvidenceState {
        self.states[evidence.index()]
    }

    /// Rotate one evidence through the three-state cycle, returning the new
    /// state.
    pub fn toggle(&mut self, evidence: Evidence) -> EvidenceState {
        let next = self.states[evidence.index()].next();
        self.states[evidence.index()] = next;
        next
    }

    /// Current evidence limit.
    #[must_use]
    pub fn limit(&self) -> u8 {
        self.limit
    }

    /// Overwrite the evidence limit.
    ///
    /// Values outside `1..=3` are rejected before any mutation.
    pub fn set_limit(&mut self, limit: u8) -> Result<(), CoreError> {
        if !(MIN_EVIDENCE_LIMIT..=MAX_EVIDENCE_LIMIT).contains(&limit) {
            return Err(CoreError::InvalidEvidenceLimit(limit));
        }
        self.limit = limit;
        Ok(())
    }

    /// Evidence kinds currently observed present, in journal order.
    pub fn present(&self) -> impl Iterator<Item = Evidence> + '_ {
        Evidence::ALL
            .into_iter()
            .filter(|e| self.state(*e) == EvidenceState::Present)
    }

    /// Evidence kinds currently ruled out, in journal order.
    pub fn absent(&self) -> impl Iterator<Item = Evidence> + '_ {
        Evidence::ALL
            .into_iter()
            .filter(|e| self.state(*e) == EvidenceState::Absent)
    }

    /// Whether nothing has been observed yet.
    #[must_use]
    pub fn is_all_unknown(&self) -> bool {
        self.states.iter().all(|s| *s == EvidenceState::Unknown)
    }
}

impl Default for ObservationSet {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
