//! The static ghost catalog.
//!
//! Plain data, process-lifetime, read-only. Each entry carries its three
//! journal evidences plus the optional markers that bend the deduction rules:
//! a guaranteed evidence is always obtainable regardless of the difficulty
//! limit, and a fake evidence shows up without counting as real.

use crate::evidence::Evidence;
use crate::evidence::Evidence::{
    DotsProjector, EmfLevelFive, FreezingTemperatures, GhostOrb, GhostWriting, SpiritBox,
    Ultraviolet,
};

/// One catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostDefinition {
    /// Display name, unique within the catalog.
    pub name: &'static str,
    /// The three journal evidences.
    pub evidence: [Evidence; 3],
    /// Evidence that is always obtainable, even when the difficulty limit
    /// would otherwise hide it.
    pub guaranteed: Option<Evidence>,
    /// Evidence that appears without counting against the difficulty limit.
    pub fake: Option<Evidence>,
}

impl GhostDefinition {
    /// Whether this ghost's journal entry includes the given evidence.
    #[must_use]
    pub fn has_evidence(&self, evidence: Evidence) -> bool {
        self.evidence.contains(&evidence)
    }
}

const fn ghost(name: &'static str, evidence: [Evidence; 3]) -> GhostDefinition {
    GhostDefinition {
        name,
        evidence,
        guaranteed: None,
        fake: None,
    }
}

const fn guaranteed(
    name: &'static str,
    evidence: [Evidence; 3],
    marker: Evidence,
) -> GhostDefinition {
    GhostDefinition {
        name,
        evidence,
        guaranteed: Some(marker),
        fake: None,
    }
}

const fn faked(name: &'static str, evidence: [Evidence; 3], marker: Evidence) -> GhostDefinition {
    GhostDefinition {
        name,
        evidence,
        guaranteed: None,
        fake: Some(marker),
    }
}

/// The full catalog, in journal order.
pub const GHOSTS: [GhostDefinition; 24] = [
    ghost("Spirit", [EmfLevelFive, SpiritBox, GhostWriting]),
    ghost("Wraith", [EmfLevelFive, SpiritBox, DotsProjector]),
    ghost("Phantom", [SpiritBox, Ultraviolet, DotsProjector]),
    ghost("Poltergeist", [SpiritBox, Ultraviolet, GhostWriting]),
    ghost("Banshee", [Ultraviolet, GhostOrb, DotsProjector]),
    ghost("Jinn", [EmfLevelFive, Ultraviolet, FreezingTemperatures]),
    ghost("Mare", [SpiritBox, GhostOrb, GhostWriting]),
    ghost("Revenant", [GhostOrb, GhostWriting, FreezingTemperatures]),
    ghost("Shade", [EmfLevelFive, GhostWriting, FreezingTemperatures]),
    ghost("Demon", [Ultraviolet, GhostWriting, FreezingTemperatures]),
    ghost("Yurei", [GhostOrb, FreezingTemperatures, DotsProjector]),
    ghost("Oni", [EmfLevelFive, FreezingTemperatures, DotsProjector]),
    ghost("Yokai", [SpiritBox, GhostOrb, DotsProjector]),
    guaranteed(
        "Hantu",
        [Ultraviolet, GhostOrb, FreezingTemperatures],
        FreezingTemperatures,
    ),
    guaranteed(
        "Goryo",
        [EmfLevelFive, Ultraviolet, DotsProjector],
        DotsProjector,
    ),
    ghost("Myling", [EmfLevelFive, Ultraviolet, GhostWriting]),
    ghost("Onryo", [SpiritBox, GhostOrb, FreezingTemperatures]),
    ghost("The Twins", [EmfLevelFive, SpiritBox, FreezingTemperatures]),
    ghost("Raiju", [EmfLevelFive, GhostOrb, DotsProjector]),
    guaranteed(
        "Obake",
        [EmfLevelFive, Ultraviolet, GhostOrb],
        Ultraviolet,
    ),
    faked(
        "The Mimic",
        [SpiritBox, Ultraviolet, FreezingTemperatures],
        GhostOrb,
    ),
    guaranteed(
        "Moroi",
        [SpiritBox, GhostWriting, FreezingTemperatures],
        SpiritBox,
    ),
    guaranteed(
        "Deogen",
        [SpiritBox, GhostWriting, DotsProjector],
        SpiritBox,
    ),
    ghost("Thaye", [GhostOrb, GhostWriting, DotsProjector]),
];

/// Look up a catalog entry by its display name.
#[must_use]
pub fn ghost_by_name(name: &str) -> Option<&'static GhostDefinition> {
    GHOSTS.iter().find(|g| g.name == name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
