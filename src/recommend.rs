//! Static lookup of the next recommended action per (phase, project level).
//!
//! Levels 0-4 classify project complexity; low levels skip ceremony that only
//! pays off at scale. Pairs outside the table fall back to a generic line.
use crate::phase::Phase;

pub const FALLBACK_RECOMMENDATION: &str = "Continue with current phase.";

/// Next-step suggestion for a project at `level` working through `phase`.
pub fn recommendation(phase: Phase, level: u32) -> &'static str {
    match (phase, level) {
        (Phase::Analysis, 0) => "Skip remaining analysis and go straight to planning",
        (Phase::Analysis, 1) => "Write a short product brief, then move to planning",
        (Phase::Analysis, 2) => {
            "Write the product brief and a research summary, then move to planning"
        }
        (Phase::Analysis, 3 | 4) => {
            "Complete brainstorming, research, and the product brief before planning"
        }
        (Phase::Planning, 0) => "Write a minimal tech spec and jump to implementation",
        (Phase::Planning, 1) => "Write a lean PRD with a single epic, then move to solutioning",
        (Phase::Planning, 2) => "Write the PRD with epics and stories, then move to solutioning",
        (Phase::Planning, 3 | 4) => {
            "Write the full PRD with epics, stories, and UX notes, then move to solutioning"
        }
        (Phase::Solutioning, 0 | 1) => {
            "Solutioning is optional at this level; proceed to implementation"
        }
        (Phase::Solutioning, 2..=4) => {
            "Write the architecture document and per-epic tech specs"
        }
        (Phase::Implementation, 0..=4) => "Draft the next backlog story and implement it",
        _ => FALLBACK_RECOMMENDATION,
    }
}
