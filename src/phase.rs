//! The four fixed workflow phases and their document markers.
use crate::error::TrackError;
use std::fmt;
use std::str::FromStr;

/// A workflow phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Analysis,
    Planning,
    Solutioning,
    Implementation,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Analysis => "Analysis",
            Phase::Planning => "Planning",
            Phase::Solutioning => "Solutioning",
            Phase::Implementation => "Implementation",
        }
    }

    /// 1-based position used in the narrative document's block headings.
    pub fn number(self) -> u8 {
        match self {
            Phase::Analysis => 1,
            Phase::Planning => 2,
            Phase::Solutioning => 3,
            Phase::Implementation => 4,
        }
    }

    /// The `### Phase N: <name>` heading that opens this phase's block.
    pub fn block_heading(self) -> String {
        format!("### Phase {}: {}", self.number(), self.label())
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analysis" => Ok(Phase::Analysis),
            "planning" => Ok(Phase::Planning),
            "solutioning" => Ok(Phase::Solutioning),
            "implementation" => Ok(Phase::Implementation),
            other => Err(TrackError::InvalidArgument(format!(
                "unknown phase: {other}"
            ))),
        }
    }
}
