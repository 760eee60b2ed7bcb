// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stage definitions
//!
//! The remote pipeline reports progress by stage name. The stage set and its
//! order are fixed: the order decides which chips render as completed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the remote modernization pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Auditor,
    Engineer,
    Tester,
    #[serde(alias = "optimiser")]
    Optimizer,
}

impl Stage {
    /// All stages in pipeline order
    pub const ALL: [Stage; 4] = [
        Stage::Auditor,
        Stage::Engineer,
        Stage::Tester,
        Stage::Optimizer,
    ];

    /// The verification stage. Its updates decide the run's outcome.
    ///
    /// The optimizer runs after a failed verification and hands back to the
    /// tester, so the verdict never comes from the last stage in display order.
    pub const VERDICT: Stage = Stage::Tester;

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Auditor => "auditor",
            Stage::Engineer => "engineer",
            Stage::Tester => "tester",
            Stage::Optimizer => "optimizer",
        }
    }

    /// Position in pipeline order
    pub fn index(&self) -> usize {
        match self {
            Stage::Auditor => 0,
            Stage::Engineer => 1,
            Stage::Tester => 2,
            Stage::Optimizer => 3,
        }
    }

    /// Check if this stage settles the run
    pub fn is_verdict(&self) -> bool {
        *self == Stage::VERDICT
    }

    /// Check if this stage comes before `other` in pipeline order
    pub fn precedes(&self, other: Stage) -> bool {
        self.index() < other.index()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
