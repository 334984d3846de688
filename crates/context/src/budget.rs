//! Context-window budget classification.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct BudgetConfig {
    /// Total context window in tokens.
    pub context_window: usize,
    /// Target share of the window, as a percentage.
    pub target_pct: u8,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            context_window: 100_000,
            target_pct: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Ok,
    AboveTarget,
    High,
    Critical,
}

/// Classify a token count against the window: above 80% is critical, above
/// 60% high, above the configured target merely flagged.
pub fn check_budget(tokens: usize, config: &BudgetConfig) -> BudgetTier {
    if config.context_window == 0 {
        return BudgetTier::Critical;
    }
    let pct = tokens * 100 / config.context_window;
    if pct > 80 {
        BudgetTier::Critical
    } else if pct > 60 {
        BudgetTier::High
    } else if pct > config.target_pct as usize {
        BudgetTier::AboveTarget
    } else {
        BudgetTier::Ok
    }
}
