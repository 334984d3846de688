//! Task-context assembly: token estimation, budget tiers, role scoping and
//! the ranked context builder.

pub mod budget;
pub mod builder;
pub mod estimator;
pub mod scope;

pub use budget::{check_budget, BudgetConfig, BudgetTier};
pub use builder::{
    build_task_context, CompactSignature, ContextFile, ContextOptions, ContextStats, TaskContext,
    DEFAULT_TOKEN_BUDGET,
};
pub use estimator::{default_estimator, estimate_json, CharEstimator, HeuristicEstimator, TokenEstimator};
pub use scope::{scope_result, ScopedResult};
