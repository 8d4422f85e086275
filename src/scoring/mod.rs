//! Scoring module
//!
//! Two independent scorers share the signals extracted from a page:
//! - Per-agent readiness, summing the weights of the signals an agent's own
//!   fetch met (see [`score_agent`])
//! - The five-category breakdown and the weighted overall score of the
//!   primary fetch (see [`score_categories`])
//!
//! Both are pure functions over immutable tables.

mod agent;
mod categories;
mod profiles;

pub use agent::{meta_description_penalty, score_agent, signal_met};
pub use categories::{
    score_categories, score_category, Category, CategoryCheck, CategoryFacts, CategoryScores,
    CategorySpec, Item, CATEGORIES,
};
pub use profiles::{builtin_profiles, AgentProfile, Signal, WeightTable};
