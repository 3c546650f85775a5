//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, identity, errors)
//! - `report` - Anonymous incident reports and their validation
//! - `community` - Community board posts
//! - `submission` - Submit lifecycle and failure taxonomy shared by forms
//! - `assistant` - Prompt templates and typed results for the AI tools

pub mod assistant;
pub mod community;
pub mod foundation;
pub mod report;
pub mod submission;
