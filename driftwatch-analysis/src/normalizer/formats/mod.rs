//! Per-dialect raw step extraction.
//!
//! Each module pulls the step-shaped values out of one vendor dialect and
//! returns them as raw JSON; `fields::normalize_step` does the rest. A
//! dialect module returns `None` when its expected shape is absent, and the
//! caller falls back to the recursive generic search.

pub mod azure;
pub mod circleci;
pub mod generic;
pub mod github;
pub mod gitlab;
pub mod jenkins;
pub mod standard;
