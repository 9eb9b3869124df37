//! Request handlers.

pub mod analyze;
pub mod health;
pub mod history;
pub mod logs;
pub mod pipelines;
pub mod train;
