//! HTTP request handlers, grouped by resource.

pub mod brainstorm;
pub mod history;
