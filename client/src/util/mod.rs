//! Client-side utilities: browser glue and OAuth callback parsing.

pub mod browser;
pub mod callback;
