//! CLI command implementations.

pub(crate) mod categories;
pub(crate) mod interactive;
pub(crate) mod run;
