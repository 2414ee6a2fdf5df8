//! Command handlers grouped by view.

pub(crate) mod browse;
pub(crate) mod compare;
pub(crate) mod disciplines;
pub(crate) mod documents;
