//! Cached reads and mutations, one module per resource area

pub mod org;
