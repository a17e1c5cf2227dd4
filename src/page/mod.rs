//! Organization public page
//!
//! Loads the data behind an organization's public profile in one concurrent
//! batch and derives its view model, page metadata and JSON-LD.

pub mod canonical;
pub mod jsonld;
pub mod loader;
pub mod metadata;
pub mod view;

pub use loader::{PageLoader, PageOutcome};
pub use metadata::PageMetadata;
pub use view::PageView;
