//! API trait definitions split by resource group
//!
//! Each trait covers the typed operations of one Polar resource group:
//! - [`OrganizationsApi`] - lookup, listing, settings and credits
//! - [`ArticlesApi`] - post search
//! - [`SubscriptionsApi`] - tiers and subscriber summaries
//! - [`RepositoriesApi`] - repository search
//! - [`FundingApi`] - issue funding search
//! - [`IntegrationsApi`] - platform integration actions
//! - [`UsersApi`] - the authenticated user
//!
//! The [`PolarApi`](super::PolarApi) super-trait combines them all.

mod articles;
mod funding;
mod integrations;
mod organizations;
mod repositories;
mod subscriptions;
mod users;

pub use articles::ArticlesApi;
pub use funding::FundingApi;
pub use integrations::IntegrationsApi;
pub use organizations::OrganizationsApi;
pub use repositories::RepositoriesApi;
pub use subscriptions::SubscriptionsApi;
pub use users::UsersApi;
