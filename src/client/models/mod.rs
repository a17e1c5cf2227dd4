//! Polar API data models
//!
//! Domain types returned by the Polar API, organized by resource group.

mod article;
mod funding;
mod list;
mod org;
mod platform;
mod repo;
mod subscription;
mod user;

pub use article::Article;
pub use funding::{IssueFunding, ListFundingSortBy};
pub use list::ListResource;
pub use org::{
    CreditBalance, CurrencyAmount, Organization, OrganizationBadgeSettingsRead,
    OrganizationBadgeSettingsUpdate, OrganizationMember, OrganizationUpdate,
};
pub use platform::Platforms;
pub use repo::Repository;
pub use subscription::{SubscriptionSummary, SubscriptionTier};
pub use user::UserRead;

// Nested types only the test fixtures build directly
#[cfg(test)]
pub use funding::Issue;
#[cfg(test)]
pub use subscription::SubscriptionSummaryUser;
