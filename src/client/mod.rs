//! Polar API client

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mock;

pub mod api;
pub mod models;
pub mod params;
pub mod polar;
pub mod rate_limit;
pub mod resource;
pub mod transport;

pub use api::{
    ArticlesApi, FundingApi, IntegrationsApi, OrganizationsApi, RepositoriesApi,
    SubscriptionsApi, UsersApi,
};
#[cfg(test)]
pub use mock::MockPolarClient;
pub use params::{ArticleSearch, FundingSearch, OrgScope};
pub use polar::PolarClient;
pub use transport::ClientConfig;

/// Every typed resource group, combined.
///
/// Implemented automatically for any type implementing all the sub-traits.
pub trait PolarApi:
    OrganizationsApi
    + ArticlesApi
    + SubscriptionsApi
    + RepositoriesApi
    + FundingApi
    + IntegrationsApi
    + UsersApi
{
}

impl<T> PolarApi for T where
    T: OrganizationsApi
        + ArticlesApi
        + SubscriptionsApi
        + RepositoriesApi
        + FundingApi
        + IntegrationsApi
        + UsersApi
{
}
