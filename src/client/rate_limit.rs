//! Per-resource rate limiting for the Polar API
//!
//! Implements reactive rate limiting that only activates after receiving a 429.
//! Each resource group is throttled independently so that one busy group does
//! not slow down the others.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;

use super::resource::Resource;

/// Sustained request rate once a resource group has been throttled.
pub const THROTTLED_REQUESTS_PER_SECOND: u32 = 5;

/// Rate limiter state for a single resource group.
pub struct ResourceRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    active: AtomicBool,
    resource: Resource,
}

impl ResourceRateLimiter {
    pub fn new(resource: Resource) -> Self {
        let per_second =
            NonZeroU32::new(THROTTLED_REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
            active: AtomicBool::new(false),
            resource,
        }
    }

    /// Activate rate limiting for this resource group.
    pub fn activate(&self) {
        let was_active = self.active.swap(true, Ordering::SeqCst);
        if !was_active {
            debug!("Rate limiting activated for {}", self.resource);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait for permission if rate limiting is active.
    pub async fn wait_if_active(&self) {
        if self.is_active() {
            debug!("Waiting for rate limiter {}", self.resource);
            self.limiter.until_ready().await;
        }
    }
}

/// Rate limiters for every resource group.
pub struct RateLimiterSet {
    limiters: HashMap<Resource, ResourceRateLimiter>,
}

impl Default for RateLimiterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiterSet {
    pub fn new() -> Self {
        let limiters = Resource::ALL
            .iter()
            .map(|r| (*r, ResourceRateLimiter::new(*r)))
            .collect();

        Self { limiters }
    }

    /// Wait for rate limit permission for a resource group (if active).
    pub async fn wait_for(&self, resource: Resource) {
        if let Some(limiter) = self.limiters.get(&resource) {
            limiter.wait_if_active().await;
        }
    }

    /// Activate rate limiting for a resource group (called on 429).
    pub fn activate(&self, resource: Resource) {
        if let Some(limiter) = self.limiters.get(&resource) {
            limiter.activate();
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_activation_is_idempotent() {
        let limiter = ResourceRateLimiter::new(Resource::Funding);
        assert!(!limiter.is_active());

        limiter.activate();
        assert!(limiter.is_active());

        limiter.activate();
        assert!(limiter.is_active());
    }

    #[test]
    fn test_set_covers_every_resource() {
        let set = RateLimiterSet::new();
        for resource in Resource::ALL {
            assert!(set.limiters.contains_key(&resource));
        }
    }

    #[test]
    fn test_activation_is_per_resource() {
        let set = RateLimiterSet::new();
        set.activate(Resource::Articles);

        assert!(set.limiters[&Resource::Articles].is_active());
        assert!(!set.limiters[&Resource::Organizations].is_active());
    }

    #[tokio::test]
    async fn test_wait_for_inactive_returns_immediately() {
        let set = RateLimiterSet::new();
        // Would block for a while if the limiter were consulted
        for _ in 0..50 {
            set.wait_for(Resource::Users).await;
        }
    }
}
