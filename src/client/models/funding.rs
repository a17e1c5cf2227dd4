//! Issue funding models

use serde::{Deserialize, Serialize};

use super::CurrencyAmount;

/// Funding sort keys accepted by `funding/search`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListFundingSortBy {
    Oldest,
    Newest,
    MostFunded,
    MostRecentlyFunded,
    MostEngagement,
}

impl ListFundingSortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListFundingSortBy::Oldest => "oldest",
            ListFundingSortBy::Newest => "newest",
            ListFundingSortBy::MostFunded => "most_funded",
            ListFundingSortBy::MostRecentlyFunded => "most_recently_funded",
            ListFundingSortBy::MostEngagement => "most_engagement",
        }
    }
}

/// Issue as embedded in funding results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub number: i64,
    pub title: String,
    /// `OPEN` or `CLOSED`
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
}

/// Funding status of one issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueFunding {
    pub issue: Issue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_goal: Option<CurrencyAmount>,
    pub total: CurrencyAmount,
}
