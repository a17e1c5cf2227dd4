//! Source-control platform discriminator

use std::fmt;

use serde::{Deserialize, Serialize};

/// Platform an organization or repository is hosted on.
///
/// Polar currently only syncs GitHub, so this is the default everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platforms {
    #[default]
    Github,
}

impl Platforms {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platforms::Github => "github",
        }
    }

    /// Public profile URL for a handle on this platform
    pub fn profile_url(&self, handle: &str) -> String {
        match self {
            Platforms::Github => format!("https://github.com/{}", handle),
        }
    }
}

impl fmt::Display for Platforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
