//! User profile stored alongside the ratings

use serde::{Deserialize, Serialize};

const DEFAULT_NAME: &str = "Movie Fan";
const DEFAULT_AVATAR: &str = "https://via.placeholder.com/32?text=U";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: format!("user_{}", chrono::Utc::now().timestamp_millis()),
            name: DEFAULT_NAME.to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
        }
    }
}

impl UserProfile {
    /// Fill blank stored fields with defaults
    pub fn with_defaults(id: Option<String>, name: Option<String>, avatar: Option<String>) -> Self {
        let defaults = Self::default();
        let pick = |value: Option<String>, fallback: String| {
            value.filter(|v| !v.is_empty()).unwrap_or(fallback)
        };
        Self {
            id: pick(id, defaults.id),
            name: pick(name, defaults.name),
            avatar: pick(avatar, defaults.avatar),
        }
    }
}
