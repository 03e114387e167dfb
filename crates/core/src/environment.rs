//! The ambient environment shared with every card.
//!
//! The host owns the environment (session, theme, entity states) and hands
//! the composition an `Arc` of it; the composition only forwards that
//! reference to its children.

use serde::{Deserialize, Serialize};

/// Ambient session/theme context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Active theme, if the host provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<Theme>,

    /// Logged-in user name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Entity states keyed by entity id
    #[serde(default)]
    pub states: serde_json::Map<String, serde_json::Value>,
}

/// Theme settings carried by the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default, alias = "darkMode")]
    pub dark_mode: bool,

    #[serde(default, alias = "primaryColor", skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.themes = Some(theme);
        self
    }

    pub fn with_state(mut self, entity_id: impl Into<String>, state: serde_json::Value) -> Self {
        self.states.insert(entity_id.into(), state);
        self
    }

    /// Look up the state of one entity.
    pub fn state(&self, entity_id: &str) -> Option<&serde_json::Value> {
        self.states.get(entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_accepts_camel_case_keys() {
        let env: Environment = serde_json::from_value(serde_json::json!({
            "themes": {"darkMode": true, "primaryColor": "#ff9800"}
        }))
        .unwrap();
        let theme = env.themes.unwrap();
        assert!(theme.dark_mode);
        assert_eq!(theme.primary_color.as_deref(), Some("#ff9800"));
    }

    #[test]
    fn state_lookup() {
        let env = Environment::new().with_state("sensor.temp", serde_json::json!({"state": "21.5"}));
        assert_eq!(env.state("sensor.temp").unwrap()["state"], "21.5");
        assert!(env.state("sensor.other").is_none());
    }
}
