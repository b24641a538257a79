//! Component status feed
//!
//! The data-generation side publishes one status list per simulated cycle.
//! The scene only cares about the alert flag of each component.

use serde::{Deserialize, Serialize};

use crate::config::ComponentKey;

/// One entry of the per-cycle status list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentStatus {
    #[serde(alias = "componentKey")]
    pub key: ComponentKey,
    #[serde(default)]
    pub alert: bool,
}

/// Alert flag per component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertMap {
    flags: [bool; ComponentKey::ALL.len()],
}

impl AlertMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a status list. Components missing from the list are
    /// treated as healthy; a repeated key keeps its last value.
    pub fn from_statuses(statuses: &[ComponentStatus]) -> Self {
        let mut map = Self::default();
        for status in statuses {
            map.set(status.key, status.alert);
        }
        map
    }

    /// Parse a JSON status list, e.g. `[{"key":"Fan","alert":true}]`.
    /// Extra fields (name, value, ...) are ignored.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let statuses: Vec<ComponentStatus> = serde_json::from_str(json)?;
        Ok(Self::from_statuses(&statuses))
    }

    #[inline]
    pub fn is_alert(&self, key: ComponentKey) -> bool {
        self.flags[key.index()]
    }

    #[inline]
    pub fn set(&mut self, key: ComponentKey, alert: bool) {
        self.flags[key.index()] = alert;
    }

    pub fn any(&self) -> bool {
        self.flags.iter().any(|&f| f)
    }

    /// Components currently in alert
    pub fn alerts(&self) -> impl Iterator<Item = ComponentKey> + '_ {
        ComponentKey::ALL.into_iter().filter(|k| self.is_alert(*k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_statuses() {
        let map = AlertMap::from_statuses(&[
            ComponentStatus {
                key: ComponentKey::Fan,
                alert: true,
            },
            ComponentStatus {
                key: ComponentKey::Hpt,
                alert: false,
            },
        ]);
        assert!(map.is_alert(ComponentKey::Fan));
        assert!(!map.is_alert(ComponentKey::Hpt));
        assert!(!map.is_alert(ComponentKey::Lpc));
        assert_eq!(map.alerts().collect::<Vec<_>>(), vec![ComponentKey::Fan]);
    }

    #[test]
    fn test_from_json_ignores_extra_fields() {
        let json = r#"[
            {"key": "Fan", "name": "Fan", "value": 0.0091, "alert": true},
            {"key": "LPC", "value": 0.002, "alert": false},
            {"componentKey": "LPT", "alert": true}
        ]"#;
        let map = AlertMap::from_json(json).unwrap();
        assert!(map.is_alert(ComponentKey::Fan));
        assert!(map.is_alert(ComponentKey::Lpt));
        assert!(!map.is_alert(ComponentKey::Lpc));
        assert!(map.any());
    }

    #[test]
    fn test_unknown_component_is_an_error() {
        assert!(AlertMap::from_json(r#"[{"key":"Nozzle","alert":true}]"#).is_err());
        assert!(!AlertMap::new().any());
    }
}
