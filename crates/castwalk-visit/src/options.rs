// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk configuration.

use serde::{Deserialize, Serialize};

/// Options controlling a [`Walker`](crate::Walker).
///
/// Use [`WalkOptions::default()`] for the standard behavior, or the builder
/// methods to change individual settings.
///
/// # Example
///
/// ```
/// use castwalk_visit::WalkOptions;
///
/// let options = WalkOptions::default();
/// assert!(options.rescan_node_scopes);
/// assert!(options.check_arity);
///
/// let options = WalkOptions::default().with_check_arity(false);
/// assert!(!options.check_arity);
///
/// let options = WalkOptions::from_json(r#"{"rescan_node_scopes": false}"#).unwrap();
/// assert!(!options.rescan_node_scopes);
/// assert!(options.check_arity);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkOptions {
    /// Look up node-scoped entities after every node, including nodes whose
    /// visit hook returned `Handled`.
    ///
    /// When false, nodes whose visit hook returned `Handled` do not hoist
    /// their node-scoped entities.
    pub rescan_node_scopes: bool,

    /// Validate each node's child count against its kind's contract before
    /// dispatching on it.
    ///
    /// When false, a node is only rejected if the walker needs a child that
    /// does not exist.
    pub check_arity: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        WalkOptions {
            rescan_node_scopes: true,
            check_arity: true,
        }
    }
}

impl WalkOptions {
    pub fn with_rescan_node_scopes(mut self, rescan: bool) -> Self {
        self.rescan_node_scopes = rescan;
        self
    }

    pub fn with_check_arity(mut self, check: bool) -> Self {
        self.check_arity = check;
        self
    }

    /// Load options from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = WalkOptions::default();
        assert!(options.rescan_node_scopes);
        assert!(options.check_arity);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let options = WalkOptions::from_json(r#"{"check_arity": false}"#).unwrap();
        assert_eq!(options, WalkOptions::default().with_check_arity(false));

        let options = WalkOptions::from_json("{}").unwrap();
        assert_eq!(options, WalkOptions::default());
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        assert!(WalkOptions::from_json(r#"{"check_arity": "yes"}"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let options = WalkOptions::default().with_rescan_node_scopes(false);
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"rescan_node_scopes":false,"check_arity":true}"#);
    }
}
