//! # Runtime Configuration Module
//!
//! Environment-variable configuration for the router's runtime behavior.
//!
//! ## Environment Variables
//!
//! ### `SWITCHYARD_MAX_DISPATCH_DEPTH`
//!
//! Maximum number of nested dispatches (a handler dispatching another route,
//! which dispatches another, ...). Accepts decimal (`64`) or hexadecimal
//! (`0x40`). `0` disables the limit.
//!
//! Default: `64`
//!
//! ### `SWITCHYARD_VALIDATE_HANDLERS`
//!
//! When `true`, [`crate::router::RouterBuilder::build`] resolves every route's
//! handler before returning, so a typo in a handler identifier fails at
//! startup instead of on the first request.
//!
//! Default: `true`
//!
//! ## Usage
//!
//! ```rust
//! use switchyard::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Max dispatch depth: {}", config.max_dispatch_depth);
//! ```

use std::env;

/// Default nesting limit.
pub const DEFAULT_MAX_DISPATCH_DEPTH: usize = 64;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Maximum dispatch nesting depth, `0` for unlimited
    pub max_dispatch_depth: usize,
    /// Resolve all handlers when the router is built
    pub validate_handlers: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_dispatch_depth: DEFAULT_MAX_DISPATCH_DEPTH,
            validate_handlers: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup; unparsable values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_dispatch_depth = lookup("SWITCHYARD_MAX_DISPATCH_DEPTH")
            .and_then(|val| parse_usize(&val))
            .unwrap_or(defaults.max_dispatch_depth);
        let validate_handlers = lookup("SWITCHYARD_VALIDATE_HANDLERS")
            .and_then(|val| val.trim().to_ascii_lowercase().parse().ok())
            .unwrap_or(defaults.validate_handlers);
        RuntimeConfig {
            max_dispatch_depth,
            validate_handlers,
        }
    }

    /// Whether one more nested dispatch at `depth` is allowed.
    #[must_use]
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_dispatch_depth == 0 || depth < self.max_dispatch_depth
    }
}

fn parse_usize(val: &str) -> Option<usize> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(RuntimeConfig::from_lookup(|_| None), RuntimeConfig::default());
    }

    #[test]
    fn parses_decimal_and_hex() {
        let dec = RuntimeConfig::from_lookup(lookup(&[("SWITCHYARD_MAX_DISPATCH_DEPTH", "8")]));
        assert_eq!(dec.max_dispatch_depth, 8);
        let hex = RuntimeConfig::from_lookup(lookup(&[("SWITCHYARD_MAX_DISPATCH_DEPTH", "0x10")]));
        assert_eq!(hex.max_dispatch_depth, 16);
    }

    #[test]
    fn garbage_falls_back() {
        let cfg = RuntimeConfig::from_lookup(lookup(&[
            ("SWITCHYARD_MAX_DISPATCH_DEPTH", "lots"),
            ("SWITCHYARD_VALIDATE_HANDLERS", "FALSE"),
        ]));
        assert_eq!(cfg.max_dispatch_depth, DEFAULT_MAX_DISPATCH_DEPTH);
        assert!(!cfg.validate_handlers);
    }

    #[test]
    fn zero_means_unlimited() {
        let cfg = RuntimeConfig {
            max_dispatch_depth: 0,
            validate_handlers: false,
        };
        assert!(cfg.allows_depth(10_000));
        assert!(RuntimeConfig::default().allows_depth(63));
        assert!(!RuntimeConfig::default().allows_depth(64));
    }
}
