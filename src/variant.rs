//! Variant descriptors and the name-keyed registry.
//!
//! Descriptors are immutable once registered and shared by `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

/// Start position of standard Janggi (both sides in the "inner elephant" setup).
pub const JANGGI_START_FEN: &str =
    "rnba1abnr/4k4/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/4K4/RNBA1ABNR w - - 0 1";

/// Rule switches that differ between registered variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantRules {
    /// A side not in check may pass by "moving" its general onto its own square.
    pub allow_pass: bool,
    /// Facing generals on an open file end the game as a draw.
    pub bikjang: bool,
}

impl Default for VariantRules {
    fn default() -> Self {
        VariantRules {
            allow_pass: true,
            bikjang: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantDescriptor {
    pub name: String,
    pub start_fen: String,
    pub rules: VariantRules,
}

impl VariantDescriptor {
    #[must_use]
    pub fn janggi() -> Self {
        VariantDescriptor {
            name: "janggi".to_string(),
            start_fen: JANGGI_START_FEN.to_string(),
            rules: VariantRules::default(),
        }
    }

    /// Casual rules: no bikjang adjudication.
    #[must_use]
    pub fn janggi_casual() -> Self {
        VariantDescriptor {
            name: "janggicasual".to_string(),
            start_fen: JANGGI_START_FEN.to_string(),
            rules: VariantRules {
                allow_pass: true,
                bikjang: false,
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct VariantRegistry {
    variants: HashMap<String, Arc<VariantDescriptor>>,
}

impl VariantRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in variant.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(VariantDescriptor::janggi());
        registry.register(VariantDescriptor::janggi_casual());
        registry
    }

    pub fn register(&mut self, descriptor: VariantDescriptor) {
        self.variants
            .insert(descriptor.name.clone(), Arc::new(descriptor));
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<Arc<VariantDescriptor>> {
        self.variants.get(name).cloned()
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variants.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = VariantRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["janggi", "janggicasual"]);
        let janggi = registry.find("janggi").unwrap();
        assert!(janggi.rules.bikjang);
        assert!(!registry.find("janggicasual").unwrap().rules.bikjang);
    }

    #[test]
    fn chess_is_not_a_registered_variant() {
        assert!(VariantRegistry::with_builtins().find("chess").is_none());
    }
}
