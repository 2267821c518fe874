//! Identifier trait for states and events.
//!
//! The engine treats state and event identifiers as opaque values: it only
//! ever compares and hashes them. The `name`/`from_name` pair is the
//! conversion boundary used by observers, logging, and exporters, never by
//! control flow.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state and event identifiers.
///
/// Identifiers are caller-defined, immutable values. The same trait serves
/// both roles: a `StateId` and an `EventId` are just type parameters bound
/// by `Ident`.
///
/// # Required Traits
///
/// - `Clone` + `Eq` + `Hash`: identifiers key the transition table and the
///   per-instance registries
/// - `Debug`: identifiers must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: identifiers must be serializable so
///   external tooling can round-trip a machine description
///
/// # Example
///
/// ```rust
/// use strata::core::Ident;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum AtmState {
///     Idle,
///     Loading,
///     InService,
/// }
///
/// impl Ident for AtmState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Loading => "Loading",
///             Self::InService => "InService",
///         }
///     }
///
///     fn from_name(name: &str) -> Option<Self> {
///         match name {
///             "Idle" => Some(Self::Idle),
///             "Loading" => Some(Self::Loading),
///             "InService" => Some(Self::InService),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(AtmState::Idle.name(), "Idle");
/// assert_eq!(AtmState::from_name("Loading"), Some(AtmState::Loading));
/// ```
///
/// The [`ident_enum!`](crate::ident_enum) macro generates this
/// implementation for plain enums.
pub trait Ident:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the identifier's display name.
    ///
    /// Used by observers and exporters only; the engine itself never
    /// inspects names.
    fn name(&self) -> &str;

    /// Resolve an identifier from its display name.
    ///
    /// The inverse of [`name`](Ident::name). Returns `None` for names no
    /// identifier carries.
    fn from_name(name: &str) -> Option<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestId {
        Alpha,
        Beta,
    }

    impl Ident for TestId {
        fn name(&self) -> &str {
            match self {
                Self::Alpha => "Alpha",
                Self::Beta => "Beta",
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            match name {
                "Alpha" => Some(Self::Alpha),
                "Beta" => Some(Self::Beta),
                _ => None,
            }
        }
    }

    #[test]
    fn name_returns_display_string() {
        assert_eq!(TestId::Alpha.name(), "Alpha");
        assert_eq!(TestId::Beta.name(), "Beta");
    }

    #[test]
    fn from_name_round_trips() {
        assert_eq!(TestId::from_name(TestId::Alpha.name()), Some(TestId::Alpha));
        assert_eq!(TestId::from_name(TestId::Beta.name()), Some(TestId::Beta));
    }

    #[test]
    fn from_name_rejects_unknown_names() {
        assert_eq!(TestId::from_name("Gamma"), None);
    }

    #[test]
    fn identifiers_serialize_correctly() {
        let json = serde_json::to_string(&TestId::Alpha).unwrap();
        let back: TestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TestId::Alpha);
    }
}
