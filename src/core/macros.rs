//! Macros for declaring identifier enums.

/// Generate an [`Ident`](crate::core::Ident) implementation for a plain
/// enum.
///
/// Variant names double as display names; `from_name` resolves them back.
///
/// # Example
///
/// ```
/// use strata::core::Ident;
/// use strata::ident_enum;
///
/// ident_enum! {
///     pub enum AtmState {
///         Idle,
///         Loading,
///         InService,
///         OutOfService,
///         Disconnected,
///     }
/// }
///
/// assert_eq!(AtmState::Loading.name(), "Loading");
/// assert_eq!(AtmState::from_name("Idle"), Some(AtmState::Idle));
/// ```
#[macro_export]
macro_rules! ident_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Ident for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}
