//! Macro for implementing Display and FromStr for label enums
//!
//! Several small enums (token state, error kind) are rendered into log fields
//! and parsed back from configuration or test fixtures. This macro provides
//! both conversions from one mapping table.
//!
//! # Example
//!
//! ```rust
//! use sfclient_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Phase {
//!     Idle,
//!     Running,
//! }
//!
//! impl_label_conversions!(Phase {
//!     Idle => "idle",
//!     Running => "running",
//! });
//!
//! assert_eq!(Phase::Running.to_string(), "running");
//! assert_eq!("IDLE".parse::<Phase>().unwrap(), Phase::Idle);
//! ```

/// Implements Display and FromStr traits for label enums
///
/// - Display writes the mapped label
/// - FromStr parses case-insensitively; labels must be lowercase
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
