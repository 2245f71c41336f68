//! Macro for implementing Display and FromStr for label enums
//!
//! Dispositions and log formats are rendered as short kebab-case labels in
//! log lines and parsed back from configuration. This macro provides both
//! directions from a single mapping.
//!
//! # Example
//!
//! ```rust
//! use eventrelay_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Outcome {
//!     Sent,
//!     Skipped,
//! }
//!
//! impl_label_conversions!(Outcome {
//!     Sent => "sent",
//!     Skipped => "skipped",
//! });
//!
//! assert_eq!(Outcome::Sent.to_string(), "sent");
//! assert_eq!("SKIPPED".parse::<Outcome>(), Ok(Outcome::Skipped));
//! ```

/// Implements Display and FromStr traits for label enums
///
/// - Display writes the mapped label verbatim
/// - FromStr matches labels case-insensitively and reports the enum name on
///   failure
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
