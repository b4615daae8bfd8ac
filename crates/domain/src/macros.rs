//! Macro for implementing Display and FromStr for simple string-backed enums
//!
//! Used for configuration switches and role names that arrive as lowercase
//! strings (environment variables, backend payloads). Parsing is
//! case-insensitive, output is always the canonical lowercase form.
//!
//! # Example
//!
//! ```rust
//! use synvia_domain::impl_domain_str_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Backend {
//!     Memory,
//!     File,
//! }
//!
//! impl_domain_str_conversions!(Backend {
//!     Memory => "memory",
//!     File => "file",
//! });
//!
//! assert_eq!("FILE".parse::<Backend>().unwrap(), Backend::File);
//! assert_eq!(Backend::Memory.to_string(), "memory");
//! ```

/// Implements Display and FromStr traits for string-backed enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their canonical string
/// - FromStr trait: parses case-insensitive strings to enum variants
#[macro_export]
macro_rules! impl_domain_str_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
