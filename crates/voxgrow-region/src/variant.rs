//! Name-keyed configuration enums
//!
//! Methods, metrics and criteria are selected by name in configuration. The
//! enums derive `EnumIter` + `Display`, and [`parse_variant`] matches a name
//! against their display forms, so a typo fails when the configuration is
//! built rather than at first use.

use std::fmt::Display;

use strum::IntoEnumIterator;

use crate::error::{RegionError, RegionResult};

/// Parse a case-insensitive variant name
///
/// # Errors
///
/// Returns `RegionError::InvalidConfiguration` naming the valid choices.
pub fn parse_variant<E>(kind: &str, name: &str) -> RegionResult<E>
where
    E: IntoEnumIterator + Display,
{
    let wanted = name.trim();
    E::iter()
        .find(|variant| variant.to_string().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            let valid: Vec<String> = E::iter().map(|v| v.to_string()).collect();
            RegionError::InvalidConfiguration(format!(
                "unknown {kind} '{name}', expected one of: {}",
                valid.join(", ")
            ))
        })
}
