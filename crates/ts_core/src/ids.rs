//! crates/ts_core/src/ids.rs
//! Display names used as identifiers: divisions, teams, pools, sheets.
//! Names are trimmed on parse; no I/O.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const MAX_NAME_LEN: usize = 100;

/// Characters a sheet title may not carry (quoted references break on them).
const SHEET_FORBIDDEN: [char; 7] = ['[', ']', '*', '?', '/', '\\', ':'];

/// Shared shape check: trimmed, non-empty, bounded, no control characters.
fn check_label(s: &str, kind: &'static str) -> Result<String, CoreError> {
    let t = s.trim();
    if t.is_empty() {
        return Err(CoreError::EmptyName(kind));
    }
    if t.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::NameTooLong(kind));
    }
    if t.chars().any(char::is_control) {
        return Err(CoreError::ControlChar(kind));
    }
    Ok(t.to_owned())
}

macro_rules! simple_string_newtype {
    ($(#[$m:meta])* $name:ident, $kind:literal) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl TryFrom<&str> for $name {
            type Error = CoreError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            #[inline]
            fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
        }

        impl From<$name> for String {
            #[inline]
            fn from(value: $name) -> String { value.0 }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::validate(s, $kind).map($name)
            }
        }
    };
}

simple_string_newtype!(
    /// Division display name, e.g. "U10 Boys". One sheet per division.
    DivisionName, "division name"
);
simple_string_newtype!(
    /// Team display name as written into standings cells.
    TeamName, "team name"
);
simple_string_newtype!(
    /// Pool label, e.g. "A". Pools are laid out in label order.
    PoolLabel, "pool label"
);
simple_string_newtype!(
    /// Sheet title in the delivered document.
    SheetName, "sheet name"
);

impl DivisionName {
    fn validate(s: &str, kind: &'static str) -> Result<String, CoreError> { check_label(s, kind) }
}

impl TeamName {
    fn validate(s: &str, kind: &'static str) -> Result<String, CoreError> { check_label(s, kind) }
}

impl PoolLabel {
    fn validate(s: &str, kind: &'static str) -> Result<String, CoreError> { check_label(s, kind) }

    /// Default pool for a team without an explicit one: the first character
    /// of its name.
    pub fn from_team_name(team: &TeamName) -> PoolLabel {
        // TeamName is non-empty after validation, so the first char exists.
        let first: String = team.as_str().chars().take(1).collect();
        PoolLabel(first)
    }

    /// Human label used in pool header rows.
    pub fn heading(&self) -> String {
        format!("Pool {}", self.0)
    }
}

impl SheetName {
    fn validate(s: &str, kind: &'static str) -> Result<String, CoreError> {
        let t = check_label(s, kind)?;
        if let Some(c) = t.chars().find(|c| SHEET_FORBIDDEN.contains(c)) {
            return Err(CoreError::ForbiddenChar(kind, c));
        }
        Ok(t)
    }

    /// Sheet title for a division; forbidden characters are replaced by '-'.
    pub fn for_division(division: &DivisionName) -> SheetName {
        let title: String = division
            .as_str()
            .chars()
            .map(|c| if SHEET_FORBIDDEN.contains(&c) { '-' } else { c })
            .collect();
        SheetName(title)
    }
}

/* ---------------------------------- Tests --------------------------------- */
