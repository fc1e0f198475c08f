//! Declaration identity - stable key for every declaration in a round
//!
//! Format: `decl://<package>/<file>#<name>`
//!
//! Examples:
//! - `decl://com.example/Calculator.kt#Calculator`
//! - `decl:///Scratch.kt#Adder` (default package)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SCHEME: &str = "decl://";

/// Identity of a class-like declaration.
///
/// This id is the de-duplication key when the processor unions the
/// per-annotation queries, and the context attached to every fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationId {
    /// Dotted package name (may be empty for the default package)
    pub package: String,
    /// Containing file name, e.g. `Calculator.kt`
    pub file: String,
    /// Simple name of the declaration
    pub name: String,
}

impl DeclarationId {
    /// Create a new DeclarationId
    pub fn new(package: impl Into<String>, file: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            file: file.into(),
            name: name.into(),
        }
    }

    /// Parse an id string
    ///
    /// Expected format: `decl://<package>/<file>#<name>`
    pub fn parse(id: &str) -> Result<Self> {
        let rest = id.strip_prefix(SCHEME)
            .ok_or_else(|| Error::InvalidId(format!("id must start with {}: {}", SCHEME, id)))?;

        // Names are identifiers, so the last '#' starts the fragment even when the file has one
        let (location, name) = rest.rsplit_once('#')
            .ok_or_else(|| Error::InvalidId(format!("id must contain # fragment: {}", id)))?;

        // Packages never contain '/', so the first one separates package from file
        let (package, file) = location.split_once('/')
            .ok_or_else(|| Error::InvalidId(format!("id must contain package/file: {}", id)))?;

        if file.is_empty() || name.is_empty() {
            return Err(Error::InvalidId(format!("file and name must be non-empty: {}", id)));
        }

        Ok(Self::new(package, file, name))
    }

    /// Convert to id string
    pub fn to_id_string(&self) -> String {
        format!("{}{}/{}#{}", SCHEME, self.package, self.file, self.name)
    }

    /// Containing file name without its extension (`Calculator.kt` -> `Calculator`)
    pub fn file_base_name(&self) -> &str {
        let file = self.file.rsplit('/').next().unwrap_or(&self.file);
        match file.rsplit_once('.') {
            Some((base, _)) if !base.is_empty() => base,
            _ => file,
        }
    }

    /// Fully qualified name of the declaration (`com.example.Calculator`)
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_id_string())
    }
}

impl FromStr for DeclarationId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DeclarationId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_id_string())
    }
}

impl<'de> Deserialize<'de> for DeclarationId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DeclarationId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format() {
        let id = DeclarationId::new("com.example", "Calculator.kt", "Calculator");
        assert_eq!(id.to_id_string(), "decl://com.example/Calculator.kt#Calculator");

        let parsed = DeclarationId::parse(&id.to_id_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_default_package() {
        let id = DeclarationId::parse("decl:///Scratch.kt#Adder").unwrap();
        assert_eq!(id.package, "");
        assert_eq!(id.file, "Scratch.kt");
        assert_eq!(id.qualified_name(), "Adder");
    }

    #[test]
    fn test_file_base_name() {
        let id = DeclarationId::new("p", "Calculator.kt", "Calculator");
        assert_eq!(id.file_base_name(), "Calculator");

        let nested = DeclarationId::new("p", "src/main/Shapes.kt", "Circle");
        assert_eq!(nested.file_base_name(), "Shapes");

        let bare = DeclarationId::new("p", "Makefile", "X");
        assert_eq!(bare.file_base_name(), "Makefile");
    }

    #[test]
    fn test_hash_in_file_name_round_trips() {
        let id = DeclarationId::new("com.example", "Calc#1.kt", "Calculator");
        assert_eq!(id.to_id_string(), "decl://com.example/Calc#1.kt#Calculator");
        assert_eq!(DeclarationId::parse(&id.to_id_string()).unwrap(), id);
    }

    #[test]
    fn test_invalid_id() {
        assert!(DeclarationId::parse("invalid").is_err());
        assert!(DeclarationId::parse("decl://com.example/Calculator.kt").is_err()); // missing fragment
        assert!(DeclarationId::parse("decl://com.example#Calculator").is_err()); // missing file
        assert!(DeclarationId::parse("decl://com.example/Calculator.kt#").is_err());
    }
}
