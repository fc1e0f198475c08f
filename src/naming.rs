//! Naming policies - pure functions from declaration identity to target name

use crate::{Error, Result};
use crate::uri::DeclarationId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_SUFFIX: &str = "Impl";

static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
static TYPE_NAME: OnceLock<Regex> = OnceLock::new();

fn identifier() -> &'static Regex {
    IDENTIFIER.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"))
}

/// Plain identifier usable as a class, function or parameter name
pub fn is_identifier(name: &str) -> bool {
    identifier().is_match(name)
}

/// Empty (default package) or dot-separated identifiers
pub fn is_package_name(package: &str) -> bool {
    package.is_empty() || package.split('.').all(is_identifier)
}

/// Possibly qualified type name with optional type arguments (`kotlin.collections.List<Int>`)
pub fn is_type_name(name: &str) -> bool {
    TYPE_NAME
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*(<[A-Za-z0-9_.,<>?* ]+>)?$")
                .expect("type name pattern is valid")
        })
        .is_match(name)
}

/// Derives the simple name of the generated class for a declaration.
pub trait NamingPolicy {
    fn target_name(&self, declaration: &DeclarationId) -> String;

    /// Derive and validate the target name
    fn resolve(&self, declaration: &DeclarationId) -> Result<String> {
        let name = self.target_name(declaration);
        if !is_identifier(&name) {
            return Err(Error::InvalidTargetName {
                declaration: declaration.clone(),
                name,
            });
        }
        Ok(name)
    }
}

/// `<InterfaceName><suffix>`: unique per interface, the default.
#[derive(Debug, Clone)]
pub struct DeclarationNamePolicy {
    pub suffix: String,
}

impl Default for DeclarationNamePolicy {
    fn default() -> Self {
        Self { suffix: DEFAULT_SUFFIX.to_string() }
    }
}

impl NamingPolicy for DeclarationNamePolicy {
    fn target_name(&self, declaration: &DeclarationId) -> String {
        format!("{}{}", declaration.name, self.suffix)
    }
}

/// `<ContainingFileBaseName><suffix>`.
///
/// Two interfaces in one file derive the same name; the processor reports
/// that as `NameCollision`.
#[derive(Debug, Clone)]
pub struct FileBaseNamePolicy {
    pub suffix: String,
}

impl Default for FileBaseNamePolicy {
    fn default() -> Self {
        Self { suffix: DEFAULT_SUFFIX.to_string() }
    }
}

impl NamingPolicy for FileBaseNamePolicy {
    fn target_name(&self, declaration: &DeclarationId) -> String {
        format!("{}{}", declaration.file_base_name(), self.suffix)
    }
}

/// Configurable choice of naming policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    #[default]
    Interface,
    File,
}

impl NamingStrategy {
    pub fn policy(&self, suffix: &str) -> Box<dyn NamingPolicy> {
        let suffix = suffix.to_string();
        match self {
            NamingStrategy::Interface => Box::new(DeclarationNamePolicy { suffix }),
            NamingStrategy::File => Box::new(FileBaseNamePolicy { suffix }),
        }
    }
}
