// src/config.rs

use crate::branch::{BranchNormalizer, BranchRule};
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Canonical branch table, in matching order.
const BUILTIN_BRANCHES: &[(&str, &[&str])] = &[
    ("l10n-central", &["l10n-central.*"]),
    ("birch", &["birch.+", "projects/birch.*"]),
    ("cedar", &["cedar.+", "projects/cedar.*"]),
    ("electrolysis", &["electrolysis.*", "projects/electrolysis.*"]),
    ("jaegermonkey", &["projects/jaegermonkey.*"]),
    ("maple", &["maple.*", "projects/maple.*"]),
    ("mozilla-1.9.1", &[r"mozilla-1\.9\.1.*"]),
    ("mozilla-1.9.2", &[r"mozilla-1\.9\.2.*"]),
    ("mozilla-2.0", &[r"mozilla-2\.0.*"]),
    ("mozilla-central", &["mozilla-central.*"]),
    ("places", &["places.+", "projects/places.*"]),
    ("release-mozilla-central", &["release-mozilla-central.*"]),
    ("tracemonkey", &["tracemonkey.*"]),
    ("try", &["try$", "tryserver.*"]),
];

const BUILTIN_REBUILD: &str = "The web-page 'rebuild' button was pressed by '.+': .*";
const BUILTIN_FORCEBUILD: &str = "The web-page 'force build' button was pressed by '.+': .*";

/// On-disk form of the registries, as read from a TOML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub report: ReportDefaults,
    #[serde(default = "builtin_branch_rules")]
    pub branches: Vec<BranchRuleConfig>,
    #[serde(default)]
    pub reasons: ReasonConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportDefaults {
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub int_size: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BranchRuleConfig {
    pub name: String,
    pub patterns: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReasonConfig {
    pub rebuild: String,
    pub forcebuild: String,
}

impl Default for RegistryFile {
    fn default() -> Self {
        Self {
            report: ReportDefaults::default(),
            branches: builtin_branch_rules(),
            reasons: ReasonConfig::default(),
        }
    }
}

impl Default for ReportDefaults {
    fn default() -> Self {
        Self {
            branch: default_branch(),
            int_size: 0,
        }
    }
}

impl Default for ReasonConfig {
    fn default() -> Self {
        Self {
            rebuild: BUILTIN_REBUILD.to_string(),
            forcebuild: BUILTIN_FORCEBUILD.to_string(),
        }
    }
}

fn default_branch() -> String {
    "mozilla-central".to_string()
}

fn builtin_branch_rules() -> Vec<BranchRuleConfig> {
    BUILTIN_BRANCHES
        .iter()
        .map(|(name, patterns)| BranchRuleConfig {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        })
        .collect()
}

/// Buildset reasons that mark a request as manually re-triggered.
#[derive(Clone, Debug)]
pub struct ReasonPatterns {
    rebuild: Regex,
    forcebuild: Regex,
}

impl ReasonPatterns {
    pub fn is_rebuild(&self, reason: Option<&str>) -> bool {
        reason.map_or(false, |r| self.rebuild.is_match(r))
    }

    pub fn is_forcebuild(&self, reason: Option<&str>) -> bool {
        reason.map_or(false, |r| self.forcebuild.is_match(r))
    }
}

/// Compiled, immutable pattern registries shared by every report in the process.
#[derive(Clone, Debug)]
pub struct Registry {
    pub defaults: ReportDefaults,
    pub branches: BranchNormalizer,
    pub reasons: ReasonPatterns,
}

impl Registry {
    pub fn builtin() -> Self {
        Self::compile(RegistryFile::default()).expect("built-in registry patterns compile")
    }

    pub fn compile(file: RegistryFile) -> Result<Self> {
        let rules = file
            .branches
            .into_iter()
            .map(|rule| {
                let patterns = rule
                    .patterns
                    .iter()
                    .map(|p| anchored(p))
                    .collect::<Result<Vec<_>>>()?;
                Ok(BranchRule::new(rule.name, patterns))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            defaults: file.report,
            branches: BranchNormalizer::new(rules),
            reasons: ReasonPatterns {
                rebuild: anchored(&file.reasons.rebuild)?,
                forcebuild: anchored(&file.reasons.forcebuild)?,
            },
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RegistryFile = toml::from_str(&s)?;
        Self::compile(file)
    }
}

/// Patterns match from the start of the input, like a prefix match.
pub fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})")).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Installs the process-wide registry. Returns false if one was already in place.
pub fn install(registry: Registry) -> bool {
    REGISTRY.set(registry).is_ok()
}

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::builtin)
}
