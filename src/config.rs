//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/curriculum-tree/curriculum-tree.toml`
//! 3. Local config: `./.curriculum-tree.toml`, or the file given with `--config`
//! 4. Environment variables: `CURRICULUM_TREE__<SECTION>__<KEY>`

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DuplicatePolicy;

const APP_NAME: &str = "curriculum-tree";
const ENV_PREFIX: &str = "CURRICULUM_TREE";

/// Where subjects of a learning area are looked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectScope {
    /// Only nodes whose `isChildOf` points at the learning area
    #[default]
    LearningArea,
    /// Every node labelled "Subject" in the merged graph
    Graph,
}

/// Settings for building the curriculum tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoadSettings {
    /// Require exactly one root node per file
    pub strict_root: bool,
    pub subject_scope: SubjectScope,
    pub duplicate_keys: DuplicatePolicy,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            strict_root: true,
            subject_scope: SubjectScope::default(),
            duplicate_keys: DuplicatePolicy::default(),
        }
    }
}

/// Settings for the markdown renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    pub output_dir: PathBuf,
    /// Only year levels whose year numbers are all 7 or above
    pub secondary_only: bool,
    /// Subject titles left out of the output
    pub exclude_subjects: Vec<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("curriculum-md"),
            secondary_only: false,
            exclude_subjects: vec![],
        }
    }
}

/// Raw load settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLoadSettings {
    pub strict_root: Option<bool>,
    pub subject_scope: Option<SubjectScope>,
    pub duplicate_keys: Option<DuplicatePolicy>,
}

/// Raw render settings; arrays are Option to detect "not specified".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub output_dir: Option<PathBuf>,
    pub secondary_only: Option<bool>,
    pub exclude_subjects: Option<Vec<String>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub load: RawLoadSettings,
    pub render: RawRenderSettings,
}

impl LoadSettings {
    fn merge(&self, overlay: &RawLoadSettings) -> Self {
        Self {
            strict_root: overlay.strict_root.unwrap_or(self.strict_root),
            subject_scope: overlay.subject_scope.unwrap_or(self.subject_scope),
            duplicate_keys: overlay.duplicate_keys.unwrap_or(self.duplicate_keys),
        }
    }
}

impl RenderSettings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["Latin"], &["Design and Technologies"]) // → both
    /// merge_array(&["Latin", "Greek"], &["!Latin"])          // → ["Greek"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for item in overlay {
            if let Some(negated) = item.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(item.clone());
            }
        }

        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Overlay wins for scalars; `exclude_subjects` is union-merged.
    pub fn merge(&self, overlay: &RawRenderSettings) -> Self {
        Self {
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            secondary_only: overlay.secondary_only.unwrap_or(self.secondary_only),
            exclude_subjects: overlay
                .exclude_subjects
                .as_ref()
                .map(|o| Self::merge_array(&self.exclude_subjects, o))
                .unwrap_or_else(|| self.exclude_subjects.clone()),
        }
    }

    /// Like [`RenderSettings::merge`], but a specified array replaces the base.
    pub fn apply_global(&self, global: &RawRenderSettings) -> Self {
        Self {
            exclude_subjects: global
                .exclude_subjects
                .clone()
                .unwrap_or_else(|| self.exclude_subjects.clone()),
            ..self.merge(&RawRenderSettings {
                exclude_subjects: None,
                ..global.clone()
            })
        }
    }
}

/// Unified configuration for curriculum-tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub load: LoadSettings,
    pub render: RenderSettings,
}

/// Get the XDG config directory for curriculum-tree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(format!(".{APP_NAME}.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        let raw = self.render.output_dir.to_string_lossy().into_owned();
        let expanded = shellexpand::full(&raw)
            .map(|s| s.into_owned())
            .unwrap_or(raw);
        self.render.output_dir = PathBuf::from(expanded);
    }

    /// Overlay scalars win, arrays union with negation support.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            load: self.load.merge(&overlay.load),
            render: self.render.merge(&overlay.render),
        }
    }

    /// Arrays in the global file replace the defaults instead of extending them.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            load: self.load.merge(&global.load),
            render: self.render.apply_global(&global.render),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// `local` is an explicit config file; when absent, `./.curriculum-tree.toml`
    /// is used if it exists. An explicit file that does not exist is an error.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        match local {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                let path = local_config_path(Path::new("."));
                if path.exists() {
                    let raw = load_raw_settings(&path)?;
                    current = current.merge_with(&raw);
                }
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply `CURRICULUM_TREE__*` environment variables as explicit overrides.
    ///
    /// Env vars replace values (not merge).
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("render.exclude_subjects"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("load.strict_root") {
            settings.load.strict_root = val;
        }
        if let Ok(val) = config.get_string("load.subject_scope") {
            settings.load.subject_scope = parse_variant("load.subject_scope", &val)?;
        }
        if let Ok(val) = config.get_string("load.duplicate_keys") {
            settings.load.duplicate_keys = parse_variant("load.duplicate_keys", &val)?;
        }
        if let Ok(val) = config.get_string("render.output_dir") {
            settings.render.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("render.secondary_only") {
            settings.render.secondary_only = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("render.exclude_subjects") {
            settings.render.exclude_subjects = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# curriculum-tree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/curriculum-tree/curriculum-tree.toml
#   Local:  ./.curriculum-tree.toml (or --config <file>)
#   Env:    CURRICULUM_TREE__<SECTION>__<KEY>, e.g. CURRICULUM_TREE__LOAD__STRICT_ROOT=false
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global. Use "!name" to REMOVE an inherited item:
#     exclude_subjects = ["Latin", "!Design and Technologies"]

[load]
# Require exactly one node with notation "root" per file.
# When false, a file without a root is loaded with a warning.
# strict_root = true

# Where subjects are looked for: "learning-area" (children of the learning
# area node) or "graph" (every subject in everything loaded so far)
# subject_scope = "learning-area"

# Siblings sharing a key: "overwrite" (last wins, logged) or "reject"
# duplicate_keys = "overwrite"

[render]
# Output directory for the markdown files (~ and $VAR are expanded)
# output_dir = "curriculum-md"

# Only render year levels 7 and above
# secondary_only = false

# Subjects to leave out
# exclude_subjects = ["Design and Technologies"]
"#
        .to_string()
    }
}

fn parse_variant<T: DeserializeOwned>(key: &str, value: &str) -> Result<T, ApplicationError> {
    T::deserialize(StrDeserializer::<ValueError>::new(value)).map_err(|e| {
        ApplicationError::Config {
            message: format!("{key}: {e}"),
        }
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_defaults_then_strict_and_scoped() {
        let settings = Settings::default();
        assert!(settings.load.strict_root);
        assert_eq!(settings.load.subject_scope, SubjectScope::LearningArea);
        assert_eq!(settings.load.duplicate_keys, DuplicatePolicy::Overwrite);
        assert_eq!(settings.render.output_dir, PathBuf::from("curriculum-md"));
        assert!(settings.render.exclude_subjects.is_empty());
    }

    #[test]
    fn given_tilde_in_output_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings::default();
        settings.render.output_dir = PathBuf::from("~/notes/curriculum");

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let out = settings.render.output_dir.to_string_lossy();
        assert!(out.starts_with(&home), "output_dir should start with home: {}", out);
        assert!(!out.contains('~'));
    }

    #[test]
    fn given_negation_when_merge_array_then_removes_inherited() {
        let base = strings(&["Design and Technologies", "Latin"]);
        let overlay = strings(&["!Latin", "Greek"]);

        let result = RenderSettings::merge_array(&base, &overlay);

        assert_eq!(result, strings(&["Design and Technologies", "Greek"]));
    }

    #[test]
    fn given_duplicates_when_merge_array_then_deduplicated() {
        let result = RenderSettings::merge_array(&strings(&["a", "b"]), &strings(&["a", "c"]));
        assert_eq!(result, strings(&["a", "b", "c"]));
    }

    #[test]
    fn given_local_toml_when_merged_then_scalars_override_and_arrays_union() {
        let base = Settings {
            render: RenderSettings {
                exclude_subjects: strings(&["Latin"]),
                ..RenderSettings::default()
            },
            ..Settings::default()
        };
        let raw: RawSettings = toml::from_str(
            r#"
[load]
strict_root = false
duplicate_keys = "reject"

[render]
secondary_only = true
exclude_subjects = ["Design and Technologies"]
"#,
        )
        .expect("parse raw settings");

        let merged = base.merge_with(&raw);

        assert!(!merged.load.strict_root);
        assert_eq!(merged.load.duplicate_keys, DuplicatePolicy::Reject);
        assert_eq!(merged.load.subject_scope, SubjectScope::LearningArea);
        assert!(merged.render.secondary_only);
        assert_eq!(
            merged.render.exclude_subjects,
            strings(&["Design and Technologies", "Latin"])
        );
    }

    #[test]
    fn given_global_arrays_when_applied_then_replace_defaults() {
        let base = Settings {
            render: RenderSettings {
                exclude_subjects: strings(&["Latin"]),
                ..RenderSettings::default()
            },
            ..Settings::default()
        };
        let raw: RawSettings = toml::from_str(
            r#"
[render]
output_dir = "/tmp/out"
exclude_subjects = ["Greek"]
"#,
        )
        .expect("parse raw settings");

        let applied = base.apply_global(&raw);

        assert_eq!(applied.render.exclude_subjects, strings(&["Greek"]));
        assert_eq!(applied.render.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn given_kebab_case_value_when_parse_variant_then_maps_enum() {
        let scope: SubjectScope = parse_variant("k", "graph").unwrap();
        assert_eq!(scope, SubjectScope::Graph);
        let policy: DuplicatePolicy = parse_variant("k", "reject").unwrap();
        assert_eq!(policy, DuplicatePolicy::Reject);
        assert!(parse_variant::<SubjectScope>("k", "everywhere").is_err());
    }

    #[test]
    fn given_settings_when_to_toml_then_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn given_template_then_parses_as_raw_settings() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.load.strict_root.is_none());
    }
}
