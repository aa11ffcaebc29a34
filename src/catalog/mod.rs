//! The component catalog: which schemes exist, their path syntax and their
//! parameters.
//!
//! A [`Catalog`] is loaded once, before any request runs, from three sources in
//! registration order:
//!
//! 1. descriptors passed inline by the client (`extra_components`)
//! 2. an optional directory of JSON/YAML descriptors (`catalog_path`)
//! 3. the descriptors built into the binary
//!
//! Kamelet templates and Camel K traits ship with the binary as well.
//!
//! The URI model only sees the [`SchemeLookup`] trait.

mod builtin;
mod kamelet;
mod model;
mod traits;

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub use kamelet::{KameletKind, KameletTemplate};
pub use model::{ComponentInfo, ComponentModel, ParamMetadata, SyntaxSlot};
pub use traits::TraitModel;

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog descriptor: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON descriptor: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML descriptor: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("descriptor has no component scheme")]
    MissingScheme,
}

/// How a scheme matched by several descriptors is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum AmbiguityPolicy {
    /// The first registered descriptor wins.
    #[default]
    First,
    /// Syntax of the first descriptor, parameters merged from every match.
    All,
    /// Ambiguous schemes are treated as unknown.
    Unknown,
}

/// Read access to scheme metadata.
pub trait SchemeLookup {
    /// `None` means the scheme is unknown.
    fn lookup_scheme(&self, name: &str) -> Option<Cow<'_, ComponentModel>>;
}

impl<F> SchemeLookup for F
where
    F: Fn(&str) -> Option<ComponentModel>,
{
    fn lookup_scheme(&self, name: &str) -> Option<Cow<'_, ComponentModel>> {
        self(name).map(Cow::Owned)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    components: Vec<ComponentModel>,
    by_scheme: HashMap<String, Vec<usize>>,
    policy: AmbiguityPolicy,
    kamelets: Vec<KameletTemplate>,
    traits: Vec<TraitModel>,
}

impl Catalog {
    pub fn new(policy: AmbiguityPolicy) -> Catalog {
        Catalog {
            policy,
            ..Default::default()
        }
    }

    /// Builds the catalog the server runs with.
    ///
    /// Broken descriptors are logged and skipped; loading never fails as a whole.
    pub fn from_settings(settings: &Settings) -> Catalog {
        let mut catalog = Catalog::new(settings.ambiguity_policy);

        for json in &settings.extra_components {
            if let Err(err) = catalog.register_json(json) {
                warn!("Skipping extra component: {err}");
            }
        }

        if let Some(catalog_path) = settings.catalog_path.as_deref().filter(|it| !it.is_empty()) {
            let expanded = shellexpand::tilde(catalog_path);
            catalog.load_dir(Path::new(expanded.as_ref()));
        }

        catalog.with_builtin()
    }

    pub fn policy(&self) -> AmbiguityPolicy {
        self.policy
    }

    pub fn register(&mut self, model: ComponentModel) {
        let index = self.components.len();
        for scheme in model.schemes() {
            self.by_scheme
                .entry(scheme.to_string())
                .or_default()
                .push(index);
        }
        self.components.push(model);
    }

    pub fn register_json(&mut self, json: &str) -> Result<(), CatalogError> {
        self.register(ComponentModel::from_json(json)?);
        Ok(())
    }

    pub fn register_yaml(&mut self, yaml: &str) -> Result<(), CatalogError> {
        self.register(ComponentModel::from_yaml(yaml)?);
        Ok(())
    }

    /// Adds the templates of a JSON array of kamelet entries.
    pub fn register_kamelets_json(&mut self, json: &str) -> Result<(), CatalogError> {
        let templates: Vec<KameletTemplate> = serde_json::from_str(json)?;
        self.kamelets.extend(templates);
        Ok(())
    }

    /// Adds the traits of a JSON array of trait entries.
    pub fn register_traits_json(&mut self, json: &str) -> Result<(), CatalogError> {
        let traits: Vec<TraitModel> = serde_json::from_str(json)?;
        self.traits.extend(traits);
        Ok(())
    }

    /// Registers every `*.json`, `*.yaml` and `*.yml` descriptor below `dir`.
    pub fn load_dir(&mut self, dir: &Path) {
        let files = WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("json" | "yaml" | "yml")
                )
            })
            .sorted();

        for path in files {
            match self.load_file(&path) {
                Ok(()) => debug!("Loaded catalog descriptor {}", path.display()),
                Err(err) => warn!("Skipping catalog descriptor {}: {err}", path.display()),
            }
        }
    }

    fn load_file(&mut self, path: &Path) -> Result<(), CatalogError> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => self.register_json(&text),
            _ => self.register_yaml(&text),
        }
    }

    /// Appends the descriptors embedded in the binary.
    pub fn with_builtin(mut self) -> Catalog {
        for (name, json) in builtin::DESCRIPTORS {
            if let Err(err) = self.register_json(json) {
                warn!("Skipping built-in descriptor {name}: {err}");
            }
        }
        if let Err(err) = self.register_kamelets_json(builtin::KAMELETS) {
            warn!("Skipping built-in kamelets: {err}");
        }
        if let Err(err) = self.register_traits_json(builtin::TRAITS) {
            warn!("Skipping built-in traits: {err}");
        }
        self
    }

    pub fn builtin() -> Catalog {
        Catalog::new(AmbiguityPolicy::default()).with_builtin()
    }

    /// Every known scheme name with the descriptor it resolves to, sorted by name.
    pub fn entries(&self) -> Vec<(&str, Cow<'_, ComponentModel>)> {
        self.by_scheme
            .keys()
            .sorted()
            .filter_map(|scheme| Some((scheme.as_str(), self.lookup_scheme(scheme)?)))
            .collect()
    }

    pub fn kamelets(&self) -> &[KameletTemplate] {
        &self.kamelets
    }

    pub fn traits(&self) -> &[TraitModel] {
        &self.traits
    }

    /// The first registered trait called `name`.
    pub fn trait_model(&self, name: &str) -> Option<&TraitModel> {
        self.traits.iter().find(|model| model.name == name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl SchemeLookup for Catalog {
    fn lookup_scheme(&self, name: &str) -> Option<Cow<'_, ComponentModel>> {
        let matches = self.by_scheme.get(name)?;
        let (first, rest) = matches.split_first()?;
        let first = &self.components[*first];

        match (self.policy, rest.is_empty()) {
            (_, true) | (AmbiguityPolicy::First, false) => Some(Cow::Borrowed(first)),
            (AmbiguityPolicy::Unknown, false) => None,
            (AmbiguityPolicy::All, false) => {
                let mut merged = first.clone();
                for index in rest {
                    merged.absorb(&self.components[*index]);
                }
                Some(Cow::Owned(merged))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_catalog_dir;
    use rstest::rstest;
    use std::fs;

    const USER_TIMER: &str = r#"{
        "component": { "scheme": "timer", "syntax": "timer:name" },
        "properties": {
            "name": { "kind": "path", "required": true },
            "customOption": { "kind": "parameter", "type": "string" }
        }
    }"#;

    fn shadowed_timer(policy: AmbiguityPolicy) -> Catalog {
        let mut catalog = Catalog::new(policy);
        catalog.register_json(USER_TIMER).unwrap();
        catalog.with_builtin()
    }

    #[test]
    fn test_builtin_catalog_knows_local_channels() {
        let catalog = Catalog::builtin();
        for scheme in ["direct", "direct-vm", "seda", "timer", "log", "file", "kafka", "kamelet"] {
            assert!(catalog.lookup_scheme(scheme).is_some(), "{scheme}");
        }
        assert!(catalog.lookup_scheme("unknownscheme").is_none());
    }

    #[test]
    fn test_builtin_kamelets_and_traits() {
        let catalog = Catalog::builtin();
        let ddb = catalog
            .kamelets()
            .iter()
            .find(|template| template.id == "aws-ddb-streams-source")
            .unwrap();
        assert_eq!(ddb.kind, KameletKind::Source);

        let quarkus = catalog.trait_model("quarkus").unwrap();
        assert_eq!(quarkus.properties.len(), 2);
        assert_eq!(
            quarkus.properties["native"].default_value.as_deref(),
            Some("false")
        );
        assert!(catalog.trait_model("unknown").is_none());
    }

    #[test]
    fn test_broken_kamelet_list_is_rejected() {
        let mut catalog = Catalog::new(AmbiguityPolicy::First);
        assert!(catalog.register_kamelets_json(r#"[{ "id": "x" }]"#).is_err());
        assert!(catalog.kamelets().is_empty());
    }

    #[test]
    fn test_policy_first_prefers_earliest_registration() {
        let catalog = shadowed_timer(AmbiguityPolicy::First);
        let timer = catalog.lookup_scheme("timer").unwrap();
        assert_eq!(timer.syntax[0].name, "name");
        assert!(!timer.query_params.contains_key("period"));
    }

    #[test]
    fn test_policy_all_merges_parameters() {
        let catalog = shadowed_timer(AmbiguityPolicy::All);
        let timer = catalog.lookup_scheme("timer").unwrap();
        assert_eq!(timer.syntax[0].name, "name");
        assert!(timer.query_params.contains_key("customOption"));
        assert!(timer.query_params.contains_key("period"));
    }

    #[test]
    fn test_policy_unknown_drops_ambiguous_schemes() {
        let catalog = shadowed_timer(AmbiguityPolicy::Unknown);
        assert!(catalog.lookup_scheme("timer").is_none());
        assert!(catalog.lookup_scheme("direct").is_some());
    }

    #[rstest]
    #[case("custom.json", r#"{ "component": { "scheme": "custom", "syntax": "custom:name" } }"#)]
    #[case("custom.yaml", "component:\n  scheme: custom\n  syntax: custom:name\n")]
    #[case("nested/custom.yml", "component:\n  scheme: custom\n")]
    fn test_load_dir(#[case] file: &str, #[case] content: &str) {
        let (_temp_dir, dir) = create_test_catalog_dir();
        let path = dir.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();

        let mut catalog = Catalog::new(AmbiguityPolicy::First);
        catalog.load_dir(&dir);
        assert!(catalog.lookup_scheme("custom").is_some());
    }

    #[test]
    fn test_load_dir_skips_broken_descriptors() {
        let (_temp_dir, dir) = create_test_catalog_dir();
        fs::write(dir.join("broken.json"), "{ not json").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();
        fs::write(
            dir.join("good.json"),
            r#"{ "component": { "scheme": "good" } }"#,
        )
        .unwrap();

        let mut catalog = Catalog::new(AmbiguityPolicy::First);
        catalog.load_dir(&dir);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_from_settings_registers_extra_components_first() {
        let settings = Settings {
            extra_components: vec![USER_TIMER.to_string(), "broken".to_string()],
            ..Settings::default()
        };
        let catalog = Catalog::from_settings(&settings);
        let timer = catalog.lookup_scheme("timer").unwrap();
        assert_eq!(timer.syntax[0].name, "name");
    }

    #[test]
    fn test_entries_are_sorted_and_include_alternatives() {
        let mut catalog = Catalog::new(AmbiguityPolicy::First);
        catalog
            .register_json(r#"{ "component": { "scheme": "b", "alternativeSchemes": "b,a" } }"#)
            .unwrap();
        let schemes: Vec<_> = catalog.entries().into_iter().map(|(s, _)| s).collect();
        assert_eq!(schemes, vec!["a", "b"]);
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |name: &str| (name == "x").then(ComponentModel::default);
        assert!(lookup.lookup_scheme("x").is_some());
        assert!(lookup.lookup_scheme("y").is_none());
    }
}
