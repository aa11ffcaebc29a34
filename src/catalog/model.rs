//! Component descriptors as shipped by the integration framework's catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use super::CatalogError;

/// One named, positional slot of a scheme's path syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxSlot {
    pub name: String,
    pub required: bool,
}

/// The `component` header of a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    pub scheme: String,
    #[serde(default)]
    pub syntax: String,
    /// Comma separated
    #[serde(default)]
    pub alternative_schemes: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deprecated: bool,
}

/// Metadata of a path or query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamMetadata {
    /// `path` or `parameter`
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default)]
    pub value_type: String,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub default_value: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub deprecation_note: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<String>,
}

impl ParamMetadata {
    /// Values worth offering for completion: enum members, or both booleans.
    pub fn suggested_values(&self) -> Vec<String> {
        if !self.enum_values.is_empty() {
            self.enum_values.clone()
        } else if self.value_type == "boolean" {
            vec!["true".to_string(), "false".to_string()]
        } else {
            Vec::new()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let scalar = Option::<Scalar>::deserialize(deserializer)?;
    Ok(scalar.map(|scalar| match scalar {
        Scalar::Bool(value) => value.to_string(),
        Scalar::Int(value) => value.to_string(),
        Scalar::Float(value) => value.to_string(),
        Scalar::Text(value) => value,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Descriptor {
    component: ComponentInfo,
    #[serde(default)]
    component_properties: BTreeMap<String, ParamMetadata>,
    #[serde(default)]
    properties: BTreeMap<String, ParamMetadata>,
}

/// A scheme's syntax pattern and parameter metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentModel {
    pub info: ComponentInfo,
    pub syntax: Vec<SyntaxSlot>,
    /// How many leading slots of `syntax` a `/` separated path binds.
    ///
    /// Slots after any other delimiter (`jms:type:name`, `host:port`) share the
    /// value of the last bound segment.
    pub bound_slots: usize,
    pub path_params: BTreeMap<String, ParamMetadata>,
    pub query_params: BTreeMap<String, ParamMetadata>,
    /// Component-level options, configured as `camel.component.<scheme>.<name>`.
    pub component_params: BTreeMap<String, ParamMetadata>,
}

impl ComponentModel {
    pub fn from_json(json: &str) -> Result<ComponentModel, CatalogError> {
        let descriptor: Descriptor = serde_json::from_str(json)?;
        ComponentModel::from_descriptor(descriptor)
    }

    pub fn from_yaml(yaml: &str) -> Result<ComponentModel, CatalogError> {
        let descriptor: Descriptor = serde_yaml::from_str(yaml)?;
        ComponentModel::from_descriptor(descriptor)
    }

    fn from_descriptor(descriptor: Descriptor) -> Result<ComponentModel, CatalogError> {
        let Descriptor {
            component: info,
            component_properties: component_params,
            properties,
        } = descriptor;

        if info.scheme.trim().is_empty() {
            return Err(CatalogError::MissingScheme);
        }

        let (path_params, query_params): (BTreeMap<_, _>, BTreeMap<_, _>) = properties
            .into_iter()
            .partition(|(_, metadata)| metadata.kind == "path");

        let pattern = syntax_pattern(&info.scheme, &info.syntax);
        let bound_slots = slash_bound_slots(pattern);
        let syntax = syntax_slots(pattern)
            .into_iter()
            .map(|name| SyntaxSlot {
                required: path_params.get(&name).is_some_and(|meta| meta.required),
                name,
            })
            .collect();

        Ok(ComponentModel {
            info,
            syntax,
            bound_slots,
            path_params,
            query_params,
            component_params,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.info.scheme
    }

    /// The primary scheme followed by the alternative ones.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.info.scheme.as_str()).chain(
            self.info
                .alternative_schemes
                .split(',')
                .map(str::trim)
                .filter(|scheme| !scheme.is_empty() && *scheme != self.info.scheme),
        )
    }

    /// Adds the parameters of `other` that this model does not define yet.
    pub(crate) fn absorb(&mut self, other: &ComponentModel) {
        for (key, metadata) in &other.path_params {
            self.path_params
                .entry(key.clone())
                .or_insert_with(|| metadata.clone());
        }
        for (key, metadata) in &other.query_params {
            self.query_params
                .entry(key.clone())
                .or_insert_with(|| metadata.clone());
        }
        for (key, metadata) in &other.component_params {
            self.component_params
                .entry(key.clone())
                .or_insert_with(|| metadata.clone());
        }
    }
}

/// The part of a syntax such as `jms:destinationType:destinationName` after the scheme.
fn syntax_pattern<'s>(scheme: &str, syntax: &'s str) -> &'s str {
    syntax
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix(':'))
        .or_else(|| syntax.split_once(':').map(|(_, rest)| rest))
        .unwrap_or("")
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Slot names of a syntax pattern, whatever delimits them.
fn syntax_slots(pattern: &str) -> Vec<String> {
    pattern
        .split(|c: char| !is_name_char(c))
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Number of leading slots joined by a single `/`.
fn slash_bound_slots(pattern: &str) -> usize {
    let mut count = 0;
    let mut rest = pattern;
    loop {
        let name_len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
        if name_len == 0 {
            return count;
        }
        count += 1;
        match rest[name_len..].strip_prefix('/') {
            Some(next) => rest = next,
            None => return count,
        }
    }
}
