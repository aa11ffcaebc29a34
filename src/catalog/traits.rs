//! Camel K traits configurable from a modeline as `trait=<name>.<property>=<value>`.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::ParamMetadata;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TraitModel {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: BTreeMap<String, ParamMetadata>,
}
