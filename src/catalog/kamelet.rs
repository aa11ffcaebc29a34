//! Kamelet route templates addressable as `kamelet:<templateId>`.

use serde::Deserialize;

use crate::semantic::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KameletKind {
    Source,
    Sink,
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KameletTemplate {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: KameletKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl KameletTemplate {
    /// Whether an endpoint with `role` may use this template.
    ///
    /// Consumers read from sources and producers write to sinks; an endpoint of
    /// unknown role accepts any template.
    pub fn fits(&self, role: Role) -> bool {
        match role {
            Role::Consumer => self.kind == KameletKind::Source,
            Role::Producer => self.kind == KameletKind::Sink,
            Role::Unknown => true,
        }
    }
}
