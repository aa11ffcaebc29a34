//! Producer/consumer roles and local-channel identity.
//!
//! Both classifications are pure lookups in sets configured through
//! [`Settings`]; nothing here inspects document text.

use std::collections::{HashMap, HashSet};

use crate::config::Settings;
use crate::uri::UriInstance;

/// Direction of message flow at an endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Messages are sent to the endpoint (`to`).
    Producer,
    /// Messages originate from the endpoint (`from`).
    Consumer,
    #[default]
    Unknown,
}

impl Role {
    pub fn opposite(self) -> Option<Role> {
        match self {
            Role::Producer => Some(Role::Consumer),
            Role::Consumer => Some(Role::Producer),
            Role::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    roles: HashMap<String, Role>,
    local_channels: HashSet<String>,
}

impl Classifier {
    pub fn new<P, C, L>(producers: P, consumers: C, local_channels: L) -> Classifier
    where
        P: IntoIterator,
        P::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let roles = producers
            .into_iter()
            .map(|kind| (kind.into(), Role::Producer))
            .chain(consumers.into_iter().map(|kind| (kind.into(), Role::Consumer)))
            .collect();

        Classifier {
            roles,
            local_channels: local_channels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Classifier {
        Classifier::new(
            settings.producer_elements.iter().cloned(),
            settings.consumer_elements.iter().cloned(),
            settings.local_channel_schemes.iter().cloned(),
        )
    }

    /// Role implied by the kind of syntax node owning a URI.
    pub fn classify_role(&self, node_kind: &str) -> Role {
        self.roles.get(node_kind).copied().unwrap_or_default()
    }

    pub fn is_local_channel_scheme(&self, scheme: &str) -> bool {
        self.local_channels.contains(scheme)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::from_settings(&Settings::default())
    }
}

/// The channel name of a local-channel URI: its first path segment, when non-empty.
pub fn channel_identifier(uri: &UriInstance) -> Option<&str> {
    uri.path_params()
        .first()
        .map(|param| param.value.as_str())
        .filter(|value| !value.is_empty())
}
