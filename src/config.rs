use std::path::Path;

use anyhow::anyhow;
use config::{Config, File, FileFormat};
use serde::Deserialize;
use tower_lsp::lsp_types::ClientCapabilities;

use crate::catalog::AmbiguityPolicy;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Schemes whose first path segment names an in-process channel
    pub local_channel_schemes: Vec<String>,
    /// Node kinds (XML elements, property keys) that send to their URI
    pub producer_elements: Vec<String>,
    /// Node kinds that receive from their URI
    pub consumer_elements: Vec<String>,
    /// Extra directory of component descriptors; `~` is expanded
    #[serde(default)]
    pub catalog_path: Option<String>,
    /// Component descriptors as JSON strings, registered before everything else
    pub extra_components: Vec<String>,
    pub ambiguity_policy: AmbiguityPolicy,
    pub unknown_property_diagnostics: bool,
    pub deprecated_diagnostics: bool,
    pub required_path_diagnostics: bool,
    pub unresolved_channel_diagnostics: bool,
    pub unknown_scheme_diagnostics: bool,
    pub hover: bool,
    pub completion_limit: usize,
}

impl Settings {
    /// Layers, lowest priority first: built-in defaults, the user's settings
    /// file, the workspace's `.camel-ls` file, the `camel` object of the
    /// client's initialization options, then client capabilities.
    pub fn new(
        root_dir: Option<&Path>,
        init_options: Option<&serde_json::Value>,
        capabilities: &ClientCapabilities,
    ) -> anyhow::Result<Settings> {
        let expanded = shellexpand::tilde("~/.config/camel-ls/settings");
        let mut builder = Config::builder()
            .add_source(File::with_name(&expanded).required(false));

        if let Some(root_dir) = root_dir {
            builder = builder.add_source(
                File::with_name(&format!(
                    "{}/.camel-ls",
                    root_dir
                        .to_str()
                        .ok_or(anyhow!("Can't convert root_dir to str"))?
                ))
                .required(false),
            );
        }

        if let Some(camel) = init_options.and_then(|options| options.get("camel")) {
            builder = builder.add_source(File::from_str(&camel.to_string(), FileFormat::Json));
        }

        let settings = builder
            .set_default("local_channel_schemes", vec!["direct", "direct-vm"])?
            .set_default(
                "producer_elements",
                vec!["to", "toD", "wireTap", "enrich", "camel.sink.url"],
            )?
            .set_default(
                "consumer_elements",
                vec!["from", "pollEnrich", "camel.source.url"],
            )?
            .set_default("extra_components", Vec::<String>::new())?
            .set_default("ambiguity_policy", "First")?
            .set_default("unknown_property_diagnostics", true)?
            .set_default("deprecated_diagnostics", true)?
            .set_default("required_path_diagnostics", true)?
            .set_default("unresolved_channel_diagnostics", true)?
            .set_default("unknown_scheme_diagnostics", false)?
            .set_default("hover", true)?
            .set_default("completion_limit", 50)?
            .set_override_option(
                "hover",
                capabilities
                    .text_document
                    .as_ref()
                    .and_then(|it| match it.hover.is_none() {
                        true => Some(false),
                        false => None,
                    }),
            )?
            .build()
            .map_err(|err| anyhow!("Build err: {err}"))?;

        let settings = settings.try_deserialize::<Settings>()?;

        anyhow::Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            local_channel_schemes: vec!["direct".to_string(), "direct-vm".to_string()],
            producer_elements: ["to", "toD", "wireTap", "enrich", "camel.sink.url"]
                .map(String::from)
                .to_vec(),
            consumer_elements: ["from", "pollEnrich", "camel.source.url"]
                .map(String::from)
                .to_vec(),
            catalog_path: None,
            extra_components: Vec::new(),
            ambiguity_policy: AmbiguityPolicy::First,
            unknown_property_diagnostics: true,
            deprecated_diagnostics: true,
            required_path_diagnostics: true,
            unresolved_channel_diagnostics: true,
            unknown_scheme_diagnostics: false,
            hover: true,
            completion_limit: 50,
        }
    }
}
