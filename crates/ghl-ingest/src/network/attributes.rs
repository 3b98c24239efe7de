//! Network-level attributes (name, description, provenance, version)

use crate::error::Result;
use crate::network::cx::CxNetwork;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Attribute that sets the network name instead of a plain attribute
pub const NAME: &str = "name";
pub const VERSION: &str = "version";
/// Provenance attribute whose `{version}` placeholder receives the loader version
pub const GENERATED_BY: &str = "prov:wasGeneratedBy";

const VERSION_PLACEHOLDER: &str = "{version}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub attribute: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// Attributes applied to every generated network, keyed by attribute name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkAttributes {
    entries: BTreeMap<String, AttributeSpec>,
}

impl NetworkAttributes {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Take the attributes of an existing network
    pub fn from_network(network: &CxNetwork) -> Self {
        let entries = network
            .network_attributes
            .iter()
            .map(|a| {
                (
                    a.name.clone(),
                    AttributeSpec {
                        attribute: a.value.clone(),
                        data_type: a.data_type.clone(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set or override the `version` attribute, keeping its declared type
    pub fn set_version(&mut self, version: &str) {
        self.entries
            .entry(VERSION.to_string())
            .and_modify(|spec| spec.attribute = Value::String(version.to_string()))
            .or_insert_with(|| AttributeSpec {
                attribute: Value::String(version.to_string()),
                data_type: None,
            });
    }

    /// Write the attributes onto `network` and return the network name.
    ///
    /// Without a `name` attribute the network is named `fallback_name`.
    pub fn apply_to(&self, network: &mut CxNetwork, fallback_name: &str, loader_version: &str) -> String {
        let mut name = None;
        for (key, spec) in &self.entries {
            match key.as_str() {
                NAME => {
                    let value = value_text(&spec.attribute);
                    network.set_name(&value);
                    name = Some(value);
                },
                GENERATED_BY => {
                    let text = value_text(&spec.attribute).replace(VERSION_PLACEHOLDER, loader_version);
                    network.set_network_attribute(key, Value::String(text), None);
                },
                _ => network.set_network_attribute(key, spec.attribute.clone(), spec.data_type.as_deref()),
            }
        }

        name.unwrap_or_else(|| {
            network.set_name(fallback_name);
            fallback_name.to_string()
        })
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
