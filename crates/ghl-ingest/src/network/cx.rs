//! Minimal CX (network exchange) document model
//!
//! Covers the aspects the loader produces or consumes: nodes, edges, node and
//! edge attributes, network attributes, plus any other aspect carried through
//! untouched (visual styles in particular). Documents are read from and written
//! to the CX1 layout, a JSON array of single-key aspect fragments.

use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::path::Path;

pub const NODES: &str = "nodes";
pub const EDGES: &str = "edges";
pub const NODE_ATTRIBUTES: &str = "nodeAttributes";
pub const EDGE_ATTRIBUTES: &str = "edgeAttributes";
pub const NETWORK_ATTRIBUTES: &str = "networkAttributes";

/// Aspects holding a Cytoscape visual style
pub const STYLE_ASPECTS: [&str; 2] = ["cyVisualProperties", "visualProperties"];

/// Bookkeeping aspects regenerated on every write
const GENERATED_ASPECTS: [&str; 3] = ["numberVerification", "metaData", "status"];

const LONG_NUMBER: u64 = 281_474_976_710_655;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxNode {
    #[serde(rename = "@id")]
    pub id: u64,
    #[serde(rename = "n", default)]
    pub name: String,
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub represents: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxEdge {
    #[serde(rename = "@id")]
    pub id: u64,
    #[serde(rename = "s")]
    pub source: u64,
    #[serde(rename = "t")]
    pub target: u64,
    #[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<String>,
}

/// Node or edge attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxElementAttribute {
    #[serde(rename = "po")]
    pub element: u64,
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "v")]
    pub value: Value,
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxNetworkAttribute {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "v")]
    pub value: Value,
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// In-memory CX network
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CxNetwork {
    pub nodes: Vec<CxNode>,
    pub edges: Vec<CxEdge>,
    pub node_attributes: Vec<CxElementAttribute>,
    pub edge_attributes: Vec<CxElementAttribute>,
    pub network_attributes: Vec<CxNetworkAttribute>,
    /// Other aspects by name, in first-seen order
    pub opaque_aspects: Vec<(String, Vec<Value>)>,
    next_node_id: u64,
    next_edge_id: u64,
}

impl CxNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>, represents: Option<String>) -> u64 {
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.nodes.push(CxNode {
            id,
            name: name.into(),
            represents,
        });
        id
    }

    pub fn add_edge(&mut self, source: u64, target: u64, interaction: Option<String>) -> u64 {
        let id = self.next_edge_id;
        self.next_edge_id += 1;
        self.edges.push(CxEdge {
            id,
            source,
            target,
            interaction,
        });
        id
    }

    pub fn add_node_attribute(&mut self, node: u64, name: &str, value: Value, data_type: Option<&str>) {
        self.node_attributes.push(element_attribute(node, name, value, data_type));
    }

    pub fn add_edge_attribute(&mut self, edge: u64, name: &str, value: Value, data_type: Option<&str>) {
        self.edge_attributes.push(element_attribute(edge, name, value, data_type));
    }

    /// Set a network attribute, replacing any attribute of the same name
    pub fn set_network_attribute(&mut self, name: &str, value: Value, data_type: Option<&str>) {
        let attribute = CxNetworkAttribute {
            name: name.to_string(),
            value,
            data_type: data_type.filter(|d| *d != "string").map(str::to_string),
        };
        match self.network_attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => *existing = attribute,
            None => self.network_attributes.push(attribute),
        }
    }

    pub fn network_attribute(&self, name: &str) -> Option<&CxNetworkAttribute> {
        self.network_attributes.iter().find(|a| a.name == name)
    }

    pub fn name(&self) -> Option<&str> {
        self.network_attribute("name").and_then(|a| a.value.as_str())
    }

    pub fn set_name(&mut self, name: &str) {
        self.set_network_attribute("name", Value::String(name.to_string()), None);
    }

    pub fn opaque_aspect(&self, name: &str) -> Option<&[Value]> {
        self.opaque_aspects
            .iter()
            .find(|(aspect, _)| aspect == name)
            .map(|(_, elements)| elements.as_slice())
    }

    /// Replace this network's visual style with the template's.
    ///
    /// Per-element bypasses are dropped since they reference the template's
    /// node and edge ids. Returns false when the template carries no style.
    pub fn apply_style_from(&mut self, template: &CxNetwork) -> bool {
        let style: Vec<(String, Vec<Value>)> = template
            .opaque_aspects
            .iter()
            .filter(|(name, _)| STYLE_ASPECTS.contains(&name.as_str()))
            .map(|(name, elements)| {
                let kept = elements
                    .iter()
                    .filter(|e| !matches!(e.get("properties_of").and_then(Value::as_str), Some("nodes" | "edges")))
                    .cloned()
                    .collect();
                (name.clone(), kept)
            })
            .collect();

        if style.is_empty() {
            return false;
        }
        self.opaque_aspects
            .retain(|(name, _)| !STYLE_ASPECTS.contains(&name.as_str()));
        self.opaque_aspects.extend(style);
        true
    }

    /// Build a network from a CX1 aspect array
    pub fn from_value(cx: Value) -> Result<Self> {
        let Value::Array(fragments) = cx else {
            return Err(IngestError::Cx("expected a JSON array of aspects".to_string()));
        };

        let mut network = CxNetwork::new();
        for fragment in fragments {
            let Value::Object(fragment) = fragment else {
                return Err(IngestError::Cx("aspect fragment is not an object".to_string()));
            };
            for (aspect, elements) in fragment {
                network.absorb(&aspect, elements)?;
            }
        }
        network.next_node_id = network.nodes.iter().map(|n| n.id + 1).max().unwrap_or(0);
        network.next_edge_id = network.edges.iter().map(|e| e.id + 1).max().unwrap_or(0);
        Ok(network)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    fn absorb(&mut self, aspect: &str, elements: Value) -> Result<()> {
        if GENERATED_ASPECTS.contains(&aspect) {
            return Ok(());
        }
        let Value::Array(elements) = elements else {
            return Err(IngestError::Cx(format!("aspect '{}' is not an array", aspect)));
        };
        match aspect {
            NODES => self.nodes.extend(parse_elements(aspect, elements)?),
            EDGES => self.edges.extend(parse_elements(aspect, elements)?),
            NODE_ATTRIBUTES => self.node_attributes.extend(parse_elements(aspect, elements)?),
            EDGE_ATTRIBUTES => self.edge_attributes.extend(parse_elements(aspect, elements)?),
            NETWORK_ATTRIBUTES => self.network_attributes.extend(parse_elements(aspect, elements)?),
            _ => match self.opaque_aspects.iter_mut().find(|(name, _)| name == aspect) {
                Some((_, existing)) => existing.extend(elements),
                None => self.opaque_aspects.push((aspect.to_string(), elements)),
            },
        }
        Ok(())
    }

    /// CX1 aspect array with pre- and post-metadata
    pub fn to_value(&self) -> Result<Value> {
        let mut data: Vec<(String, Vec<Value>)> = Vec::new();
        push_aspect(&mut data, NETWORK_ATTRIBUTES, &self.network_attributes)?;
        push_aspect(&mut data, NODES, &self.nodes)?;
        push_aspect(&mut data, EDGES, &self.edges)?;
        push_aspect(&mut data, NODE_ATTRIBUTES, &self.node_attributes)?;
        push_aspect(&mut data, EDGE_ATTRIBUTES, &self.edge_attributes)?;
        data.extend(
            self.opaque_aspects
                .iter()
                .filter(|(_, elements)| !elements.is_empty())
                .cloned(),
        );

        let metadata: Vec<Value> = data
            .iter()
            .map(|(name, elements)| {
                let mut entry = json!({
                    "name": name,
                    "elementCount": elements.len(),
                    "version": "1.0",
                    "consistencyGroup": 1,
                });
                if let Some(counter) = self.id_counter(name) {
                    entry["idCounter"] = json!(counter);
                }
                entry
            })
            .collect();

        let mut fragments = Vec::with_capacity(data.len() + 3);
        fragments.push(json!({ "numberVerification": [{ "longNumber": LONG_NUMBER }] }));
        fragments.push(json!({ "metaData": metadata }));
        for (name, elements) in data {
            fragments.push(json!({ name: elements }));
        }
        fragments.push(json!({ "status": [{ "error": "", "success": true }] }));
        Ok(Value::Array(fragments))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.to_value()?)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn id_counter(&self, aspect: &str) -> Option<u64> {
        match aspect {
            NODES => self.nodes.iter().map(|n| n.id).max(),
            EDGES => self.edges.iter().map(|e| e.id).max(),
            _ => None,
        }
    }
}

fn element_attribute(element: u64, name: &str, value: Value, data_type: Option<&str>) -> CxElementAttribute {
    CxElementAttribute {
        element,
        name: name.to_string(),
        value,
        data_type: data_type.filter(|d| *d != "string").map(str::to_string),
    }
}

fn parse_elements<T: serde::de::DeserializeOwned>(aspect: &str, elements: Vec<Value>) -> Result<Vec<T>> {
    elements
        .into_iter()
        .map(|e| serde_json::from_value(e).map_err(|err| IngestError::Cx(format!("{}: {}", aspect, err))))
        .collect()
}

fn push_aspect<T: Serialize>(data: &mut Vec<(String, Vec<Value>)>, name: &str, elements: &[T]) -> Result<()> {
    if elements.is_empty() {
        return Ok(());
    }
    let values = elements
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    data.push((name.to_string(), values));
    Ok(())
}
