//! Canonical table → CX network

use crate::error::{IngestError, Result};
use crate::network::cx::CxNetwork;
use crate::network::load_plan::{LoadPlan, NodePlan, PropertyColumn};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Builds networks from canonical tables following a load plan
#[derive(Debug, Clone)]
pub struct NetworkAssembler {
    plan: LoadPlan,
}

/// Column positions resolved once per table
struct ResolvedNodePlan<'p> {
    name: usize,
    rep: Option<usize>,
    properties: Vec<(usize, &'p PropertyColumn)>,
}

impl<'p> ResolvedNodePlan<'p> {
    fn new(plan: &'p NodePlan, header: &[String]) -> Self {
        Self {
            name: position(header, &plan.node_name_column),
            rep: plan.rep_column.as_deref().map(|column| position(header, column)),
            properties: plan
                .property_columns
                .iter()
                .map(|p| (position(header, p.column()), p))
                .collect(),
        }
    }
}

/// Header position of a column already checked by [`LoadPlan::validate`]
fn position(header: &[String], column: &str) -> usize {
    header.iter().position(|h| h == column).unwrap_or_default()
}

impl NetworkAssembler {
    pub fn new(plan: LoadPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &LoadPlan {
        &self.plan
    }

    pub fn assemble_file(&self, path: &Path) -> Result<CxNetwork> {
        self.assemble(std::fs::File::open(path)?)
    }

    /// Read a comma-delimited table with header and build its network.
    ///
    /// Nodes are shared by name across rows, keeping the first row's rep and
    /// attributes; every row contributes one edge.
    pub fn assemble<R: Read>(&self, input: R) -> Result<CxNetwork> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input);
        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        self.plan.validate(&header)?;

        let source = ResolvedNodePlan::new(&self.plan.source_plan, &header);
        let target = ResolvedNodePlan::new(&self.plan.target_plan, &header);
        let predicate = self
            .plan
            .edge_plan
            .predicate_id_column
            .as_deref()
            .map(|column| position(&header, column));
        let edge_properties: Vec<(usize, &PropertyColumn)> = self
            .plan
            .edge_plan
            .property_columns
            .iter()
            .map(|p| (position(&header, p.column()), p))
            .collect();

        let mut network = CxNetwork::new();
        let mut node_ids: HashMap<String, u64> = HashMap::new();

        for record in reader.records() {
            let record = record?;
            let field = |index: usize| record.get(index).unwrap_or_default();

            let source_id = add_node(&mut network, &mut node_ids, &source, &field)?;
            let target_id = add_node(&mut network, &mut node_ids, &target, &field)?;

            let interaction = predicate
                .map(field)
                .filter(|p| !p.is_empty())
                .or(self.plan.edge_plan.default_predicate.as_deref())
                .map(str::to_string);
            let edge = network.add_edge(source_id, target_id, interaction);

            for (index, property) in &edge_properties {
                let (value, data_type) = typed_value(property, field(*index))?;
                network.add_edge_attribute(edge, property.attribute(), value, data_type);
            }
        }

        debug!(
            nodes = network.nodes.len(),
            edges = network.edges.len(),
            "Assembled network"
        );
        Ok(network)
    }
}

fn add_node<'r>(
    network: &mut CxNetwork,
    node_ids: &mut HashMap<String, u64>,
    plan: &ResolvedNodePlan<'_>,
    field: &impl Fn(usize) -> &'r str,
) -> Result<u64> {
    let name = field(plan.name);
    if let Some(id) = node_ids.get(name) {
        return Ok(*id);
    }

    let represents = plan.rep.map(|i| field(i).to_string()).filter(|r| !r.is_empty());
    let id = network.add_node(name, represents);
    node_ids.insert(name.to_string(), id);

    for (index, property) in &plan.properties {
        let (value, data_type) = typed_value(property, field(*index))?;
        network.add_node_attribute(id, property.attribute(), value, data_type);
    }
    Ok(id)
}

fn typed_value(
    property: &PropertyColumn,
    raw: &str,
) -> Result<(serde_json::Value, Option<&'static str>)> {
    let data_type = property.data_type();
    let value = data_type.convert(raw).ok_or_else(|| {
        IngestError::LoadPlan(format!(
            "cannot convert '{}' in column '{}' to {}",
            raw,
            property.column(),
            data_type.as_str()
        ))
    })?;
    Ok((value, Some(data_type.as_str())))
}
