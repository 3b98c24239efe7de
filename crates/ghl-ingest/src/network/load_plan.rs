//! Load plans: how canonical table columns become nodes, edges and attributes

use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Attribute value types understood by the assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    #[default]
    String,
    Double,
    Integer,
    Long,
    Boolean,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Double => "double",
            AttributeType::Integer => "integer",
            AttributeType::Long => "long",
            AttributeType::Boolean => "boolean",
        }
    }

    /// Convert a table cell into a typed attribute value
    pub fn convert(&self, raw: &str) -> Option<Value> {
        match self {
            AttributeType::String => Some(Value::String(raw.to_string())),
            AttributeType::Double => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            AttributeType::Integer => raw.trim().parse::<i32>().ok().map(Value::from),
            AttributeType::Long => raw.trim().parse::<i64>().ok().map(Value::from),
            AttributeType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
        }
    }
}

/// A column copied into an attribute, either by bare name or with options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyColumn {
    Name(String),
    Spec {
        column_name: String,
        #[serde(default)]
        attribute_name: Option<String>,
        #[serde(default)]
        data_type: Option<AttributeType>,
    },
}

impl PropertyColumn {
    pub fn column(&self) -> &str {
        match self {
            PropertyColumn::Name(name) => name,
            PropertyColumn::Spec { column_name, .. } => column_name,
        }
    }

    pub fn attribute(&self) -> &str {
        match self {
            PropertyColumn::Name(name) => name,
            PropertyColumn::Spec {
                column_name,
                attribute_name,
                ..
            } => attribute_name.as_deref().unwrap_or(column_name),
        }
    }

    pub fn data_type(&self) -> AttributeType {
        match self {
            PropertyColumn::Name(_) => AttributeType::String,
            PropertyColumn::Spec { data_type, .. } => data_type.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePlan {
    pub node_name_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_column: Option<String>,
    #[serde(default)]
    pub property_columns: Vec<PropertyColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgePlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_predicate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate_id_column: Option<String>,
    #[serde(default)]
    pub property_columns: Vec<PropertyColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadPlan {
    pub source_plan: NodePlan,
    pub target_plan: NodePlan,
    pub edge_plan: EdgePlan,
}

impl LoadPlan {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| IngestError::LoadPlan(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Every column the plan reads
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        node_columns(&self.source_plan)
            .chain(node_columns(&self.target_plan))
            .chain(self.edge_plan.predicate_id_column.as_deref())
            .chain(self.edge_plan.property_columns.iter().map(PropertyColumn::column))
    }

    /// Fail on the first column the plan needs that `header` lacks
    pub fn validate<S: AsRef<str>>(&self, header: &[S]) -> Result<()> {
        match self
            .columns()
            .find(|column| !header.iter().any(|h| h.as_ref() == *column))
        {
            Some(missing) => Err(IngestError::LoadPlan(format!(
                "column '{}' is not in the table header",
                missing
            ))),
            None => Ok(()),
        }
    }
}

fn node_columns(plan: &NodePlan) -> impl Iterator<Item = &str> {
    std::iter::once(plan.node_name_column.as_str())
        .chain(plan.rep_column.as_deref())
        .chain(plan.property_columns.iter().map(PropertyColumn::column))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ghl_common::types::CANONICAL_HEADER;

    const PLAN: &str = r#"{
        "source_plan": {
            "node_name_column": "Enhancer",
            "rep_column": "EnhancerRep",
            "property_columns": [
                "Chromosome",
                {"column_name": "StartLocation", "data_type": "integer"},
                {"column_name": "EnhancerConfidenceScore", "attribute_name": "ConfidenceScore", "data_type": "double"}
            ]
        },
        "target_plan": {"node_name_column": "Gene"},
        "edge_plan": {"default_predicate": "enhances"}
    }"#;

    #[test]
    fn test_property_column_forms() {
        let plan = LoadPlan::from_json_str(PLAN).unwrap();
        let columns = &plan.source_plan.property_columns;

        assert_eq!(columns[0].column(), "Chromosome");
        assert_eq!(columns[0].attribute(), "Chromosome");
        assert_eq!(columns[0].data_type(), AttributeType::String);

        assert_eq!(columns[1].attribute(), "StartLocation");
        assert_eq!(columns[1].data_type(), AttributeType::Integer);

        assert_eq!(columns[2].column(), "EnhancerConfidenceScore");
        assert_eq!(columns[2].attribute(), "ConfidenceScore");
        assert_eq!(columns[2].data_type(), AttributeType::Double);

        assert!(plan.target_plan.rep_column.is_none());
        assert_eq!(plan.edge_plan.default_predicate.as_deref(), Some("enhances"));
    }

    #[test]
    fn test_validate_against_header() {
        let plan = LoadPlan::from_json_str(PLAN).unwrap();
        assert!(plan.validate(&CANONICAL_HEADER).is_ok());

        let err = plan.validate(&["Enhancer", "Gene"]).unwrap_err();
        assert!(err.to_string().contains("EnhancerRep"));
    }

    #[test]
    fn test_invalid_plan_is_a_load_plan_error() {
        let err = LoadPlan::from_json_str(r#"{"source_plan": {}}"#).unwrap_err();
        assert!(matches!(err, IngestError::LoadPlan(_)));

        let err = LoadPlan::from_json_str(
            r#"{"source_plan": {"node_name_column": "A", "property_columns": [{"column_name": "B", "data_type": "list_of_string"}]},
                "target_plan": {"node_name_column": "C"}, "edge_plan": {}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::LoadPlan(_)));
    }

    #[test]
    fn test_convert_values() {
        assert_eq!(AttributeType::Double.convert("1.5"), Some(serde_json::json!(1.5)));
        assert_eq!(AttributeType::Integer.convert(" 100 "), Some(serde_json::json!(100)));
        assert_eq!(AttributeType::Long.convert("12345678901"), Some(serde_json::json!(12345678901i64)));
        assert_eq!(AttributeType::Boolean.convert("TRUE"), Some(Value::Bool(true)));
        assert_eq!(AttributeType::String.convert("chr1"), Some(serde_json::json!("chr1")));
        assert_eq!(AttributeType::Integer.convert("1.5"), None);
        assert_eq!(AttributeType::Double.convert("NaN"), None);
    }
}
