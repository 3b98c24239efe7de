//! Common types used across the GeneHancer loader

use crate::error::GhlError;
use serde::{Deserialize, Serialize};

// ============================================================================
// Table Layouts
// ============================================================================

/// Header assumed for GeneHancer files that ship without a header row.
pub const DEFAULT_INPUT_HEADER: [&str; 9] = [
    "chrom",
    "source",
    "feature name",
    "start",
    "end",
    "score",
    "strand",
    "frame",
    "attributes",
];

/// Header of the canonical table handed to the network assembler.
///
/// This column set is a stable contract: the bundled load plan and every
/// downstream consumer address columns by these names.
pub const CANONICAL_HEADER: [&str; 13] = [
    "Enhancer",
    "EnhancerRep",
    "Chromosome",
    "StartLocation",
    "EndLocation",
    "EnhancerConfidenceScore",
    "EnhancerType",
    "EnhancerEnhancerType",
    "Gene",
    "GeneRep",
    "GeneEnhancerScore",
    "GeneType",
    "GeneGeneType",
];

/// Namespace prefix for GeneHancer enhancer identifiers
pub const EN_GENECARDS: &str = "en-genecards:";

/// Namespace prefix for every other identifier
pub const P_GENECARDS: &str = "p-genecards:";

// ============================================================================
// Gene Category
// ============================================================================

/// Coarse biotype assigned to a gene symbol.
///
/// Serialized with the human-readable labels used in the gene types file and
/// in the `GeneGeneType` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneCategory {
    #[serde(rename = "Protein coding gene")]
    ProteinCoding,
    #[serde(rename = "ncRNA gene")]
    NcRna,
    #[serde(rename = "Other gene")]
    Other,
}

impl GeneCategory {
    pub const ALL: [GeneCategory; 3] = [
        GeneCategory::ProteinCoding,
        GeneCategory::NcRna,
        GeneCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GeneCategory::ProteinCoding => "Protein coding gene",
            GeneCategory::NcRna => "ncRNA gene",
            GeneCategory::Other => "Other gene",
        }
    }
}

impl std::str::FromStr for GeneCategory {
    type Err = GhlError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        GeneCategory::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| GhlError::UnknownGeneCategory(s.to_string()))
    }
}

impl std::fmt::Display for GeneCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Node Role
// ============================================================================

/// Role tag written next to each side of a canonical edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Enhancer,
    Gene,
}

impl NodeRole {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeRole::Enhancer => "enhancer",
            NodeRole::Gene => "gene",
        }
    }
}

impl std::str::FromStr for NodeRole {
    type Err = GhlError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "enhancer" => Ok(NodeRole::Enhancer),
            "gene" => Ok(NodeRole::Gene),
            _ => Err(GhlError::UnknownNodeRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Canonical Edge Record
// ============================================================================

/// One enhancer → gene association, i.e. one row of the canonical table.
///
/// Records are built once during reformatting and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// GeneHancer identifier (e.g., "GH01F220777")
    pub enhancer: String,

    /// Namespace-qualified enhancer identifier
    pub enhancer_rep: String,

    pub chromosome: String,
    pub start: String,
    pub end: String,

    /// GeneHancer confidence score of the enhancer
    pub confidence_score: String,

    /// Feature label from the source row (e.g., "Enhancer", "Promoter/Enhancer")
    pub enhancer_type: String,

    /// Gene symbol as written in `connected_gene=`
    pub gene: String,

    /// Namespace-qualified gene identifier
    pub gene_rep: String,

    /// Gene–enhancer association score
    pub gene_enhancer_score: String,

    pub gene_category: GeneCategory,
}

impl EdgeRecord {
    /// Render the record in [`CANONICAL_HEADER`] column order
    pub fn to_row(&self) -> [&str; 13] {
        [
            &self.enhancer,
            &self.enhancer_rep,
            &self.chromosome,
            &self.start,
            &self.end,
            &self.confidence_score,
            NodeRole::Enhancer.as_str(),
            &self.enhancer_type,
            &self.gene,
            &self.gene_rep,
            &self.gene_enhancer_score,
            NodeRole::Gene.as_str(),
            self.gene_category.label(),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_category_round_trips_labels() {
        for category in GeneCategory::ALL {
            assert_eq!(category.label().parse::<GeneCategory>().unwrap(), category);
        }
        assert!("protein coding".parse::<GeneCategory>().is_err());
    }

    #[test]
    fn test_gene_category_serde_uses_labels() {
        let json = serde_json::to_string(&GeneCategory::NcRna).unwrap();
        assert_eq!(json, "\"ncRNA gene\"");

        let parsed: GeneCategory = serde_json::from_str("\"Other gene\"").unwrap();
        assert_eq!(parsed, GeneCategory::Other);
    }

    #[test]
    fn test_node_role_from_str() {
        assert_eq!("enhancer".parse::<NodeRole>().unwrap(), NodeRole::Enhancer);
        assert_eq!("gene".parse::<NodeRole>().unwrap(), NodeRole::Gene);
        assert!("Gene".parse::<NodeRole>().is_err());
    }

    #[test]
    fn test_edge_record_row_matches_header_order() {
        let record = EdgeRecord {
            enhancer: "GH1".to_string(),
            enhancer_rep: "p-genecards:GH1".to_string(),
            chromosome: "chr1".to_string(),
            start: "1".to_string(),
            end: "1000".to_string(),
            confidence_score: "0.9".to_string(),
            enhancer_type: "Enhancer".to_string(),
            gene: "A-B".to_string(),
            gene_rep: "p-genecards:A-B".to_string(),
            gene_enhancer_score: "1.5".to_string(),
            gene_category: GeneCategory::Other,
        };

        let row = record.to_row();
        assert_eq!(row.len(), CANONICAL_HEADER.len());
        assert_eq!(row[0], "GH1");
        assert_eq!(row[6], "enhancer");
        assert_eq!(row[8], "A-B");
        assert_eq!(row[10], "1.5");
        assert_eq!(row[11], "gene");
        assert_eq!(row[12], "Other gene");
    }
}
