//! Naming-convention patterns and the `type_of_gene` mapping table

use crate::error::Result;
use ghl_common::types::GeneCategory;
use regex::RegexSet;

/// Symbols known to be non-coding before any lookup
const KNOWN_NCRNA: &[&str] = &[
    r"^LINC[0-9-]+$",
    r"^LOC[0-9-]+$",
    r"^GC([0-9]+|MT)[A-Z]+[0-9]+",
];

/// Historical non-coding prefixes, tried only after the lookup found nothing
const FALLBACK_NCRNA: &[&str] = &[
    r"^RF[0-9]{5}",
    r"^HSALNG[0-9]+",
    r"^[MmPp][Ii][Rr]",
    r"^[Ll][Nn][Cc]",
    r"^[A-Z]{2}[0-9-]+$",
    r"^5[A-Z0-9]{3}_",
    r"^hsa-miR-[0-9-]+",
    r"^NONHSAG[0-9.-]+$",
    r"^[LZ][0-9-]+",
    r"^SNOR[A-Z0-9-]+$",
];

/// `type_of_gene` values by category, checked in this order and anchored at the start
const TYPE_OF_GENE_TABLE: &[(GeneCategory, &[&str])] = &[
    (
        GeneCategory::ProteinCoding,
        &[r"^protein(_|-)coding", r"^IG_(C|D|J|LV|V)_gene"],
    ),
    (GeneCategory::NcRna, &[r"^.*RNA", r"^ribozyme"]),
    (
        GeneCategory::Other,
        &[r"^.*pseudo.*", r"^TEC", r"^other", r"^unknown"],
    ),
];

/// Compiled pattern sets used by the resolver
#[derive(Debug, Clone)]
pub struct GenePatterns {
    known_ncrna: RegexSet,
    fallback_ncrna: RegexSet,
    type_of_gene: Vec<(GeneCategory, RegexSet)>,
}

impl GenePatterns {
    pub fn new() -> Result<Self> {
        let type_of_gene = TYPE_OF_GENE_TABLE
            .iter()
            .map(|(category, patterns)| Ok((*category, RegexSet::new(*patterns)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            known_ncrna: RegexSet::new(KNOWN_NCRNA)?,
            fallback_ncrna: RegexSet::new(FALLBACK_NCRNA)?,
            type_of_gene,
        })
    }

    pub fn known_ncrna(&self, symbol: &str) -> Option<GeneCategory> {
        self.known_ncrna.is_match(symbol).then_some(GeneCategory::NcRna)
    }

    pub fn fallback_ncrna(&self, symbol: &str) -> Option<GeneCategory> {
        self.fallback_ncrna.is_match(symbol).then_some(GeneCategory::NcRna)
    }

    /// Map an annotation-service `type_of_gene` string onto a category
    pub fn map_type_of_gene(&self, type_of_gene: &str) -> Option<GeneCategory> {
        self.type_of_gene
            .iter()
            .find(|(_, set)| set.is_match(type_of_gene))
            .map(|(category, _)| *category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ncrna_patterns() {
        let patterns = GenePatterns::new().unwrap();
        assert_eq!(patterns.known_ncrna("LINC00649"), Some(GeneCategory::NcRna));
        assert_eq!(patterns.known_ncrna("LOC105378948"), Some(GeneCategory::NcRna));
        assert_eq!(patterns.known_ncrna("GC01M220555"), Some(GeneCategory::NcRna));
        assert_eq!(patterns.known_ncrna("GCMTP000003"), Some(GeneCategory::NcRna));
        assert_eq!(patterns.known_ncrna("LINC00649-AS1"), None);
        assert_eq!(patterns.known_ncrna("A1BG"), None);
    }

    #[test]
    fn test_fallback_patterns() {
        let patterns = GenePatterns::new().unwrap();
        for symbol in [
            "RF00019",
            "HSALNG0001",
            "MIR4435-2HG",
            "piR-36581",
            "lnc-ABCA1-1",
            "AC012345",
            "5HT3_AS",
            "hsa-miR-1273",
            "NONHSAG000123.2",
            "L29074",
            "SNORD3A",
        ] {
            assert_eq!(patterns.fallback_ncrna(symbol), Some(GeneCategory::NcRna), "{}", symbol);
        }
        assert_eq!(patterns.fallback_ncrna("A1BG"), None);
        assert_eq!(patterns.fallback_ncrna("BRCA1"), None);
        // two letters and digits only, so the fallback claims it
        assert_eq!(patterns.fallback_ncrna("TP53"), Some(GeneCategory::NcRna));
    }

    #[test]
    fn test_type_of_gene_mapping() {
        let patterns = GenePatterns::new().unwrap();
        let cases = [
            ("protein-coding", Some(GeneCategory::ProteinCoding)),
            ("protein_coding", Some(GeneCategory::ProteinCoding)),
            ("IG_V_gene", Some(GeneCategory::ProteinCoding)),
            ("ncRNA", Some(GeneCategory::NcRna)),
            ("lncRNA", Some(GeneCategory::NcRna)),
            ("snoRNA", Some(GeneCategory::NcRna)),
            ("ribozyme", Some(GeneCategory::NcRna)),
            ("pseudo", Some(GeneCategory::Other)),
            ("transcribed_unprocessed_pseudogene", Some(GeneCategory::Other)),
            ("TEC", Some(GeneCategory::Other)),
            ("unknown", Some(GeneCategory::Other)),
            ("biological-region", None),
            ("rna", None),
        ];
        for (type_of_gene, expected) in cases {
            assert_eq!(patterns.map_type_of_gene(type_of_gene), expected, "{}", type_of_gene);
        }
    }
}
