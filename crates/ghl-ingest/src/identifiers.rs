//! Namespace qualification for enhancer and gene identifiers

use crate::error::Result;
use ghl_common::types::{EN_GENECARDS, P_GENECARDS};
use regex::Regex;

/// GeneHancer ids: `GH`, chromosome (two digits, `MT`, `0X`, `0Y`), strand letter, position
const ENHANCER_ID_PATTERN: &str = r"^GH([0-9]{2}|MT|0X|0Y)[A-Z][0-9]+";

/// Qualifies raw identifiers with their GeneCards namespace.
///
/// The same rule serves enhancer and gene identifiers: anything that looks
/// like a GeneHancer id lands in `en-genecards`, everything else in
/// `p-genecards`.
#[derive(Debug, Clone)]
pub struct IdentifierClassifier {
    enhancer_id: Regex,
}

impl IdentifierClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            enhancer_id: Regex::new(ENHANCER_ID_PATTERN)?,
        })
    }

    pub fn is_enhancer_id(&self, id: &str) -> bool {
        self.enhancer_id.is_match(id)
    }

    /// Namespace-qualified representation of `id`
    pub fn qualify(&self, id: &str) -> String {
        let prefix = if self.is_enhancer_id(id) {
            EN_GENECARDS
        } else {
            P_GENECARDS
        };
        format!("{}{}", prefix, id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_enhancer_ids_use_enhancer_namespace() {
        let classifier = IdentifierClassifier::new().unwrap();
        assert_eq!(classifier.qualify("GH01F220777"), "en-genecards:GH01F220777");
        assert_eq!(classifier.qualify("GHMTJ000001"), "en-genecards:GHMTJ000001");
        assert_eq!(classifier.qualify("GH0XJ101234"), "en-genecards:GH0XJ101234");
    }

    #[test]
    fn test_other_ids_use_generic_namespace() {
        let classifier = IdentifierClassifier::new().unwrap();
        assert_eq!(classifier.qualify("A1BG"), "p-genecards:A1BG");
        assert_eq!(classifier.qualify("GH1"), "p-genecards:GH1");
        assert_eq!(classifier.qualify("LINC00649"), "p-genecards:LINC00649");
        // lowercase strand letter is not a GeneHancer id
        assert_eq!(classifier.qualify("GH01f220777"), "p-genecards:GH01f220777");
    }
}
