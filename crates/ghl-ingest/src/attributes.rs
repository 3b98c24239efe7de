//! Parser for the GeneHancer `attributes` cell.
//!
//! The cell packs the enhancer id and its connected genes into one string:
//!
//! ```text
//! genehancer_id=GH01F220777;connected_gene=A1BG;score=0.52;connected_gene=LINC00649;score=11.2
//! ```
//!
//! Token 0 carries the enhancer id, the rest come in `connected_gene` /
//! `score` pairs. Some releases end the cell with a dangling `;`, which shows
//! up as one extra empty token after splitting.

use crate::error::{IngestError, Result};

/// One `connected_gene` / `score` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneAssociation {
    pub symbol: String,
    pub score: String,
}

/// Parsed contents of an attributes cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancerAttributes {
    pub enhancer_id: String,
    pub genes: Vec<GeneAssociation>,
}

/// Parse an attributes cell.
///
/// When the number of `;`-separated tokens is even, the last token is the
/// residue of a trailing delimiter and is never paired. Keys are not checked;
/// only the value after the first `=` of each consumed token is kept.
pub fn parse_attributes(cell: &str) -> Result<EnhancerAttributes> {
    let tokens: Vec<&str> = cell.split(';').collect();

    let enhancer_id = token_value(tokens[0], cell)?.to_string();

    let usable = if tokens.len() % 2 == 0 {
        tokens.len() - 1
    } else {
        tokens.len()
    };

    let genes = tokens[1..usable]
        .chunks_exact(2)
        .map(|pair| {
            Ok(GeneAssociation {
                symbol: token_value(pair[0], cell)?.to_string(),
                score: token_value(pair[1], cell)?.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EnhancerAttributes { enhancer_id, genes })
}

/// Value part of a `key=value` token, up to a second `=` if there is one
fn token_value<'a>(token: &'a str, cell: &str) -> Result<&'a str> {
    token
        .split('=')
        .nth(1)
        .ok_or_else(|| IngestError::MalformedAttributes {
            token: token.to_string(),
            cell: cell.to_string(),
        })
}
