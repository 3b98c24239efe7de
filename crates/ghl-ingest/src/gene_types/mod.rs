//! Gene biotype resolution
//!
//! Maps gene symbols onto coarse categories (`Protein coding gene`,
//! `ncRNA gene`, `Other gene`) through a cascade of caches, curated naming
//! patterns and MyGene.info annotations.

pub mod cache;
pub mod mygene;
pub mod patterns;
pub mod resolver;

pub use cache::{GeneTypeCache, GeneTypeStore};
pub use mygene::{GeneHit, GeneInfoLookup, MyGeneClient, DEFAULT_MYGENE_URL};
pub use patterns::GenePatterns;
pub use resolver::{GeneTypeResolver, ResolutionTier, ResolverStats};
