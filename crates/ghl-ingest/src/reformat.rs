//! Row reformatter: GeneHancer rows → canonical enhancer/gene table
//!
//! Each input row describes one enhancer and its connected genes. The
//! reformatter emits one canonical row per (enhancer, gene) pair, with both
//! identifiers namespace-qualified and the gene categorized.

use crate::attributes::parse_attributes;
use crate::error::{IngestError, Result};
use crate::gene_types::{GeneInfoLookup, GeneTypeResolver};
use crate::identifiers::IdentifierClassifier;
use ghl_common::types::{EdgeRecord, CANONICAL_HEADER, DEFAULT_INPUT_HEADER};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Rows between progress messages
const PROGRESS_INTERVAL: usize = 100;

const UTF8_BOM: char = '\u{feff}';

/// Delimiter for a data file: `\t` for `.tsv`, `,` otherwise
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") => b'\t',
        _ => b',',
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReformatOptions {
    pub delimiter: u8,
    /// Treat the first row as data and use the default GeneHancer header
    pub no_header: bool,
}

impl Default for ReformatOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            no_header: false,
        }
    }
}

/// Positions of the columns the reformatter reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    chromosome: usize,
    start: usize,
    end: usize,
    score: usize,
    feature_name: usize,
    attributes: usize,
}

impl ColumnLayout {
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> Result<Self> {
        let position = |name: &str| header.iter().position(|h| h.as_ref() == name);
        let required = |name: &str| {
            position(name).ok_or_else(|| IngestError::MissingColumn(name.to_string()))
        };

        let chromosome = position("chrom")
            .or_else(|| position("#chrom"))
            .ok_or_else(|| IngestError::MissingColumn("chrom".to_string()))?;

        Ok(Self {
            chromosome,
            start: required("start")?,
            end: required("end")?,
            score: required("score")?,
            feature_name: required("feature name")?,
            attributes: required("attributes")?,
        })
    }

    pub fn default_header() -> Self {
        // the default header carries every required column
        Self {
            chromosome: 0,
            feature_name: 2,
            start: 3,
            end: 4,
            score: 5,
            attributes: 8,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ReaderState {
    AwaitingHeader,
    Streaming(ColumnLayout),
}

/// Counts from one reformatted file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReformatSummary {
    /// Data rows read, header excluded
    pub rows: usize,
    /// Canonical rows written
    pub edges: usize,
}

pub struct RowReformatter {
    classifier: IdentifierClassifier,
    options: ReformatOptions,
}

impl RowReformatter {
    pub fn new(options: ReformatOptions) -> Result<Self> {
        Ok(Self {
            classifier: IdentifierClassifier::new()?,
            options,
        })
    }

    pub fn options(&self) -> ReformatOptions {
        self.options
    }

    /// Reformat `input` into a canonical table written to `output`.
    ///
    /// `file_name` is only used for progress and error reporting. The first
    /// failing row aborts the whole file.
    pub async fn reformat<R, W, L>(
        &self,
        input: R,
        output: W,
        file_name: &str,
        resolver: &mut GeneTypeResolver<L>,
    ) -> Result<ReformatSummary>
    where
        R: Read,
        W: Write,
        L: GeneInfoLookup,
    {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(input);
        let mut writer = csv::Writer::from_writer(output);
        writer.write_record(CANONICAL_HEADER)?;

        let mut state = ReaderState::AwaitingHeader;
        let mut summary = ReformatSummary::default();

        for (index, record) in reader.records().enumerate() {
            let line = index + 1;
            let record = record.map_err(|e| IngestError::from(e).at_row(file_name, line))?;

            let layout = match state {
                ReaderState::Streaming(layout) => layout,
                ReaderState::AwaitingHeader => {
                    if self.options.no_header {
                        let layout = ColumnLayout::default_header();
                        debug!(file = file_name, header = ?DEFAULT_INPUT_HEADER, "Using default header");
                        state = ReaderState::Streaming(layout);
                        layout
                    } else {
                        let header: Vec<&str> = record
                            .iter()
                            .enumerate()
                            .map(|(i, cell)| if i == 0 { cell.trim_start_matches(UTF8_BOM) } else { cell })
                            .collect();
                        let layout = ColumnLayout::from_header(&header)
                            .map_err(|e| e.at_row(file_name, line))?;
                        debug!(file = file_name, ?layout, "Read header");
                        state = ReaderState::Streaming(layout);
                        continue;
                    }
                },
            };

            if index > 0 && index % PROGRESS_INTERVAL == 0 {
                info!(file = file_name, row = index, "Processing rows");
            }

            let edges = self
                .reformat_row(&record, layout, resolver)
                .await
                .map_err(|e| e.at_row(file_name, line))?;
            for edge in &edges {
                writer.write_record(edge.to_row())?;
            }

            summary.rows += 1;
            summary.edges += edges.len();
        }

        writer.flush()?;
        Ok(summary)
    }

    /// Reformat the file at `input` into a new file at `output`
    pub async fn reformat_file<L: GeneInfoLookup>(
        &self,
        input: &Path,
        output: &Path,
        resolver: &mut GeneTypeResolver<L>,
    ) -> Result<ReformatSummary> {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());

        let reader = File::open(input)?;
        let writer = File::create(output)?;
        let summary = self.reformat(reader, writer, &file_name, resolver).await?;

        info!(
            file = %file_name,
            rows = summary.rows,
            edges = summary.edges,
            output = %output.display(),
            "Reformatted file"
        );
        Ok(summary)
    }

    async fn reformat_row<L: GeneInfoLookup>(
        &self,
        record: &csv::StringRecord,
        layout: ColumnLayout,
        resolver: &mut GeneTypeResolver<L>,
    ) -> Result<Vec<EdgeRecord>> {
        let attributes = parse_attributes(cell(record, layout.attributes, "attributes")?)?;

        let enhancer_rep = self.classifier.qualify(&attributes.enhancer_id);
        let chromosome = cell(record, layout.chromosome, "chrom")?;
        let start = cell(record, layout.start, "start")?;
        let end = cell(record, layout.end, "end")?;
        let confidence_score = cell(record, layout.score, "score")?;
        let enhancer_type = cell(record, layout.feature_name, "feature name")?;

        let mut edges = Vec::with_capacity(attributes.genes.len());
        for gene in attributes.genes {
            let gene_rep = self.classifier.qualify(&gene.symbol);
            let gene_category = resolver.resolve(&gene.symbol).await;
            edges.push(EdgeRecord {
                enhancer: attributes.enhancer_id.clone(),
                enhancer_rep: enhancer_rep.clone(),
                chromosome: chromosome.to_string(),
                start: start.to_string(),
                end: end.to_string(),
                confidence_score: confidence_score.to_string(),
                enhancer_type: enhancer_type.to_string(),
                gene: gene.symbol,
                gene_rep,
                gene_enhancer_score: gene.score,
                gene_category,
            });
        }
        Ok(edges)
    }
}

fn cell<'r>(record: &'r csv::StringRecord, position: usize, column: &str) -> Result<&'r str> {
    record.get(position).ok_or_else(|| IngestError::ShortRow {
        column: column.to_string(),
        position,
        actual: record.len(),
    })
}
