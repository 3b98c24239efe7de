//! Spreadsheet → CSV conversion
//!
//! GeneHancer releases are sometimes shipped as Excel workbooks. Only the
//! first worksheet is read; it is written out as a CSV with every field
//! quoted so the reformatter can treat it like any other comma-delimited file.
//!
//! The workbook format (`.xls`, `.xlsx`, `.xlsm`, `.xlsb`) is detected from the
//! file contents, so the extension only decides whether a file is converted.

use crate::error::{IngestError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::{debug, info};

/// Whether `path` names a spreadsheet (extension starting with `xl`)
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase().starts_with("xl"))
        .unwrap_or(false)
}

/// Convert the first worksheet of `input` into an all-quoted CSV at `output`.
///
/// Returns the number of rows written.
pub fn convert_to_csv(input: &Path, output: &Path) -> Result<usize> {
    let rows = read_first_sheet(std::fs::read(input)?)?;
    let file = File::create(output)?;
    write_quoted_csv(&rows, file)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        rows = rows.len(),
        "Converted spreadsheet"
    );
    Ok(rows.len())
}

/// Write rows with every field quoted
pub fn write_quoted_csv<W: Write>(rows: &[Vec<String>], out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(out);
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Cell values of the first worksheet of a workbook, row by row.
///
/// Rows start at `A1` and share a common width; cells outside the used range
/// are empty.
pub fn read_first_sheet(workbook: Vec<u8>) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(workbook))?;
    if let Some(name) = workbook.sheet_names().first() {
        debug!(sheet = %name, "Reading worksheet");
    }
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::Spreadsheet("workbook has no sheets".to_string()))??;
    Ok(range_rows(&range))
}

fn range_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((first_row, first_column)) = range.start() else {
        return Vec::new();
    };
    let (first_row, first_column) = (first_row as usize, first_column as usize);
    let width = first_column + range.width();

    let mut rows = vec![vec![String::new(); width]; first_row];
    for cells in range.rows() {
        let mut row = vec![String::new(); first_column];
        row.extend(cells.iter().map(cell_text));
        rows.push(row);
    }
    rows
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="GeneHancer" sheetId="1" r:id="rId2"/>
    <sheet name="Notes" sheetId="2" r:id="rId1"/>
  </sheets>
</workbook>"#;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
</Relationships>"#;

    const SHARED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4">
  <si><t>chrom</t></si>
  <si><t>attributes</t></si>
  <si><r><t>genehancer_id=GH1;</t></r><r><t xml:space="preserve">connected_gene=A&amp;B;score=1</t></r></si>
  <si><t>chr1</t></si>
</sst>"#;

    const FIRST_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>start</t></is></c><c r="D1" t="s"><v>1</v></c></row>
    <row r="2"><c r="A2" t="s"><v>3</v></c><c r="B2"><v>100</v></c><c r="C2" t="b"><v>1</v></c><c r="D2" t="s"><v>2</v></c></row>
    <row r="3"><c r="A3" t="str"><v>chr2</v></c></row>
  </sheetData>
</worksheet>"#;

    const NOTES_SHEET: &str = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>notes</t></is></c></row></sheetData></worksheet>"#;

    fn workbook_bytes() -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in [
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", NOTES_SHEET),
            ("xl/worksheets/sheet2.xml", FIRST_SHEET),
        ] {
            zip.start_file(name, FileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    #[test]
    fn test_is_spreadsheet() {
        assert!(is_spreadsheet(Path::new("GeneHancer_v5.xlsx")));
        assert!(is_spreadsheet(Path::new("GeneHancer_v5.xls")));
        assert!(is_spreadsheet(Path::new("GeneHancer_v5.XLSX")));
        assert!(!is_spreadsheet(Path::new("GeneHancer_v5.csv")));
        assert!(!is_spreadsheet(Path::new("xlsx")));
    }

    #[test]
    fn test_reads_first_sheet_in_workbook_order() {
        let rows = read_first_sheet(workbook_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["chrom", "start", "", "attributes"],
                vec!["chr1", "100", "TRUE", "genehancer_id=GH1;connected_gene=A&B;score=1"],
                vec!["chr2", "", "", ""],
            ]
        );
    }

    #[test]
    fn test_convert_writes_quoted_csv() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("genehancer.xlsx");
        let output = temp.path().join("_intermediary_genehancer.csv");
        std::fs::write(&input, workbook_bytes()).unwrap();

        let rows = convert_to_csv(&input, &output).unwrap();
        assert_eq!(rows, 3);

        let csv = std::fs::read_to_string(&output).unwrap();
        let first = csv.lines().next().unwrap();
        assert_eq!(first, r#""chrom","start","","attributes""#);
    }

    #[test]
    fn test_converts_legacy_xls_workbook() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("_intermediary_genehancer.csv");

        let rows = convert_to_csv(&fixture("genehancer.xls"), &output).unwrap();
        assert_eq!(rows, 2);

        let csv = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#""chrom","source","feature name","start","end","score","strand","frame","attributes""#,
                r#""chr1","GeneHancer","Enhancer","100","200","0.5",".",".","genehancer_id=GH01J000001;connected_gene=A1BG;score=1.5""#,
            ]
        );
    }

    #[test]
    fn test_format_is_detected_from_contents() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("GENEHANCER.XLS");
        std::fs::copy(fixture("genehancer.xls"), &input).unwrap();

        let rows = convert_to_csv(&input, &temp.path().join("out.csv")).unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_non_workbook_is_a_spreadsheet_error() {
        let err = read_first_sheet(b"chrom,start\n".to_vec()).unwrap_err();
        assert!(matches!(err, IngestError::Spreadsheet(_)));
    }
}
