//! CSV report of per-SNP genotype calls.
//!
//! The report is written once with raw genotype codes and then rewritten in
//! place by [`relabel_report_file`], which swaps known codes for labels.
//! Records end in `\r\n`, the line terminator spreadsheet tools expect.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::genomics::{genotype_label, SnpDescriptor, VcfFields};
use crate::{PipelineError, Result};

/// Column names in output order.
pub const HEADER: [&str; 6] = [
    "SNP",
    "Position",
    "Reference",
    "Alternative",
    "Genotype",
    "Annotation",
];

/// Value written to every data column when no usable record exists.
pub const NOT_FOUND: &str = "not found";

const GENOTYPE_COLUMN: usize = 4;

/// One row of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// dbSNP identifier.
    #[serde(rename = "SNP")]
    pub snp: String,
    /// Queried position as `chrom:pos`.
    #[serde(rename = "Position")]
    pub position: String,
    /// REF allele.
    #[serde(rename = "Reference")]
    pub reference: String,
    /// ALT allele(s).
    #[serde(rename = "Alternative")]
    pub alternative: String,
    /// Genotype code or its label.
    #[serde(rename = "Genotype")]
    pub genotype: String,
    /// INFO column of the annotated record.
    #[serde(rename = "Annotation")]
    pub annotation: String,
}

impl ReportRow {
    /// Row for a record found at the SNP's position. The genotype is the raw code.
    pub fn found(snp: &SnpDescriptor, fields: VcfFields) -> Self {
        Self {
            snp: snp.id.to_string(),
            position: snp.position.to_string(),
            reference: fields.reference,
            alternative: fields.alternative,
            genotype: fields.genotype,
            annotation: fields.info,
        }
    }

    /// Sentinel row for a position with no usable record.
    pub fn not_found(snp: &SnpDescriptor) -> Self {
        Self {
            snp: snp.id.to_string(),
            position: snp.position.to_string(),
            reference: NOT_FOUND.to_string(),
            alternative: NOT_FOUND.to_string(),
            genotype: NOT_FOUND.to_string(),
            annotation: NOT_FOUND.to_string(),
        }
    }

    /// Whether this is a sentinel row.
    pub fn is_not_found(&self) -> bool {
        [
            &self.reference,
            &self.alternative,
            &self.genotype,
            &self.annotation,
        ]
        .iter()
        .all(|value| value.as_str() == NOT_FOUND)
    }
}

fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.terminator(csv::Terminator::CRLF);
    builder
}

/// Write the header and rows as CSV.
pub fn write_report<W: Write>(writer: W, rows: &[ReportRow]) -> Result<()> {
    let mut out = writer_builder()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(HEADER)?;
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}

/// Read rows written by [`write_report`].
pub fn read_report<R: Read>(reader: R) -> Result<Vec<ReportRow>> {
    let mut input = csv::Reader::from_reader(reader);
    let rows = input.deserialize().collect::<Result<Vec<ReportRow>, csv::Error>>()?;
    Ok(rows)
}

/// Write the report to `path`, replacing any existing file.
pub fn write_report_file(path: &Path, rows: &[ReportRow]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "writing report");
    write_report(File::create(path)?, rows)
}

/// Read a report file.
pub fn read_report_file(path: &Path) -> Result<Vec<ReportRow>> {
    read_report(File::open(path)?)
}

/// Render the report into a string (useful for tests and snapshots).
pub fn render_report(rows: &[ReportRow]) -> Result<String> {
    let mut buffer = Vec::new();
    write_report(&mut buffer, rows)?;
    String::from_utf8(buffer)
        .map_err(|err| PipelineError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Rewrite the genotype column of a report file in place.
///
/// Works on raw records so rows with unexpected widths survive; rows shorter
/// than the genotype column are copied as-is. Returns the number of rows.
pub fn relabel_report_file(path: &Path) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let header = reader.headers()?.clone();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let relabeled: csv::StringRecord = record
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                if idx == GENOTYPE_COLUMN {
                    genotype_label(value)
                } else {
                    value
                }
            })
            .collect();
        records.push(relabeled);
    }

    let mut writer = writer_builder()
        .flexible(true)
        .from_path(path)?;
    writer.write_record(&header)?;
    for record in &records {
        writer.write_record(record)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = records.len(), "relabelled genotypes");
    Ok(records.len())
}
