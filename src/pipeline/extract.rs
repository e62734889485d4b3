use std::path::PathBuf;

use tracing::warn;

use crate::genomics::{lookup, GenomicPosition, Lookup, SnpDescriptor};
use crate::report::ReportRow;
use crate::tools::{CommandRunner, Invocation};
use crate::Result;

/// Queries an indexed VCF one SNP position at a time.
#[derive(Debug)]
pub struct SnpExtractor<R> {
    runner: R,
    bcftools: String,
    vcf: PathBuf,
}

impl<R: CommandRunner> SnpExtractor<R> {
    /// Extractor reading `vcf` (relative to the runner's working directory).
    pub fn new(runner: R, bcftools: impl Into<String>, vcf: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            bcftools: bcftools.into(),
            vcf: vcf.into(),
        }
    }

    /// `bcftools view <vcf> <chrom:pos>`.
    pub fn query(&self, position: &GenomicPosition) -> Invocation {
        Invocation::new(&self.bcftools)
            .arg("view")
            .arg(&self.vcf)
            .arg(position.to_string())
    }

    /// Look up the first record at the SNP's position.
    ///
    /// A non-zero exit is not an error: whatever output was produced is still
    /// scanned. Only a failure to start bcftools is propagated.
    pub fn lookup(&mut self, snp: &SnpDescriptor) -> Result<Lookup> {
        let query = self.query(&snp.position);
        let output = self.runner.run(&query)?;
        if !output.success {
            warn!(
                snp = snp.id,
                code = ?output.code,
                stderr = output.stderr.trim(),
                "query exited unsuccessfully"
            );
        }
        Ok(lookup(&output.stdout_text()))
    }

    /// Report row for one SNP; absent and malformed records both yield the
    /// not-found row.
    pub fn extract(&mut self, snp: &SnpDescriptor) -> Result<ReportRow> {
        let row = match self.lookup(snp)? {
            Lookup::Found(fields) => ReportRow::found(snp, fields),
            Lookup::Absent => ReportRow::not_found(snp),
            Lookup::Malformed { columns } => {
                warn!(
                    snp = snp.id,
                    position = %snp.position,
                    columns,
                    "record has too few columns, reporting as not found"
                );
                ReportRow::not_found(snp)
            }
        };
        Ok(row)
    }
}
