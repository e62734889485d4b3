//! Pipeline configuration
//!
//! Every path and program name the pipeline touches, with defaults that
//! reproduce the fixed layout of a single-sample run:
//! - input `seq.cram` and all outputs in the working directory
//! - reference genome three directories up
//! - tools resolved from `PATH`

use std::path::{Path, PathBuf};

use crate::genomics::{GenomicRegion, CYP1A2_REGION, KNOWN_SNPS};
use crate::{PipelineError, Result};

/// Region slice of the input alignment.
pub const REGION_BAM: &str = "CYP1A2.bam";
/// Compressed output of `bcftools call`.
pub const VARIANTS_VCF: &str = "CYP1A2_variants.vcf.gz";
/// Plain-text output of snpEff.
pub const ANNOTATED_VCF: &str = "CYP1A2_annotated.vcf";
/// bgzip-compressed, tabix-indexed annotated VCF.
pub const ANNOTATED_VCF_GZ: &str = "CYP1A2_annotated.vcf.gz";

/// Default input alignment.
pub const DEFAULT_INPUT: &str = "seq.cram";
/// Default reference genome.
pub const DEFAULT_REFERENCE: &str = "../../../GRCh38.d1.vd1.fa";
/// Default snpEff jar.
pub const DEFAULT_SNPEFF_JAR: &str = "/Users/matthewkinder/snpEff/snpEff.jar";
/// Default snpEff database.
pub const DEFAULT_SNPEFF_DATABASE: &str = "GRCh38.99";
/// Default report file.
pub const DEFAULT_REPORT: &str = "snp_report.csv";

/// Program names for the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// samtools executable.
    pub samtools: String,
    /// bcftools executable.
    pub bcftools: String,
    /// bgzip executable.
    pub bgzip: String,
    /// tabix executable.
    pub tabix: String,
    /// Java launcher used to run snpEff.
    pub java: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            samtools: "samtools".into(),
            bcftools: "bcftools".into(),
            bgzip: "bgzip".into(),
            tabix: "tabix".into(),
            java: "java".into(),
        }
    }
}

impl ToolPaths {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("samtools", self.samtools.as_str()),
            ("bcftools", self.bcftools.as_str()),
            ("bgzip", self.bgzip.as_str()),
            ("tabix", self.tabix.as_str()),
            ("java", self.java.as_str()),
        ]
        .into_iter()
    }
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Input alignment, relative to `workdir` unless absolute.
    pub input: PathBuf,
    /// Directory holding the input and receiving every output.
    pub workdir: PathBuf,
    /// Reference FASTA passed to `bcftools mpileup -f`.
    pub reference: PathBuf,
    /// snpEff jar.
    pub snpeff_jar: PathBuf,
    /// snpEff database name.
    pub snpeff_database: String,
    /// Region sliced out of the input; must cover every known SNP.
    pub region: GenomicRegion,
    /// External programs.
    pub tools: ToolPaths,
    /// Report file name, relative to `workdir` unless absolute.
    pub report: PathBuf,
    /// Skip steps 1-5 and query an existing annotated VCF.
    pub skip_setup: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            workdir: PathBuf::from("."),
            reference: PathBuf::from(DEFAULT_REFERENCE),
            snpeff_jar: PathBuf::from(DEFAULT_SNPEFF_JAR),
            snpeff_database: DEFAULT_SNPEFF_DATABASE.into(),
            region: CYP1A2_REGION,
            tools: ToolPaths::default(),
            report: PathBuf::from(DEFAULT_REPORT),
            skip_setup: false,
        }
    }
}

impl PipelineConfig {
    /// Default configuration rooted at `workdir`.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            ..Self::default()
        }
    }

    /// Reject configurations that cannot produce a valid command line.
    pub fn validate(&self) -> Result<()> {
        for (tool, program) in self.tools.iter() {
            if program.trim().is_empty() {
                return Err(PipelineError::InvalidConfig(format!(
                    "empty program name for {tool}"
                )));
            }
        }
        if self.snpeff_database.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "snpEff database name is empty".into(),
            ));
        }
        if self.input.as_os_str().is_empty() {
            return Err(PipelineError::InvalidConfig("input path is empty".into()));
        }
        if self.report.as_os_str().is_empty() {
            return Err(PipelineError::InvalidConfig("report path is empty".into()));
        }
        if let Some(snp) = KNOWN_SNPS
            .iter()
            .find(|snp| !self.region.contains(&snp.position))
        {
            return Err(PipelineError::InvalidConfig(format!(
                "region {} does not cover {} at {}",
                self.region, snp.id, snp.position
            )));
        }
        Ok(())
    }

    /// Absolute-or-workdir-relative location of `path`.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.workdir.join(path)
    }

    /// Input alignment location.
    pub fn input_path(&self) -> PathBuf {
        self.resolve(&self.input)
    }

    /// Report location.
    pub fn report_path(&self) -> PathBuf {
        self.resolve(&self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_single_sample_layout() {
        let config = PipelineConfig::default();
        assert_eq!(config.input, PathBuf::from("seq.cram"));
        assert_eq!(config.region.to_string(), "chr15:74745879-74756607");
        assert_eq!(config.snpeff_database, "GRCh38.99");
        assert_eq!(config.report_path(), PathBuf::from("./snp_report.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn absolute_paths_ignore_workdir() {
        let mut config = PipelineConfig::in_dir("/data/run");
        config.report = PathBuf::from("/tmp/out.csv");
        assert_eq!(config.report_path(), PathBuf::from("/tmp/out.csv"));
        assert_eq!(config.input_path(), PathBuf::from("/data/run/seq.cram"));
    }

    #[test]
    fn empty_tool_names_are_rejected() {
        let mut config = PipelineConfig::default();
        config.tools.tabix = " ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tabix"));

        let mut config = PipelineConfig::default();
        config.snpeff_database.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn region_must_cover_every_known_snp() {
        let mut config = PipelineConfig::default();
        config.region = "chr15:74740000-74760000".parse().unwrap();
        assert!(config.validate().is_ok());

        config.region = "chr15:74749000-74756607".parse().unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rs2470893"), "{err}");

        config.region = "15:74745879-74756607".parse().unwrap();
        assert!(config.validate().is_err());
    }
}
