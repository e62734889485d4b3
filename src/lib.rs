//! # CYP1A2 SNP genotyping
//!
//! Drives a fixed chain of external genomics tools over a single aligned-read
//! file and reports genotypes for five known SNPs in the CYP1A2 region.
//!
//! ## Pipeline
//!
//! 1. **Index**: `samtools index` on the input CRAM
//! 2. **Slice**: extract the CYP1A2 region into `CYP1A2.bam` and index it
//! 3. **Call**: `bcftools mpileup | bcftools call` against the reference
//! 4. **Annotate**: snpEff, then `bgzip` + `tabix`
//! 5. **Extract**: one `bcftools view` query per known SNP position
//! 6. **Label**: rewrite genotype codes into readable labels
//!
//! ## Usage Example
//!
//! ```ignore
//! use cyp1a2_snps::{Pipeline, PipelineConfig, SystemRunner};
//!
//! let config = PipelineConfig::default();
//! let runner = SystemRunner::new(&config.workdir);
//! let report = Pipeline::new(config, runner).run()?;
//! assert_eq!(report.len(), 5);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod config;     // Paths, tool names and fixed file names
pub mod genomics;   // SNP descriptors, coordinates, VCF lines, genotypes
pub mod pipeline;   // Pipeline driver and SNP extractor
pub mod report;     // CSV report rows
pub mod tools;      // External command invocation

// Re-exports for convenience
pub use config::PipelineConfig;
pub use genomics::{genotype_label, SnpDescriptor, KNOWN_SNPS};
pub use pipeline::{Pipeline, SnpExtractor};
pub use report::ReportRow;
pub use tools::{CommandRunner, Invocation, SystemRunner, ToolOutput};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input alignment file does not exist
    #[error("input alignment file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// An external program could not be started
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A setup step exited unsuccessfully
    #[error("{step} failed (exit code {}): `{command}`\n{stderr}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    StepFailed {
        /// Human-readable step name
        step: String,
        /// Rendered command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard error of the tool
        stderr: String,
    },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report could not be read or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration rejected by validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Genomic coordinate string could not be parsed
    #[error("invalid genomic coordinate: {0}")]
    InvalidCoordinate(String),
}

/// Convenience alias used across the crate.
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
