//! Pipeline driver
//!
//! Runs the setup steps strictly in order, aborting on the first failure,
//! then extracts one report row per known SNP and relabels genotypes.

mod extract;

pub use extract::SnpExtractor;

use std::fs;
use std::io;

use tracing::{debug, info};

use crate::config::{PipelineConfig, ANNOTATED_VCF, ANNOTATED_VCF_GZ, REGION_BAM, VARIANTS_VCF};
use crate::genomics::KNOWN_SNPS;
use crate::report::{self, ReportRow};
use crate::tools::{CommandRunner, Invocation};
use crate::{PipelineError, Result};

/// Shared intermediate left behind by older runs.
const STALE_QUERY_OUTPUT: &str = "temp_bcftools_output.txt";

/// Commands executed by one setup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCommand {
    /// A single command.
    Single(Invocation),
    /// `upstream | downstream`.
    Piped(Invocation, Invocation),
}

/// One fatal-on-failure setup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupStep {
    /// Progress message printed before the step runs.
    pub message: &'static str,
    /// Commands run in order.
    pub commands: Vec<StepCommand>,
}

impl SetupStep {
    fn single(message: &'static str, invocation: Invocation) -> Self {
        Self {
            message,
            commands: vec![StepCommand::Single(invocation)],
        }
    }

    fn name(&self) -> &str {
        self.message.trim_end_matches("...")
    }
}

/// The setup steps for `config`, in execution order.
pub fn setup_plan(config: &PipelineConfig) -> Vec<SetupStep> {
    let tools = &config.tools;
    vec![
        SetupStep::single(
            "Indexing CRAM file...",
            Invocation::new(&tools.samtools)
                .arg("index")
                .arg(&config.input),
        ),
        SetupStep::single(
            "Extracting CYP1A2 region...",
            Invocation::new(&tools.samtools)
                .arg("view")
                .arg(&config.input)
                .arg(config.region.to_string())
                .arg("-b")
                .stdout_to(REGION_BAM),
        ),
        SetupStep::single(
            "Indexing BAM file...",
            Invocation::new(&tools.samtools).args(["index", REGION_BAM]),
        ),
        SetupStep {
            message: "Calling variants...",
            commands: vec![StepCommand::Piped(
                Invocation::new(&tools.bcftools)
                    .args(["mpileup", "-f"])
                    .arg(&config.reference)
                    .arg(REGION_BAM),
                Invocation::new(&tools.bcftools).args(["call", "-mv", "-Oz", "-o", VARIANTS_VCF]),
            )],
        },
        SetupStep::single(
            "Annotating variants...",
            Invocation::new(&tools.java)
                .arg("-jar")
                .arg(&config.snpeff_jar)
                .arg("-v")
                .arg(&config.snpeff_database)
                .arg(VARIANTS_VCF)
                .stdout_to(ANNOTATED_VCF),
        ),
        SetupStep {
            message: "Compressing and indexing annotated VCF file...",
            commands: vec![
                StepCommand::Single(
                    Invocation::new(&tools.bgzip)
                        .args(["-c", ANNOTATED_VCF])
                        .stdout_to(ANNOTATED_VCF_GZ),
                ),
                StepCommand::Single(
                    Invocation::new(&tools.tabix).args(["-p", "vcf", ANNOTATED_VCF_GZ]),
                ),
            ],
        },
    ]
}

/// Orchestrates one run over a working directory.
#[derive(Debug)]
pub struct Pipeline<R> {
    config: PipelineConfig,
    runner: R,
    progress: bool,
}

impl<R: CommandRunner> Pipeline<R> {
    /// Create a pipeline that prints progress to stdout.
    pub fn new(config: PipelineConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            progress: true,
        }
    }

    /// Suppress stdout progress messages.
    pub fn quiet(mut self) -> Self {
        self.progress = false;
        self
    }

    /// Give back the runner (for inspecting scripted runners in tests).
    pub fn into_runner(self) -> R {
        self.runner
    }

    fn say(&self, message: impl AsRef<str>) {
        if self.progress {
            println!("{}", message.as_ref());
        }
    }

    /// Run every step and return the final, relabelled report rows.
    pub fn run(&mut self) -> Result<Vec<ReportRow>> {
        self.config.validate()?;

        if self.config.skip_setup {
            self.require(self.config.resolve(ANNOTATED_VCF_GZ))?;
            info!("skipping setup, querying existing annotated VCF");
        } else {
            self.require(self.config.input_path())?;
            self.setup()?;
        }

        self.say("Extracting specific SNPs of interest...");
        let rows = self.extract()?;
        let report_path = self.config.report_path();
        report::write_report_file(&report_path, &rows)?;
        self.remove_stale_files()?;

        self.say("Processing report with actual alleles...");
        report::relabel_report_file(&report_path)?;
        let rows = report::read_report_file(&report_path)?;

        self.say("=== SNP Analysis Complete ===");
        self.say(format!("Report saved to: {}", self.config.report.display()));
        self.say("");
        Ok(rows)
    }

    fn require(&self, path: std::path::PathBuf) -> Result<()> {
        if path.exists() {
            Ok(())
        } else {
            Err(PipelineError::MissingInput(path))
        }
    }

    /// Run the fatal setup steps.
    pub fn setup(&mut self) -> Result<()> {
        for step in setup_plan(&self.config) {
            self.say(step.message);
            info!(step = step.name(), "starting");
            for command in &step.commands {
                let output = match command {
                    StepCommand::Single(invocation) => self.runner.run(invocation)?,
                    StepCommand::Piped(upstream, downstream) => {
                        self.runner.run_piped(upstream, downstream)?
                    }
                };
                output.ensure_success(step.name())?;
            }
        }
        Ok(())
    }

    /// Query every known SNP, printing a line per outcome.
    pub fn extract(&mut self) -> Result<Vec<ReportRow>> {
        let progress = self.progress;
        let mut extractor = SnpExtractor::new(
            &mut self.runner,
            self.config.tools.bcftools.clone(),
            ANNOTATED_VCF_GZ,
        );

        let mut rows = Vec::with_capacity(KNOWN_SNPS.len());
        for snp in &KNOWN_SNPS {
            if progress {
                println!("Checking {} at position {}...", snp.description(), snp.position);
            }
            let row = extractor.extract(snp)?;
            if progress {
                if row.is_not_found() {
                    println!("  No variant found at {} position", snp.id);
                } else {
                    println!("  Found {} variant", snp.id);
                }
            }
            rows.push(row);
        }
        Ok(rows)
    }

    /// Remove per-SNP scratch files an older run may have left behind.
    fn remove_stale_files(&self) -> Result<()> {
        let names = KNOWN_SNPS
            .iter()
            .map(|snp| format!("temp_{}.txt", snp.id))
            .chain(std::iter::once(STALE_QUERY_OUTPUT.to_string()));
        for name in names {
            let path = self.config.resolve(&name);
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed stale scratch file"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
