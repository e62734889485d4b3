use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cyp1a2_snps::config::{
    ToolPaths, DEFAULT_INPUT, DEFAULT_REFERENCE, DEFAULT_REPORT, DEFAULT_SNPEFF_DATABASE,
    DEFAULT_SNPEFF_JAR,
};
use cyp1a2_snps::genomics::{GenomicRegion, CYP1A2_REGION};
use cyp1a2_snps::{Pipeline, PipelineConfig, SystemRunner};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cyp1a2-snps",
    about = "Genotype known CYP1A2 SNPs from an aligned CRAM and write snp_report.csv"
)]
struct Cli {
    /// Aligned reads (CRAM/BAM), relative to the working directory.
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// Directory holding the input and receiving all outputs.
    #[arg(long, default_value = ".")]
    workdir: PathBuf,
    /// Reference genome FASTA used for variant calling.
    #[arg(long, env = "CYP1A2_REFERENCE", default_value = DEFAULT_REFERENCE)]
    reference: PathBuf,
    /// snpEff jar.
    #[arg(long, env = "CYP1A2_SNPEFF_JAR", default_value = DEFAULT_SNPEFF_JAR)]
    snpeff_jar: PathBuf,
    /// snpEff database name.
    #[arg(long = "snpeff-db", default_value = DEFAULT_SNPEFF_DATABASE)]
    snpeff_database: String,
    /// Region sliced out of the input, as `chrom:start-end`.
    #[arg(long, default_value_t = CYP1A2_REGION)]
    region: GenomicRegion,
    /// Report file name.
    #[arg(long, default_value = DEFAULT_REPORT)]
    report: PathBuf,
    /// Query an existing CYP1A2_annotated.vcf.gz instead of rebuilding it.
    #[arg(long)]
    skip_setup: bool,
    /// samtools executable.
    #[arg(long, default_value = "samtools")]
    samtools: String,
    /// bcftools executable.
    #[arg(long, default_value = "bcftools")]
    bcftools: String,
    /// bgzip executable.
    #[arg(long, default_value = "bgzip")]
    bgzip: String,
    /// tabix executable.
    #[arg(long, default_value = "tabix")]
    tabix: String,
    /// Java launcher for snpEff.
    #[arg(long, default_value = "java")]
    java: String,
    /// Log every external command to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        PipelineConfig {
            input: self.input,
            workdir: self.workdir,
            reference: self.reference,
            snpeff_jar: self.snpeff_jar,
            snpeff_database: self.snpeff_database,
            region: self.region,
            tools: ToolPaths {
                samtools: self.samtools,
                bcftools: self.bcftools,
                bgzip: self.bgzip,
                tabix: self.tabix,
                java: self.java,
            },
            report: self.report,
            skip_setup: self.skip_setup,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config();
    let runner = SystemRunner::new(&config.workdir);
    let workdir = config.workdir.clone();

    Pipeline::new(config, runner)
        .run()
        .with_context(|| format!("SNP pipeline failed in {}", workdir.display()))?;

    Ok(())
}
