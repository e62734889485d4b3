//! Genomics-specific types used by the pipeline.
//!
//! Coordinates and SNP descriptors are fixed for the CYP1A2 locus; VCF
//! handling is limited to reading the columns the report needs.

mod genotype;
mod snps;
mod types;
mod vcf;

pub use genotype::{
    genotype_label, HETEROZYGOUS, HOMOZYGOUS_ALTERNATE, HOMOZYGOUS_REFERENCE,
};
pub use snps::{SnpDescriptor, CYP1A2_REGION, KNOWN_SNPS};
pub use types::{GenomicPosition, GenomicRegion};
pub use vcf::{first_data_line, lookup, parse_vcf_line, Lookup, VcfFields, MIN_VCF_COLUMNS};
