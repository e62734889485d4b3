//! Parsing benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cyp1a2_snps::genomics::{lookup, parse_vcf_line};
use cyp1a2_snps::genotype_label;

const QUERY_OUTPUT: &str = "##fileformat=VCFv4.2\n##SnpEffVersion=\"5.1\"\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\nchr15\t74749576\t.\tA\tC\t225.4\tPASS\tDP=41;ANN=C|upstream_gene_variant|MODIFIER|CYP1A1|ENSG00000140465|transcript|ENST00000379727.8|protein_coding||c.-3860T>G|||||3860|,C|intron_variant|MODIFIER|CYP1A2|ENSG00000140505|transcript|ENST00000343932.5|protein_coding|1/6|c.-9-154A>C||||||\tGT:PL:DP\t0/1:255,0,187:41\n";

fn benchmark_parsing(c: &mut Criterion) {
    c.bench_function("lookup_query_output", |b| {
        b.iter(|| lookup(black_box(QUERY_OUTPUT)));
    });

    let line = QUERY_OUTPUT.lines().last().unwrap_or_default();
    c.bench_function("parse_vcf_line", |b| {
        b.iter(|| parse_vcf_line(black_box(line)));
    });

    c.bench_function("genotype_label", |b| {
        b.iter(|| {
            for code in ["0/0", "0/1", "1/1", "0|1", "not found"] {
                black_box(genotype_label(black_box(code)));
            }
        });
    });
}

criterion_group!(benches, benchmark_parsing);
criterion_main!(benches);
