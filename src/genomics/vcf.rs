/// Columns a data line needs: `CHROM POS ID REF ALT QUAL FILTER INFO FORMAT SAMPLE`.
pub const MIN_VCF_COLUMNS: usize = 10;

const REF_COLUMN: usize = 3;
const ALT_COLUMN: usize = 4;
const INFO_COLUMN: usize = 7;
const SAMPLE_COLUMN: usize = 9;

/// Report-relevant fields of a VCF data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfFields {
    /// REF column.
    pub reference: String,
    /// ALT column.
    pub alternative: String,
    /// Raw genotype code of the first sample (prefix before the first `:`).
    pub genotype: String,
    /// INFO column, including any annotation.
    pub info: String,
}

/// Outcome of looking up a single position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// A well-formed record was found.
    Found(VcfFields),
    /// No data line at the position.
    Absent,
    /// A data line was present but had too few columns.
    Malformed {
        /// Number of tab-separated columns seen.
        columns: usize,
    },
}

/// First non-header line of VCF text, trimmed; `None` when absent or blank.
pub fn first_data_line(text: &str) -> Option<&str> {
    text.lines()
        .find(|line| !line.starts_with('#'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Split a data line into the fields the report needs.
pub fn parse_vcf_line(line: &str) -> Lookup {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < MIN_VCF_COLUMNS {
        return Lookup::Malformed {
            columns: columns.len(),
        };
    }

    let genotype = columns[SAMPLE_COLUMN]
        .split(':')
        .next()
        .unwrap_or_default();

    Lookup::Found(VcfFields {
        reference: columns[REF_COLUMN].to_string(),
        alternative: columns[ALT_COLUMN].to_string(),
        genotype: genotype.to_string(),
        info: columns[INFO_COLUMN].to_string(),
    })
}

/// Look up the first record in `bcftools view` output.
pub fn lookup(output: &str) -> Lookup {
    match first_data_line(output) {
        Some(line) => parse_vcf_line(line),
        None => Lookup::Absent,
    }
}
