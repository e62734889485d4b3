/// Label for `0/0`.
pub const HOMOZYGOUS_REFERENCE: &str = "Homozygous Reference";
/// Label for `0/1`.
pub const HETEROZYGOUS: &str = "Heterozygous";
/// Label for `1/1`.
pub const HOMOZYGOUS_ALTERNATE: &str = "Homozygous Alternate";

/// Map an unphased biallelic genotype code to its label.
///
/// Anything else, including phased (`0|1`), multi-allelic (`1/2`), missing
/// (`./.`) codes and already-mapped labels, is returned unchanged.
pub fn genotype_label(code: &str) -> &str {
    match code {
        "0/0" => HOMOZYGOUS_REFERENCE,
        "0/1" => HETEROZYGOUS,
        "1/1" => HOMOZYGOUS_ALTERNATE,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_not_remapped() {
        for label in [HOMOZYGOUS_REFERENCE, HETEROZYGOUS, HOMOZYGOUS_ALTERNATE] {
            assert_eq!(genotype_label(label), label);
        }
    }
}
