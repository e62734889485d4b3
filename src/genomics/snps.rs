use super::{GenomicPosition, GenomicRegion};

/// Region on chromosome 15 containing the CYP1A2 gene.
pub const CYP1A2_REGION: GenomicRegion = GenomicRegion::new("chr15", 74_745_879, 74_756_607);

/// Known SNP with an optional star-allele name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnpDescriptor {
    /// dbSNP identifier.
    pub id: &'static str,
    /// Alternate name, e.g. a star allele.
    pub name: Option<&'static str>,
    /// Coordinate queried in the annotated VCF.
    pub position: GenomicPosition,
}

impl SnpDescriptor {
    /// `id`, or `id (name)` when an alternate name exists.
    pub fn description(&self) -> String {
        match self.name {
            Some(name) => format!("{} ({})", self.id, name),
            None => self.id.to_string(),
        }
    }
}

/// SNPs reported on, in report order.
pub static KNOWN_SNPS: [SnpDescriptor; 5] = [
    SnpDescriptor {
        id: "rs762551",
        name: Some("CYP1A2*1F"),
        position: GenomicPosition::new("chr15", 74_749_576),
    },
    SnpDescriptor {
        id: "rs2069514",
        name: Some("CYP1A2*1C"),
        position: GenomicPosition::new("chr15", 74_754_823),
    },
    SnpDescriptor {
        id: "rs2472300",
        name: None,
        position: GenomicPosition::new("chr15", 74_749_234),
    },
    SnpDescriptor {
        id: "rs2472304",
        name: None,
        position: GenomicPosition::new("chr15", 74_751_897),
    },
    SnpDescriptor {
        id: "rs2470893",
        name: None,
        position: GenomicPosition::new("chr15", 74_745_879),
    },
];
