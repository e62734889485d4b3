use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::PipelineError;

/// Single 1-based coordinate on a chromosome, rendered as `chrom:pos`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicPosition {
    /// Chromosome/contig name.
    pub chrom: Cow<'static, str>,
    /// 1-based coordinate.
    pub pos: u64,
}

impl GenomicPosition {
    /// Construct a position from a static chromosome name.
    pub const fn new(chrom: &'static str, pos: u64) -> Self {
        Self {
            chrom: Cow::Borrowed(chrom),
            pos,
        }
    }
}

impl fmt::Display for GenomicPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chrom, self.pos)
    }
}

/// Closed 1-based interval on a chromosome, rendered as `chrom:start-end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicRegion {
    /// Chromosome/contig name.
    pub chrom: Cow<'static, str>,
    /// First covered coordinate.
    pub start: u64,
    /// Last covered coordinate (inclusive).
    pub end: u64,
}

impl GenomicRegion {
    /// Construct a region from a static chromosome name.
    pub const fn new(chrom: &'static str, start: u64, end: u64) -> Self {
        Self {
            chrom: Cow::Borrowed(chrom),
            start,
            end,
        }
    }

    /// Whether the position lies inside the region.
    pub fn contains(&self, position: &GenomicPosition) -> bool {
        self.chrom == position.chrom && (self.start..=self.end).contains(&position.pos)
    }
}

impl fmt::Display for GenomicRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

impl FromStr for GenomicRegion {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chrom, range) = split_contig(s)?;
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| PipelineError::InvalidCoordinate(format!("missing '-' in '{s}'")))?;
        let start = parse_coordinate(s, start)?;
        let end = parse_coordinate(s, end)?;
        if start > end {
            return Err(PipelineError::InvalidCoordinate(format!(
                "start {start} is past end {end} in '{s}'"
            )));
        }
        Ok(Self {
            chrom: Cow::Owned(chrom.to_string()),
            start,
            end,
        })
    }
}

fn split_contig(s: &str) -> Result<(&str, &str), PipelineError> {
    let (chrom, rest) = s
        .trim()
        .rsplit_once(':')
        .ok_or_else(|| PipelineError::InvalidCoordinate(format!("missing ':' in '{s}'")))?;
    if chrom.is_empty() {
        return Err(PipelineError::InvalidCoordinate(format!(
            "empty chromosome in '{s}'"
        )));
    }
    Ok((chrom, rest))
}

fn parse_coordinate(full: &str, value: &str) -> Result<u64, PipelineError> {
    match value.parse::<u64>() {
        Ok(0) | Err(_) => Err(PipelineError::InvalidCoordinate(format!(
            "bad coordinate '{value}' in '{full}'"
        ))),
        Ok(pos) => Ok(pos),
    }
}
