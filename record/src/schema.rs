//! Segment schema: the ordered vocabulary of a feed.

use thiserror::Error;

/// A schema that cannot describe any feed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A schema needs at least a header segment type.
    #[error("schema has no segment entries")]
    Empty,

    /// Segment type codes must be unique within a schema.
    #[error("duplicate segment type {0} in schema")]
    DuplicateSegment(String),

    /// Every segment type must be allowed at least once per record.
    #[error("segment type {0} must allow at least one occurrence")]
    ZeroOccurs(String),
}

/// Per-segment-type rule: how many data elements one occurrence carries and
/// how many occurrences one logical record may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRule {
    element_count: usize,
    max_occurs: usize,
}

impl SegmentRule {
    /// Rule for a segment with `element_count` data elements, occurring at
    /// most once per record.
    pub fn new(element_count: usize) -> Self {
        Self {
            element_count,
            max_occurs: 1,
        }
    }

    /// Allow up to `max_occurs` occurrences per record.
    pub fn occurs(mut self, max_occurs: usize) -> Self {
        self.max_occurs = max_occurs;
        self
    }

    /// Data elements per occurrence, excluding the leading type code.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Maximum occurrences of this segment type within one record.
    #[inline]
    pub fn max_occurs(&self) -> usize {
        self.max_occurs
    }
}

/// Ordered mapping from segment type code to its [`SegmentRule`].
///
/// Kept as an explicit ordered list rather than a hash map: iteration order
/// is load-bearing. The first entry is the header segment type whose
/// recurrence marks record boundaries, and entry order fixes the column
/// order of every assembled record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    entries: Vec<(String, SegmentRule)>,
}

impl Schema {
    /// Build a schema from `(code, rule)` pairs in feed order.
    ///
    /// # Errors
    ///
    /// Rejects empty schemas, duplicate type codes, and rules with
    /// `max_occurs` of zero.
    pub fn new<I, S>(entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (S, SegmentRule)>,
        S: Into<String>,
    {
        let entries: Vec<(String, SegmentRule)> = entries
            .into_iter()
            .map(|(code, rule)| (code.into(), rule))
            .collect();

        if entries.is_empty() {
            return Err(SchemaError::Empty);
        }
        for (idx, (code, rule)) in entries.iter().enumerate() {
            if entries[..idx].iter().any(|(seen, _)| seen == code) {
                return Err(SchemaError::DuplicateSegment(code.clone()));
            }
            if rule.max_occurs == 0 {
                return Err(SchemaError::ZeroOccurs(code.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The EDI 834-like eligibility vocabulary, shipped as a convenience
    /// default. Any feed with a different shape supplies its own schema via
    /// [`Schema::new`].
    pub fn sample_834() -> Self {
        // known-unique literal, so the Schema::new validation is not needed
        let entries = [
            ("INS", SegmentRule::new(18)),
            ("REF", SegmentRule::new(3).occurs(5)),
            ("DTP", SegmentRule::new(4).occurs(3)),
            ("NM1", SegmentRule::new(10).occurs(2)),
            ("PER", SegmentRule::new(9)),
            ("N3", SegmentRule::new(2)),
            ("N4", SegmentRule::new(4)),
            ("DMG", SegmentRule::new(4)),
            ("HLH", SegmentRule::new(4)),
            ("HD", SegmentRule::new(6)),
            ("AMT", SegmentRule::new(3)),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(code, rule)| (code.to_owned(), rule))
                .collect(),
        }
    }

    /// The header segment type: the schema's first entry.
    pub fn header(&self) -> &str {
        &self.entries[0].0
    }

    /// Whether `code` is a segment type this schema knows about.
    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|(known, _)| known == code)
    }

    /// Entries in declared order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, SegmentRule)> + '_ {
        self.entries.iter().map(|(code, rule)| (code.as_str(), *rule))
    }

    /// Number of segment types in the schema.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total field count of one assembled record:
    /// `sum(element_count * max_occurs)` over all entries.
    pub fn width(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, rule)| rule.element_count * rule.max_occurs)
            .sum()
    }

    /// Derived column names, in output order.
    ///
    /// `{type}_{n}` for single-occurrence types, `{type}_{occurrence}_{n}`
    /// for repeatable ones; type codes lowercased, indices 1-based. A pure
    /// function of the schema: the same schema always yields the same list.
    pub fn columns(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width());
        for (code, rule) in &self.entries {
            let prefix = code.to_lowercase();
            if rule.max_occurs > 1 {
                for occurrence in 1..=rule.max_occurs {
                    for element in 1..=rule.element_count {
                        names.push(format!("{prefix}_{occurrence}_{element}"));
                    }
                }
            } else {
                for element in 1..=rule.element_count {
                    names.push(format!("{prefix}_{element}"));
                }
            }
        }
        names
    }
}
