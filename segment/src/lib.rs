//! Segment line splitter
//!
//! Line-level operations for delimiter-separated eligibility segments.
//! A segment is one line of text: a short type code followed by delimited
//! data elements, e.g. `REF*23*BOB SMITH`.
//!
//! # Design Philosophy
//! - Zero-copy: every returned piece borrows from the input line
//! - Stateless: a [`Splitter`] only carries the delimiter character
//! - Eager errors: element overflow is detected here, at the line level,
//!   before any record assembly happens
//!
//! Ownership of field values begins one layer up, when a record is
//! assembled from its lines.

use thiserror::Error;

/// A single line carries more data elements than its schema rule allows.
///
/// The element count excludes the leading type code: `REF*23*BOB SMITH`
/// has two data elements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("too many elements: expecting at most {expected} for segment {segment}, got {actual}")]
pub struct SegmentTooLong {
    /// Type code of the offending line
    pub segment: String,
    /// Element count declared by the schema rule
    pub expected: usize,
    /// Element count actually present on the line
    pub actual: usize,
}

/// Splits raw segment lines on a single-character element delimiter.
///
/// The delimiter is configurable per feed (`*` by default). No escaping is
/// supported: element content must not contain the delimiter itself.
#[derive(Debug, Clone, Copy)]
pub struct Splitter {
    delimiter: char,
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new('*')
    }
}

impl Splitter {
    /// Create a splitter for the given element delimiter.
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// The element delimiter this splitter was built with.
    #[inline]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Split a line into its trimmed pieces, type code first.
    ///
    /// Empty trailing fields are preserved: the delimiter count, not the
    /// content, determines the piece count (`M1*******` yields 8 pieces).
    /// Each piece is trimmed of surrounding whitespace; whitespace inside
    /// a piece is kept.
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        line.split(self.delimiter).map(str::trim).collect()
    }

    /// Type code of a line, without splitting the rest of it.
    ///
    /// Scans only up to the first delimiter; cheap enough to call once per
    /// line in the streaming hot path.
    #[inline]
    pub fn peek_type<'a>(&self, line: &'a str) -> &'a str {
        match line.find(self.delimiter) {
            Some(idx) => &line[..idx],
            None => line,
        }
        .trim()
    }

    /// Parse a line against a schema rule of `element_count` data elements.
    ///
    /// The leading type code is dropped from the result. Lines with fewer
    /// elements are padded on the right with empty strings to exactly
    /// `element_count` entries. Lines with more fail with [`SegmentTooLong`];
    /// extra data is never silently truncated.
    pub fn parse<'a>(
        &self,
        line: &'a str,
        element_count: usize,
    ) -> Result<Vec<&'a str>, SegmentTooLong> {
        let mut pieces = self.split(line);
        // split always yields at least the type code piece
        let actual = pieces.len() - 1;
        if actual > element_count {
            return Err(SegmentTooLong {
                segment: pieces[0].to_owned(),
                expected: element_count,
                actual,
            });
        }
        pieces.remove(0);
        pieces.resize(element_count, "");
        Ok(pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_a_well_formed_line() {
        let splitter = Splitter::default();
        assert_eq!(
            splitter.split("NM1*IL*1*CALRISSIAN*LANDO*S***34*111223333"),
            vec!["NM1", "IL", "1", "CALRISSIAN", "LANDO", "S", "", "", "34", "111223333"]
        );
    }

    #[test]
    fn peeks_the_type_code() {
        let splitter = Splitter::default();
        assert_eq!(splitter.peek_type("REF*23*BOB SMITH"), "REF");
        assert_eq!(splitter.peek_type("   NM1*IL*1"), "NM1");
        assert_eq!(splitter.peek_type("BARE"), "BARE");
        assert_eq!(splitter.peek_type(""), "");
    }

    #[test]
    fn delimiter_count_determines_piece_count() {
        // 7 delimiters split into 8 pieces, all but the first empty
        let splitter = Splitter::default();
        let pieces = splitter.split("M1*******");
        assert_eq!(pieces.len(), 8);
        assert_eq!(pieces[0], "M1");
        assert!(pieces[1..].iter().all(|p| p.is_empty()));
    }

    #[test]
    fn trims_piece_edges_but_keeps_interior_whitespace() {
        let splitter = Splitter::default();
        let pieces = splitter.split("   NM1*  IL*1*CALRI SIAN*LANDO   ");
        assert_eq!(pieces, vec!["NM1", "IL", "1", "CALRI SIAN", "LANDO"]);
    }

    #[test]
    fn parse_drops_type_code_and_pads_short_lines() {
        let splitter = Splitter::default();
        let elements = splitter.parse("NM1*IL*1*CALRISSIAN*LANDO*1", 7).unwrap();
        assert_eq!(elements, vec!["IL", "1", "CALRISSIAN", "LANDO", "1", "", ""]);
    }

    #[test]
    fn parse_accepts_exact_element_count() {
        let splitter = Splitter::default();
        let elements = splitter.parse("REF*23*BOB SMITH", 2).unwrap();
        assert_eq!(elements, vec!["23", "BOB SMITH"]);
    }

    #[test]
    fn parse_rejects_element_overflow() {
        let splitter = Splitter::default();
        let err = splitter
            .parse(
                "NM1*IL*1*CALRISSIAN*LANDO*VAPOR TOWERS*APT 3A*OUTPOST A*BESPIN*34*111223333",
                8,
            )
            .unwrap_err();
        assert_eq!(err.segment, "NM1");
        assert_eq!(err.expected, 8);
        assert_eq!(err.actual, 10);
        assert!(err.to_string().contains("too many elements"));
    }

    #[test]
    fn parse_of_bare_type_code_is_all_filler() {
        let splitter = Splitter::default();
        assert_eq!(splitter.parse("HD", 3).unwrap(), vec!["", "", ""]);
    }

    #[test]
    fn alternate_delimiters_are_honored() {
        let splitter = Splitter::new('~');
        assert_eq!(splitter.split("INS~Y~18"), vec!["INS", "Y", "18"]);
        assert_eq!(splitter.peek_type("INS~Y~18"), "INS");
    }
}
