//! Record assembly: one buffer of raw lines in, one fixed-width row out.

use segment::{SegmentTooLong, Splitter};
use thiserror::Error;

use crate::schema::Schema;

/// A mismatch between the schema and the actual data. Both variants abort
/// the record being assembled; neither is downgraded or auto-corrected,
/// since truncating extra data would silently corrupt output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// One line carried more data elements than its schema rule allows.
    #[error(transparent)]
    SegmentTooLong(#[from] SegmentTooLong),

    /// One logical record collected more lines of a segment type than that
    /// type's `max_occurs`.
    #[error("expecting at most {expected} {segment} segment(s) in one record, got {actual}")]
    OccursExceeded {
        /// Offending segment type code
        segment: String,
        /// `max_occurs` declared by the schema rule
        expected: usize,
        /// Matching lines actually collected
        actual: usize,
    },
}

/// Assembles the raw lines of one logical record into a flat row whose
/// length and order match [`Schema::columns`].
#[derive(Debug, Clone)]
pub struct Assembler {
    schema: Schema,
    splitter: Splitter,
}

impl Assembler {
    pub fn new(schema: Schema, splitter: Splitter) -> Self {
        Self { schema, splitter }
    }

    /// The schema driving assembly.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The line splitter in use.
    #[inline]
    pub fn splitter(&self) -> Splitter {
        self.splitter
    }

    /// Assemble one logical record.
    ///
    /// Iterates the schema in its declared order, not the arrival order of
    /// the lines; that is what normalizes interleaved or reordered input
    /// segments into a stable column layout. Absent occurrences of optional
    /// or repeatable types are filled with empty strings, so every record
    /// comes out the same width.
    ///
    /// # Errors
    ///
    /// [`ParseError::OccursExceeded`] when more lines of one type were
    /// collected than the rule allows, [`ParseError::SegmentTooLong`] when
    /// a single line overflows its element count. No partial record is
    /// returned in either case.
    pub fn assemble<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<String>, ParseError> {
        let mut values = Vec::with_capacity(self.schema.width());

        for (code, rule) in self.schema.entries() {
            let mut matched: Vec<&str> = lines
                .iter()
                .map(AsRef::as_ref)
                .filter(|line| self.splitter.peek_type(line) == code)
                .collect();
            // Raw-text sort. Not semantic: it pins the output when several
            // same-type lines could otherwise arrive in arbitrary order.
            matched.sort_unstable();

            for line in &matched {
                let elements = self.splitter.parse(line, rule.element_count())?;
                values.extend(elements.into_iter().map(str::to_owned));
            }

            if matched.len() > rule.max_occurs() {
                return Err(ParseError::OccursExceeded {
                    segment: code.to_owned(),
                    expected: rule.max_occurs(),
                    actual: matched.len(),
                });
            }
            for _ in matched.len()..rule.max_occurs() {
                values.extend(std::iter::repeat_with(String::new).take(rule.element_count()));
            }
        }

        debug_assert_eq!(values.len(), self.schema.width());
        Ok(values)
    }
}
