//! Streaming record parser: boundary detection over an unbounded line
//! sequence.

use segment::Splitter;

use crate::assembler::{Assembler, ParseError};
use crate::schema::Schema;

/// Streaming parser for a whole feed.
///
/// Owns a [`Schema`] and its derived column list; [`Parser::records`] scans
/// a line sequence in a single pass, holding at most one logical record's
/// lines in memory. Each parser instance has its own buffer, so two
/// independent inputs can be parsed concurrently with two instances and no
/// synchronization.
#[derive(Debug, Clone)]
pub struct Parser {
    assembler: Assembler,
    columns: Vec<String>,
}

impl Parser {
    /// Parser for `schema` with the default `*` element delimiter.
    pub fn new(schema: Schema) -> Self {
        Self::with_delimiter(schema, '*')
    }

    /// Parser for a feed using a different element delimiter.
    pub fn with_delimiter(schema: Schema, delimiter: char) -> Self {
        let columns = schema.columns();
        Self {
            assembler: Assembler::new(schema, Splitter::new(delimiter)),
            columns,
        }
    }

    /// The schema driving this parser.
    pub fn schema(&self) -> &Schema {
        self.assembler.schema()
    }

    /// The header segment type whose recurrence starts a new record.
    pub fn header(&self) -> &str {
        self.schema().header()
    }

    /// Column names of every assembled record, computed once from the
    /// schema. This is the shape contract with any serialization layer:
    /// each yielded record has exactly this many values, in this order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Stream `lines` into assembled records.
    ///
    /// Pull-based: one input line is consumed at a time and a record is
    /// yielded as soon as its boundary is known. Lines before the first
    /// header line and lines of unknown segment types are silently
    /// discarded (tolerance, not validation). A trailing record at end of
    /// input is flushed exactly once.
    ///
    /// The first `Err` ends the stream: the iterator is fused afterwards.
    /// Records yielded before the error remain valid, which matters for
    /// callers writing rows out incrementally.
    pub fn records<I>(&self, lines: I) -> Records<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str> + Into<String>,
    {
        Records {
            parser: self,
            lines: lines.into_iter(),
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Eagerly parse a whole feed held in memory.
    pub fn parse(&self, input: &str) -> Result<Vec<Vec<String>>, ParseError> {
        self.records(input.lines()).collect()
    }

    /// Pair one record's values with the column names, in order.
    pub fn zip(&self, values: Vec<String>) -> Vec<(String, String)> {
        self.columns.iter().cloned().zip(values).collect()
    }

    /// Like [`Parser::parse`], but each record comes back as ordered
    /// name/value pairs.
    pub fn parse_zipped(&self, input: &str) -> Result<Vec<Vec<(String, String)>>, ParseError> {
        Ok(self
            .parse(input)?
            .into_iter()
            .map(|values| self.zip(values))
            .collect())
    }
}

/// Iterator returned by [`Parser::records`].
///
/// State machine: empty buffer = seeking the first header line; non-empty
/// buffer = collecting one record. A header line flushes the buffer it
/// closes and opens the next one; end of input flushes whatever is left.
pub struct Records<'p, I> {
    parser: &'p Parser,
    lines: I,
    buffer: Vec<String>,
    done: bool,
}

impl<'p, I> Iterator for Records<'p, I>
where
    I: Iterator,
    I::Item: AsRef<str> + Into<String>,
{
    type Item = Result<Vec<String>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let Some(line) = self.lines.next() else {
                // end of input: flush the trailing record, if any
                self.done = true;
                if self.buffer.is_empty() {
                    return None;
                }
                let flushed = self.parser.assembler.assemble(&self.buffer);
                self.buffer.clear();
                return Some(flushed);
            };

            let code = self.parser.assembler.splitter().peek_type(line.as_ref());

            if code == self.parser.header() {
                if self.buffer.is_empty() {
                    // first header seen: start collecting
                    self.buffer.push(line.into());
                    continue;
                }
                let flushed = self.parser.assembler.assemble(&self.buffer);
                self.buffer.clear();
                self.buffer.push(line.into());
                if flushed.is_err() {
                    self.done = true;
                }
                return Some(flushed);
            }

            if !self.buffer.is_empty() && self.parser.schema().contains(code) {
                self.buffer.push(line.into());
            }
            // unknown types, and known types seen before any header, are
            // dropped: there is no record to attach them to
        }
    }
}

impl<'p, I> std::iter::FusedIterator for Records<'p, I>
where
    I: Iterator,
    I::Item: AsRef<str> + Into<String>,
{
}
