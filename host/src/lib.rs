//! Eligibility Host Library
//!
//! I/O glue around the record engine: CSV rendering of flattened feeds,
//! synthetic 834-style file generation, and filename sequences for
//! simulating multi-part file transfers.
//!
//! The core engine never owns file handles; this crate is where readers,
//! writers and the filesystem live.

pub mod faker;
pub mod filename;

use std::io::{BufRead, Write};

use record::{ParseError, Parser};
use thiserror::Error;
use tracing::debug;

/// Everything that can go wrong at the host boundary: the domain errors
/// from the engine, plus I/O and CSV-layer failures.
#[derive(Error, Debug)]
pub enum HostError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Stream a segment feed into CSV.
///
/// Writes one header row from [`Parser::columns`], then one row per
/// assembled record, as records are yielded — rows land in `out`
/// incrementally, so everything written before a mid-stream failure is
/// still delivered. Returns the number of data rows written.
pub fn write_csv<R: BufRead, W: Write>(
    parser: &Parser,
    reader: R,
    out: W,
) -> Result<usize, HostError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(parser.columns())?;

    let mut rows = 0usize;
    let mut io_error = None;
    {
        let lines = reader.lines().map_while(|line| match line {
            Ok(line) => Some(line),
            Err(err) => {
                io_error = Some(err);
                None
            }
        });

        for record in parser.records(lines) {
            match record {
                Ok(values) => {
                    writer.write_record(&values)?;
                    rows += 1;
                }
                Err(err) => {
                    // rows already written stay written
                    writer.flush()?;
                    return Err(err.into());
                }
            }
        }
    }
    if let Some(err) = io_error {
        writer.flush()?;
        return Err(err.into());
    }

    writer.flush()?;
    debug!(rows, "flattened feed to csv");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use record::{Schema, SegmentRule};

    fn test_parser() -> Parser {
        Parser::new(
            Schema::new([
                ("INS", SegmentRule::new(2)),
                ("REF", SegmentRule::new(2)),
            ])
            .expect("valid test schema"),
        )
    }

    #[test]
    fn header_row_comes_first() {
        let mut out = Vec::new();
        let rows = write_csv(&test_parser(), "INS*Y*18\nREF*23*BOB SMITH\n".as_bytes(), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ins_1,ins_2,ref_1,ref_2"));
        assert_eq!(lines.next(), Some("Y,18,23,BOB SMITH"));
        assert_eq!(rows, 1);
    }

    #[test]
    fn values_containing_the_csv_delimiter_are_quoted() {
        let mut out = Vec::new();
        write_csv(
            &test_parser(),
            "INS*Y*18\nREF*23*SMITH, BOB\n".as_bytes(),
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"SMITH, BOB\""));
    }

    #[test]
    fn rows_before_a_failure_are_still_delivered() {
        let feed = "INS*Y*18\nREF*23*BOB SMITH\nINS*Y*19\nREF*23*A\nREF*23*B\n";

        let mut out = Vec::new();
        let err = write_csv(&test_parser(), feed.as_bytes(), &mut out).unwrap_err();

        assert!(matches!(err, HostError::Parse(_)));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Y,18,23,BOB SMITH"));
    }
}
