//! Schema-driven record assembly for eligibility segment files
//!
//! An eligibility feed is a sequence of segment lines. Groups of lines form
//! logical records: each record starts at a line of the schema's header
//! segment type and runs until the next header line or end of input. This
//! crate turns those groups into flat rows with a stable column order.
//!
//! Layers, leaves first:
//! - [`Schema`]: an ordered list of segment rules; order decides the header
//!   segment type and the output column order
//! - [`Assembler`]: one buffer of raw lines in, one fixed-width row out
//! - [`Parser`]: boundary detection over an unbounded line sequence,
//!   yielding assembled rows one at a time
//!
//! # Usage
//! ```
//! use record::{Parser, Schema, SegmentRule};
//!
//! let schema = Schema::new([
//!     ("INS", SegmentRule::new(2)),
//!     ("REF", SegmentRule::new(2)),
//! ])
//! .unwrap();
//!
//! let parser = Parser::new(schema);
//! let lines = ["INS*Y*18", "REF*23*BOB SMITH", "INS*Y*19", "REF*23*SALLY SUE"];
//!
//! let records: Result<Vec<_>, _> = parser.records(lines).collect();
//! assert_eq!(records.unwrap().len(), 2);
//! ```

mod assembler;
mod schema;
mod stream;

pub use assembler::{Assembler, ParseError};
pub use schema::{Schema, SchemaError, SegmentRule};
pub use stream::{Parser, Records};

pub use segment::{SegmentTooLong, Splitter};
