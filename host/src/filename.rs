//! Output-filename sequences for simulating multi-part file transfers.
//!
//! Some AS2 clients enforce a maximum file size and split eligibility
//! files that exceed it into parts; the part filenames share a prefix and
//! carry timestamps that advance as the parts are transmitted. These
//! iterators reproduce that naming for generated test files. Each sequence
//! is finite and restartable only by constructing a fresh value.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SUFFIX: &str = ".txt";

/// Seconds by which the simulated transfer clock may advance between parts.
const MAX_STEP_SECONDS: i64 = 10;

/// Sequence of `834_fake_file_<epoch-seconds>.txt` names.
#[derive(Debug)]
pub struct FilenameSequence {
    now: DateTime<Utc>,
    remaining: u32,
    prefix: String,
    rng: StdRng,
}

impl FilenameSequence {
    pub const DEFAULT_PREFIX: &'static str = "834_fake_file_";

    /// Sequence of `nfiles` names starting from `start`.
    pub fn new(start: DateTime<Utc>, nfiles: u32) -> Self {
        Self::with_prefix(start, nfiles, Self::DEFAULT_PREFIX)
    }

    /// Same, with a caller-chosen filename prefix.
    pub fn with_prefix(start: DateTime<Utc>, nfiles: u32, prefix: impl Into<String>) -> Self {
        Self {
            now: start,
            remaining: nfiles,
            prefix: prefix.into(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for tests and reproducible runs.
    pub fn seeded(start: DateTime<Utc>, nfiles: u32, seed: u64) -> Self {
        let mut sequence = Self::new(start, nfiles);
        sequence.rng = StdRng::seed_from_u64(seed);
        sequence
    }

    fn advance(&mut self) {
        self.now += Duration::seconds(self.rng.gen_range(1..=MAX_STEP_SECONDS));
    }
}

impl Iterator for FilenameSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }
        let name = format!("{}{}{}", self.prefix, self.now.timestamp(), SUFFIX);
        self.advance();
        self.remaining -= 1;
        Some(name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

/// Sequence of multipart eligibility filenames:
///
/// `X12~005010X220A1~834~OUT-<client>.<seq>.<seq>.<YYYY-MM-DD_HH-MM-SS>.txt`
///
/// The client number and the two random sequence numbers are fixed at
/// construction and shared by every part; only the timestamp varies.
#[derive(Debug)]
pub struct MultipartFilename {
    base: String,
    now: DateTime<Utc>,
    remaining: u32,
    rng: StdRng,
}

impl MultipartFilename {
    pub const PREFIX: &'static str = "X12~005010X220A1~834~OUT-";

    /// Sequence of `nfiles` part names for the given AS2 client.
    pub fn new(start: DateTime<Utc>, nfiles: u32, client: u32) -> Self {
        Self::from_rng(start, nfiles, client, StdRng::from_entropy())
    }

    /// Deterministic sequence for tests and reproducible runs.
    pub fn seeded(start: DateTime<Utc>, nfiles: u32, client: u32, seed: u64) -> Self {
        Self::from_rng(start, nfiles, client, StdRng::seed_from_u64(seed))
    }

    fn from_rng(start: DateTime<Utc>, nfiles: u32, client: u32, mut rng: StdRng) -> Self {
        let base = format!(
            "{}{}.{}.{}.",
            Self::PREFIX,
            client,
            rng.gen_range(0..1_000_000),
            rng.gen_range(0..1_000_000),
        );
        Self {
            base,
            now: start,
            remaining: nfiles,
            rng,
        }
    }
}

impl Iterator for MultipartFilename {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }
        let name = format!("{}{}{}", self.base, self.now.format("%Y-%m-%d_%H-%M-%S"), SUFFIX);
        self.now += Duration::seconds(self.rng.gen_range(1..=MAX_STEP_SECONDS));
        self.remaining -= 1;
        Some(name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 4, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn yields_the_requested_number_of_names() {
        assert_eq!(FilenameSequence::seeded(start(), 3, 1).count(), 3);
        assert_eq!(MultipartFilename::seeded(start(), 4, 1, 1).count(), 4);
    }

    #[test]
    fn base_names_carry_epoch_timestamps() {
        let names: Vec<_> = FilenameSequence::seeded(start(), 2, 9).collect();

        assert_eq!(names[0], format!("834_fake_file_{}.txt", start().timestamp()));
        assert!(names[1].starts_with("834_fake_file_"));
        assert!(names[1].ends_with(".txt"));
        assert_ne!(names[0], names[1]);
    }

    #[test]
    fn part_timestamps_advance_between_one_and_ten_seconds() {
        let names: Vec<_> = FilenameSequence::seeded(start(), 5, 42).collect();

        let stamps: Vec<i64> = names
            .iter()
            .map(|name| {
                name.trim_start_matches(FilenameSequence::DEFAULT_PREFIX)
                    .trim_end_matches(".txt")
                    .parse()
                    .unwrap()
            })
            .collect();

        for pair in stamps.windows(2) {
            let step = pair[1] - pair[0];
            assert!((1..=10).contains(&step), "step was {step}");
        }
    }

    #[test]
    fn multipart_names_share_the_client_and_sequence_prefix() {
        let names: Vec<_> = MultipartFilename::seeded(start(), 4, 5, 7).collect();

        for name in &names {
            assert!(name.starts_with("X12~005010X220A1~834~OUT-5."));
            assert!(name.ends_with(".txt"));
        }

        // same random sequence numbers on every part: everything before the
        // timestamp is identical
        let base_of = |name: &str| {
            let tail = "2016-04-01_12-30-00.txt".len();
            name[..name.len() - tail].to_owned()
        };
        let first = base_of(&names[0]);
        assert!(names.iter().all(|name| base_of(name) == first));
    }

    #[test]
    fn multipart_names_embed_the_start_timestamp() {
        let names: Vec<_> = MultipartFilename::seeded(start(), 1, 1, 3).collect();
        assert!(names[0].contains("2016-04-01_12-30-00"));
    }
}
