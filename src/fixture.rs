use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use rand::Rng;

use crate::error::FixtureError;

pub const HEADER: &[u8; 2] = b"1.";

// 2^20 generated characters after the header
pub const BODY_LEN: usize = 1 << 20;

// One position in RARE_ODDS takes the rare branch
pub const RARE_ODDS: u32 = 100;

pub const FIXTURE_FILE_NAME: &str = "large_out.txt";

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    // Any ASCII code point, control characters included
    Rare(u8),
    Common(u8),
}

impl Draw {
    pub fn byte(self) -> u8 {
        match self {
            Draw::Rare(b) | Draw::Common(b) => b,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub bytes_written: usize,
    pub rare: u64,
    pub common: u64,
}

// The crate directory, resolved at build time; a relocated binary still
// writes next to the sources it was built from.
pub fn default_output_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(FIXTURE_FILE_NAME)
}

// Weighted decision for a single body position
pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Draw {
    if rng.random_range(0..RARE_ODDS) == 0 {
        Draw::Rare(rng.random_range(0..=127u8))
    } else {
        Draw::Common(HEX_DIGITS[rng.random_range(0..16usize)])
    }
}

// Writes the header followed by `body_len` generated bytes, one per position
pub fn write_body<W: Write, R: Rng + ?Sized>(
    out: &mut W,
    rng: &mut R,
    body_len: usize,
) -> Result<GenerationStats, FixtureError> {
    let mut stats = GenerationStats::default();

    out.write_all(HEADER)?;
    for _ in 0..body_len {
        let d = draw(rng);
        match d {
            Draw::Rare(_) => stats.rare += 1,
            Draw::Common(_) => stats.common += 1,
        }
        debug_assert!(d.byte().is_ascii());
        out.write_all(&[d.byte()])?;
    }

    stats.bytes_written = HEADER.len() + body_len;
    Ok(stats)
}

// Compares the on-disk size against header plus body
fn verify_len(file: &File, body_len: usize) -> Result<(), FixtureError> {
    let expected = HEADER.len() + body_len;
    let actual = file.metadata()?.len() as usize;
    if actual != expected {
        return Err(FixtureError::LengthMismatch { expected, actual });
    }
    Ok(())
}

// Creates (or truncates) `path`, fills it with a full-size fixture and checks
// the resulting file length.
pub fn generate<P: AsRef<Path>, R: Rng + ?Sized>(
    path: P,
    rng: &mut R,
) -> Result<GenerationStats, FixtureError> {
    let path = path.as_ref();
    info!("writing fixture to {}", path.display());

    let mut writer = BufWriter::new(File::create(path)?);
    let stats = write_body(&mut writer, rng, BODY_LEN)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    verify_len(&file, BODY_LEN)?;

    info!(
        "wrote {} bytes ({} rare, {} common)",
        stats.bytes_written, stats.rare, stats.common
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io;

    #[test]
    fn draw_stays_in_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100_000 {
            match draw(&mut rng) {
                Draw::Rare(b) => assert!(b <= 127),
                Draw::Common(b) => assert!(HEX_DIGITS.contains(&b)),
            }
        }
    }

    #[test]
    fn rare_branch_emits_control_and_non_hex_bytes() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut rare = Vec::new();
        // ~20_000 rare draws; each of 0..=127 appears ~156 times.
        for _ in 0..2_000_000 {
            if let Draw::Rare(b) = draw(&mut rng) {
                rare.push(b);
            }
        }
        assert!(rare.iter().any(|&b| b < 0x20 || b == 0x7f));
        assert!(rare.contains(&0x00));
        assert!(rare.contains(&0x7f));
        assert!(rare.iter().any(|&b| !HEX_DIGITS.contains(&b)));
        assert!(rare.iter().any(|&b| b.is_ascii_uppercase()));
    }

    #[test]
    fn rare_branch_is_about_one_percent() {
        let mut rng = StdRng::seed_from_u64(2024);
        let samples = 2_000_000u64;
        let rare = (0..samples)
            .filter(|_| matches!(draw(&mut rng), Draw::Rare(_)))
            .count() as u64;
        // Expected 20_000, standard deviation ~141.
        assert!((19_000..=21_000).contains(&rare), "rare = {rare}");
    }

    #[test]
    fn common_branch_covers_every_digit() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 16];
        for _ in 0..10_000 {
            if let Draw::Common(b) = draw(&mut rng) {
                let i = HEX_DIGITS.iter().position(|&h| h == b).unwrap();
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn write_body_emits_header_then_one_byte_per_position() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut buf = Vec::new();
        let stats = write_body(&mut buf, &mut rng, 4096).unwrap();

        assert_eq!(buf.len(), 2 + 4096);
        assert_eq!(&buf[..2], b"1.");
        assert_eq!(stats.bytes_written, buf.len());
        assert_eq!(stats.rare + stats.common, 4096);
        assert!(buf[2..].iter().all(|b| b.is_ascii()));
    }

    #[test]
    fn empty_body_is_just_the_header() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut buf = Vec::new();
        let stats = write_body(&mut buf, &mut rng, 0).unwrap();
        assert_eq!(buf, b"1.");
        assert_eq!(stats.rare + stats.common, 0);
    }

    #[test]
    fn same_seed_same_bytes() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_body(&mut a, &mut StdRng::seed_from_u64(9), 1000).unwrap();
        write_body(&mut b, &mut StdRng::seed_from_u64(9), 1000).unwrap();
        assert_eq!(a, b);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_propagates() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = write_body(&mut FailingWriter, &mut rng, 10).unwrap_err();
        assert!(matches!(err, FixtureError::Io(_)));
    }

    #[test]
    fn short_file_is_a_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.txt");
        std::fs::write(&path, b"1.abc").unwrap();

        let file = File::open(&path).unwrap();
        let err = verify_len(&file, 10).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::LengthMismatch {
                expected: 12,
                actual: 5
            }
        ));
        assert!(verify_len(&file, 3).is_ok());
    }

    #[test]
    fn default_path_ends_with_fixture_name() {
        assert!(default_output_path().ends_with(FIXTURE_FILE_NAME));
    }
}
