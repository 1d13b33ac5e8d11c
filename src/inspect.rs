use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::thread;

use log::{debug, info};

use crate::error::FixtureError;
use crate::fixture::{BODY_LEN, HEADER};

const CHUNK_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub body_len: usize,
    // indexed by digit value
    pub hex_histogram: [u64; 16],
    pub other_ascii: u64,
    pub non_ascii: u64,
}

impl Report {
    pub fn hex_total(&self) -> u64 {
        self.hex_histogram.iter().sum()
    }

    pub fn other_ratio(&self) -> f64 {
        if self.body_len == 0 {
            0.0
        } else {
            self.other_ascii as f64 / self.body_len as f64
        }
    }

    pub fn is_valid_fixture(&self) -> bool {
        self.body_len == BODY_LEN && self.non_ascii == 0
    }

    fn merge(&mut self, other: &Report) {
        self.body_len += other.body_len;
        for (a, b) in self.hex_histogram.iter_mut().zip(other.hex_histogram.iter()) {
            *a += b;
        }
        self.other_ascii += other.other_ascii;
        self.non_ascii += other.non_ascii;
    }
}

// Tallies a single chunk of body bytes
fn scan_chunk(chunk: &[u8]) -> Report {
    let mut report = Report {
        body_len: chunk.len(),
        ..Report::default()
    };
    for &byte in chunk {
        match byte {
            b'0'..=b'9' => report.hex_histogram[(byte - b'0') as usize] += 1,
            b'a'..=b'f' => report.hex_histogram[(byte - b'a' + 10) as usize] += 1,
            0..=0x7f => report.other_ascii += 1,
            _ => report.non_ascii += 1,
        }
    }
    report
}

// Checks the header and tallies every body byte
pub fn inspect_bytes(data: &[u8]) -> Result<Report, FixtureError> {
    let workers = thread::available_parallelism().map_or(1, |n| n.get());
    inspect_with_workers(data, workers)
}

// Splits the body into chunks and hands worker `w` every chunk `i` with
// `i % workers == w`.
fn inspect_with_workers(data: &[u8], workers: usize) -> Result<Report, FixtureError> {
    if !data.starts_with(HEADER) {
        return Err(FixtureError::MissingHeader);
    }
    let body = &data[HEADER.len()..];
    let chunk_count = body.len().div_ceil(CHUNK_SIZE);
    let workers = workers.clamp(1, chunk_count.max(1));

    let partials = crossbeam::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                s.spawn(move |_| {
                    let mut partial = Report::default();
                    for (i, chunk) in body.chunks(CHUNK_SIZE).enumerate().skip(w).step_by(workers) {
                        debug!("scanning chunk at offset 0x{:X}", i * CHUNK_SIZE);
                        partial.merge(&scan_chunk(chunk));
                    }
                    partial
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    })
    .unwrap_or_else(|e| std::panic::resume_unwind(e));

    let mut report = Report::default();
    for partial in &partials {
        report.merge(partial);
    }
    info!(
        "inspected {} body bytes: {} hex, {} other ascii, {} non-ascii",
        report.body_len,
        report.hex_total(),
        report.other_ascii,
        report.non_ascii
    );
    Ok(report)
}

// Reads the whole fixture into memory, like a dump, then inspects it
pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<Report, FixtureError> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    inspect_bytes(&buffer)
}
