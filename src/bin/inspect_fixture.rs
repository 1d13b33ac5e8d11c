use std::env;
use std::path::Path;

use hexfixture::{inspect_file, FixtureError, BODY_LEN};

fn main() -> Result<(), FixtureError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <fixture_path>", args[0]);
        std::process::exit(1);
    }
    let filename = &args[1];
    if !Path::new(filename).exists() {
        eprintln!("Error: File '{}' not found.", filename);
        std::process::exit(1);
    }

    let report = match inspect_file(filename) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error inspecting fixture: {}", e);
            return Err(e);
        }
    };

    println!("Body length: {} (expected {})", report.body_len, BODY_LEN);
    for (digit, count) in report.hex_histogram.iter().enumerate() {
        println!("  {:x}: {}", digit, count);
    }
    println!("Other ASCII: {} ({:.3}%)", report.other_ascii, report.other_ratio() * 100.0);
    println!("Non-ASCII: {}", report.non_ascii);

    if report.is_valid_fixture() {
        println!("PASS");
    } else {
        println!("FAIL");
        std::process::exit(1);
    }
    Ok(())
}
