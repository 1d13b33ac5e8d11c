use hexfixture::{default_output_path, generate, FixtureError};

fn main() -> Result<(), FixtureError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = default_output_path();
    let mut rng = rand::rng();
    let stats = generate(&path, &mut rng)?;

    println!(
        "Generated {} ({} bytes, {} rare characters).",
        path.display(),
        stats.bytes_written,
        stats.rare
    );
    Ok(())
}
