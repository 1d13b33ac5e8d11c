pub mod error;
pub mod fixture;
pub mod inspect;

pub use error::FixtureError;
pub use fixture::{
    default_output_path, draw, generate, write_body, Draw, GenerationStats, BODY_LEN,
    FIXTURE_FILE_NAME, HEADER, RARE_ODDS,
};
pub use inspect::{inspect_bytes, inspect_file, Report};
