//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the interview prep API.
//!
//! Usage: `openapi [OUTPUT]`, where `OUTPUT` defaults to `openapi.json`.

use prep_api::web::rest::ApiDoc;
use std::{env, fs, path::PathBuf};
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let document = ApiDoc::openapi();
    fs::write(&output, document.to_pretty_json()?)?;
    println!(
        "Wrote {} documented paths to {}",
        document.paths.paths.len(),
        output.display()
    );
    Ok(())
}
