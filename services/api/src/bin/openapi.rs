//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document for the study transform API to disk.
//! Usage: `openapi [OUTPUT_PATH]` (defaults to `openapi.json`).

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT_PATH: &str = "openapi.json";

fn write_document(
    document: &utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, document.to_pretty_json()?)?;
    println!(
        "OpenAPI document with {} paths written to {}",
        document.paths.paths.len(),
        path
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string());
    write_document(&ApiDoc::openapi(), &path)
}
