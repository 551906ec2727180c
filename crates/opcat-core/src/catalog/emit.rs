use serde::Serialize;

use super::Catalog;
use crate::GeneratedFile;

pub const OPERATIONS_FILE: &str = "operations.json";
pub const PAGINATION_MAP_FILE: &str = "pagination-map.json";
pub const COLLISIONS_FILE: &str = "catalog-collisions.json";
pub const GENERATED_AT_FILE: &str = "generated-at.txt";

/// Render the catalog's output files.
///
/// `generated_at` is written verbatim to `generated-at.txt`; everything else
/// depends only on the catalog, so identical catalogs render identical JSON.
/// The collisions file is only produced when a key had to be disambiguated.
pub fn emit_files(
    catalog: &Catalog,
    generated_at: &str,
) -> Result<Vec<GeneratedFile>, serde_json::Error> {
    let mut files = vec![
        json_file(OPERATIONS_FILE, &catalog.operations)?,
        json_file(PAGINATION_MAP_FILE, &catalog.paging)?,
    ];
    if !catalog.collisions.is_empty() {
        files.push(json_file(COLLISIONS_FILE, &catalog.collisions)?);
    }
    files.push(GeneratedFile {
        path: GENERATED_AT_FILE.to_string(),
        content: format!("{generated_at}\n"),
    });
    Ok(files)
}

fn json_file<T: Serialize>(path: &str, value: &T) -> Result<GeneratedFile, serde_json::Error> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    Ok(GeneratedFile {
        path: path.to_string(),
        content,
    })
}
