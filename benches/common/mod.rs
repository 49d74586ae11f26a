use std::fs;
use std::path::{Path, PathBuf};

/// The valid fixture programs double as benchmark workloads.
pub fn workloads() -> Vec<(String, PathBuf)> {
    [
        "arithmetic",
        "definite_assignment",
        "hello_world",
        "string_coercion",
    ]
    .iter()
    .map(|name| {
        (
            name.to_string(),
            PathBuf::from(format!("tests/programs/{name}/program.cpm")),
        )
    })
    .collect()
}

pub fn load_source(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("Reading {}: {err}", path.display()))
}
