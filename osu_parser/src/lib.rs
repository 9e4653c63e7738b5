use std::{fs, path::Path};

use log::info;
use osu_schema::Beatmap;

mod assemble;
mod cursor;
mod error;
mod fields;
mod hit_objects;
mod keyword;
mod parser;
mod timing;

pub use error::{ParseError, ParseErrorKind};

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Source name attached to errors.
    pub file: Option<String>,
    /// Append a silent hit at infinite time after the last hit object.
    pub append_sentinel: bool,
    /// Reject beatmaps without hit objects (`E6003`).
    pub require_hit_objects: bool,
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Beatmap, ParseError> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Reads and parses `path`. Errors carry the path unless `options.file` names
/// the source already.
///
/// Invalid UTF-8 is replaced rather than rejected, so binary noise ahead of
/// the format header reaches the header matcher.
pub fn parse_file_with_options(
    path: impl AsRef<Path>,
    mut options: ParseOptions,
) -> Result<Beatmap, ParseError> {
    let path = path.as_ref();
    let file = options
        .file
        .get_or_insert_with(|| path.display().to_string())
        .clone();
    let bytes = fs::read(path).map_err(|e| {
        ParseError::new("E2001", format!("failed to read beatmap: {e}"), 0).with_file(file)
    })?;
    parse_bytes_with_options(&bytes, options)
}

pub fn parse_bytes(bytes: &[u8]) -> Result<Beatmap, ParseError> {
    parse_bytes_with_options(bytes, ParseOptions::default())
}

pub fn parse_bytes_with_options(
    bytes: &[u8],
    options: ParseOptions,
) -> Result<Beatmap, ParseError> {
    parse_str_with_options(&String::from_utf8_lossy(bytes), options)
}

pub fn parse_str(src: &str) -> Result<Beatmap, ParseError> {
    parse_str_with_options(src, ParseOptions::default())
}

pub fn parse_str_with_options(src: &str, options: ParseOptions) -> Result<Beatmap, ParseError> {
    let attach_file = |e: ParseError| match &options.file {
        Some(file) => e.with_file(file),
        None => e,
    };

    let beatmap = parser::parse_document(src).map_err(attach_file)?;
    let beatmap = assemble::finish(beatmap, &options).map_err(attach_file)?;

    info!(
        "parsed beatmap v{}: {} timing points, {} hit objects, {} colours",
        beatmap.version,
        beatmap.timing_points.len(),
        beatmap.hit_objects.len(),
        beatmap.colors.len()
    );
    Ok(beatmap)
}

#[cfg(test)]
mod tests;
