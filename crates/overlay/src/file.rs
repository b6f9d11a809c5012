//! Custom overlay point-file parsing.
//!
//! The format is a plain text file: an identifying first line with a
//! version number, then any mix of `#` comment lines and point lines of
//! two whitespace-separated floats (X, Y).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use view_common::{ViewError, ViewResult};

/// Identifying tag expected on the first line.
pub const OVERLAY_MAGIC: &str = "NCVIEW-OVERLAY";

/// Versions this parser accepts.
const VERSION_MIN: f64 = 0.95;
const VERSION_MAX: f64 = 1.05;

/// Load overlay points from a file on disk.
pub fn load_overlay_file(path: &Path) -> ViewResult<Vec<(f64, f64)>> {
    let file = File::open(path).map_err(|e| ViewError::OverlayOpen {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_overlay(BufReader::new(file))
}

/// Parse overlay points from any line-oriented reader.
pub fn parse_overlay<R: BufRead>(reader: R) -> ViewResult<Vec<(f64, f64)>> {
    let mut lines = reader.lines().enumerate();

    let header = match lines.next() {
        Some((_, Ok(line))) => line,
        Some((_, Err(e))) => return Err(ViewError::ReadFailed(e.to_string())),
        None => return Err(ViewError::OverlayHeader("empty file".to_string())),
    };

    let mut parts = header.split_whitespace();
    match parts.next() {
        Some(tag) if tag == OVERLAY_MAGIC => {}
        Some(tag) => {
            return Err(ViewError::OverlayHeader(format!(
                "expected tag '{}', found '{}'",
                OVERLAY_MAGIC, tag
            )))
        }
        None => return Err(ViewError::OverlayHeader("missing tag".to_string())),
    }
    let version: f64 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ViewError::OverlayHeader("missing version number".to_string()))?;
    if !(VERSION_MIN..=VERSION_MAX).contains(&version) {
        return Err(ViewError::OverlayVersion(version));
    }

    let mut points = Vec::new();
    for (index, line) in lines {
        let line = line.map_err(|e| ViewError::ReadFailed(e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let x = fields.next().and_then(|f| f.parse::<f64>().ok());
        let y = fields.next().and_then(|f| f.parse::<f64>().ok());
        match (x, y, fields.next()) {
            (Some(x), Some(y), None) => points.push((x, y)),
            _ => {
                return Err(ViewError::OverlayFormat {
                    line: index + 1,
                    message: "expected two whitespace-separated floats".to_string(),
                })
            }
        }
    }

    Ok(points)
}
