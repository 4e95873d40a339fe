use std::{fs, io::Write, path::Path};

use chrono::{DateTime, Local, Utc};
use log::{debug, error, trace};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::{Result, Time, WellError};

/// Helper method to load a JSON document from file
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Loading JSON from file: {}", path.display());
    let content = fs::read_to_string(path).map_err(|e| {
        error!("Failed to open file {}: {}", path.display(), e);
        WellError::Io(e)
    })?;

    let value = serde_json::from_str(&content).map_err(|e| {
        error!("Failed to parse {}: {}", path.display(), e);
        WellError::Serialization(e)
    })?;

    trace!("Successfully loaded {}", path.display());
    Ok(value)
}

/// Writes a value as pretty JSON through a temporary file in the same
/// directory, then renames it over the target.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        debug!("Creating parent directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| {
            error!("Failed to create directory {}: {}", dir.display(), e);
            WellError::Io(e)
        })?;
    }

    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
        error!("Failed to create temporary file: {}", e);
        WellError::Io(e)
    })?;

    trace!("Serializing to JSON");
    let json = serde_json::to_string_pretty(value)?;

    temp_file.write_all(json.as_bytes()).map_err(|e| {
        error!("Failed to write to temporary file: {}", e);
        WellError::Io(e)
    })?;
    temp_file.flush().map_err(|e| {
        error!("Failed to flush temporary file: {}", e);
        WellError::Io(e)
    })?;

    temp_file.persist(path).map_err(|e| {
        error!("Failed to persist file {}: {}", path.display(), e.error);
        WellError::Io(e.error)
    })?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Renders service ticks as a local calendar date, e.g. "March 4, 2026".
pub fn format_date(ticks: Time) -> String {
    let at: DateTime<Local> =
        DateTime::<Utc>::from_timestamp_nanos(ticks).with_timezone(&Local);
    at.format("%B %-d, %Y").to_string()
}

// Helper method for parsing `key=value` settings
pub fn parse_key_value(setting: &str) -> Result<(String, String)> {
    match setting.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(WellError::ConfigError {
            message: format!("Expected key=value, got '{}'", setting),
        }),
    }
}

/// Removes `<!-- ... -->` spans left by the editor template, including ones
/// spanning several lines. Lines that held nothing but a comment are dropped;
/// everything the user typed outside a comment is kept verbatim.
pub fn process_editor_content(content: &str) -> String {
    let mut kept = Vec::new();
    let mut in_comment = false;

    for line in content.lines() {
        let mut text = String::new();
        let mut rest = line;
        let mut had_comment = in_comment;

        loop {
            if in_comment {
                match rest.find("-->") {
                    Some(end) => {
                        rest = &rest[end + 3..];
                        in_comment = false;
                    }
                    None => break,
                }
            } else {
                match rest.find("<!--") {
                    Some(start) => {
                        text.push_str(&rest[..start]);
                        rest = &rest[start + 4..];
                        in_comment = true;
                        had_comment = true;
                    }
                    None => {
                        text.push_str(rest);
                        break;
                    }
                }
            }
        }

        if had_comment && text.trim().is_empty() {
            continue;
        }
        kept.push(text);
    }

    trace!("Editor content reduced to {} lines", kept.len());
    kept.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_parsing() {
        assert_eq!(
            parse_key_value("cache_ttl_secs = 30").unwrap(),
            ("cache_ttl_secs".to_string(), "30".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn editor_comments_are_removed() {
        let content = "<!-- write below -->\nFelt calmer today\n<!--\nhint\n-->\n";
        assert_eq!(process_editor_content(content), "Felt calmer today");
    }

    #[test]
    fn user_text_with_comment_markers_is_kept() {
        let content = "<!-- Write your journal entry below. -->\n\n\
                       Woke at 3am, heart racing -->\n\
                       then calmer after breathing\n";
        assert_eq!(
            process_editor_content(content),
            "Woke at 3am, heart racing -->\nthen calmer after breathing"
        );
    }

    #[test]
    fn inline_comment_is_cut_out_of_the_line() {
        let content = "Slept <!-- fill in hours -->six hours\n";
        assert_eq!(process_editor_content(content), "Slept six hours");
    }

    #[test]
    fn json_round_trip_through_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        write_json_atomic(&path, &vec![1u32, 2, 3]).unwrap();
        let back: Vec<u32> = read_json_file(&path).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }
}
