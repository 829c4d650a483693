//! Two-column `time value` text tables for the lookup-table modulation

use std::fs;
use std::path::Path;

use crate::error::FileError;

/// Read a table file. Parentheses are ignored, blank lines and `#` comments
/// are skipped, every other line must hold exactly two numbers.
pub fn read_table(path: impl AsRef<Path>) -> Result<Vec<[f64; 2]>, FileError> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_table(&text)
}

pub fn parse_table(text: &str) -> Result<Vec<[f64; 2]>, FileError> {
    let mut rows = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").replace(['(', ')'], " ");
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 2 {
            return Err(FileError::Parse {
                line: i + 1,
                reason: format!("expected two columns [time value], found {}", fields.len()),
            });
        }
        let mut row = [0.0; 2];
        for (slot, field) in row.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|_| FileError::Parse {
                line: i + 1,
                reason: format!("\"{field}\" is not a number"),
            })?;
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_skips_comments() {
        let text = "# heartbeat\n0.0 1.0\n\n(0.5 2.0)\n1.0 3.0 # peak\n";
        let rows = parse_table(text).unwrap();
        assert_eq!(rows, vec![[0.0, 1.0], [0.5, 2.0], [1.0, 3.0]]);
    }

    #[test]
    fn rejects_wrong_column_count() {
        let err = parse_table("0.0 1.0\n0.5 2.0 7.0\n").unwrap_err();
        assert!(matches!(err, FileError::Parse { line: 2, .. }), "got {err:?}");
    }

    #[test]
    fn rejects_non_numeric() {
        let err = parse_table("0.0 one\n").unwrap_err();
        assert!(matches!(err, FileError::Parse { line: 1, .. }), "got {err:?}");
    }
}
