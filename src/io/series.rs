//! Plain-text time-series reading.
//!
//! A series file holds whitespace-separated samples, one or more per line.
//! Blank lines and lines starting with `#` are ignored. Proprietary recorder
//! formats are out of scope; exports to this layout are assumed.

use std::fs;
use std::path::Path;

use crate::error::AppError;

/// Read all samples of a series file.
pub fn read_series(path: &Path) -> Result<Vec<f64>, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::resource(format!("Cannot open series file '{}': {e}", path.display()))
    })?;
    parse_series(&text, path)
}

fn parse_series(text: &str, path: &Path) -> Result<Vec<f64>, AppError> {
    let mut samples = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| {
                AppError::resource(format!(
                    "Series file '{}' line {}: '{token}' is not a number.",
                    path.display(),
                    line_no + 1
                ))
            })?;
            samples.push(value);
        }
    }
    if samples.is_empty() {
        return Err(AppError::numeric(format!(
            "Series file '{}' contains no samples.",
            path.display()
        )));
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("test.asc")
    }

    #[test]
    fn parses_samples_and_skips_comments() {
        let text = "# calibration input\n1.0 2.0\n\n-3.5\n";
        let samples = parse_series(text, &path()).unwrap();
        assert_eq!(samples, vec![1.0, 2.0, -3.5]);
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        let err = parse_series("1.0 two 3.0\n", &path()).unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("two"));
    }

    #[test]
    fn rejects_empty_files() {
        let err = parse_series("# only comments\n", &path()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
