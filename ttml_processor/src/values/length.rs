//! TTML length values.

use regex::Regex;
use std::sync::LazyLock;

/// Rows of the cell grid a `c` length is measured against.
pub const CELL_ROWS: f64 = 15.0;

static LENGTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([+-]?)\s*(\.\d+|\d+\.\d+|\d+)\s*(px|em|c|%)")
        .expect("failed to compile LENGTH_REGEX")
});

/// Extracts every `<number><unit>` term from `value`.
///
/// Units are `px`, `em`, `c` and `%`. Cell lengths are converted to pixels against
/// `cell_height`, the height of the caption area. Anything that is not a length is
/// dropped, so an empty result means "no usable length".
#[must_use]
pub fn parse_lengths(value: &str, cell_height: f64) -> Vec<String> {
    LENGTH_REGEX
        .captures_iter(value)
        .filter_map(|caps| {
            let sign = &caps[1];
            let number = &caps[2];
            let unit = &caps[3];
            if unit.eq_ignore_ascii_case("c") {
                let cells: f64 = format!("{sign}{number}").parse().ok()?;
                Some(cells_to_px(cells, cell_height))
            } else {
                Some(format!("{sign}{number}{unit}"))
            }
        })
        .collect()
}

/// First length term of `value`, if any.
#[must_use]
pub fn first_length(value: &str, cell_height: f64) -> Option<String> {
    parse_lengths(value, cell_height).into_iter().next()
}

fn cells_to_px(cells: f64, cell_height: f64) -> String {
    let px = (cells * cell_height / CELL_ROWS * 1000.0).round() / 1000.0;
    format!("{px}px")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_lengths() {
        assert_eq!(
            parse_lengths("10px 1.5em 50%", 540.0),
            vec!["10px", "1.5em", "50%"]
        );
        assert_eq!(parse_lengths("- 2 px", 540.0), vec!["-2px"]);
        assert_eq!(parse_lengths(".5em", 540.0), vec![".5em"]);
    }

    #[test]
    fn test_cells_are_converted_to_pixels() {
        assert_eq!(parse_lengths("1c", 540.0), vec!["36px"]);
        assert_eq!(parse_lengths("2c 0.5c", 300.0), vec!["40px", "10px"]);
        assert_eq!(parse_lengths("1C", 100.0), vec!["6.667px"]);
    }

    #[test]
    fn test_garbage_yields_empty_list() {
        assert!(parse_lengths("auto", 540.0).is_empty());
        assert!(parse_lengths("", 540.0).is_empty());
        assert_eq!(parse_lengths("auto 12px", 540.0), vec!["12px"]);
        assert_eq!(first_length("large", 540.0), None);
    }
}
