//! TTML time expressions.

use regex::Regex;
use std::sync::LazyLock;

/// Frame rate used for `:FF` clock frames and the `f` offset unit.
///
/// `ttp:frameRate` on `<tt>` is not honoured, every document is treated as 30 fps.
pub const FRAME_RATE: f64 = 30.0;
/// Sub-frames per frame; sub-frame values are fractions of one frame.
pub const SUB_FRAME_RATE: f64 = 1.0;

/// `<number><metric>`, e.g. `1.5s`, `200ms`, `2m`, `12f`
static OFFSET_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)(h|ms|m|s|f)$").expect("failed to compile OFFSET_TIME_REGEX")
});

/// `HH:MM:SS`, optionally followed by `.fraction` or `:frames(.subframes)`
static CLOCK_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2})(?:\.(\d+)|:(\d{2,})(?:\.(\d+))?)?$")
        .expect("failed to compile CLOCK_TIME_REGEX")
});

/// Parses a TTML time expression into seconds.
///
/// Returns `None` when the expression matches neither the offset nor the clock grammar.
#[must_use]
pub fn parse_time_expression(value: &str) -> Option<f64> {
    let value = value.trim();
    parse_offset_time(value).or_else(|| parse_clock_time(value))
}

fn parse_offset_time(value: &str) -> Option<f64> {
    let caps = OFFSET_TIME_REGEX.captures(value)?;
    let number: f64 = caps[1].parse().ok()?;
    let seconds = match &caps[2] {
        "h" => number * 3600.0,
        "m" => number * 60.0,
        "s" => number,
        "ms" => number / 1000.0,
        "f" => number / FRAME_RATE,
        _ => return None,
    };
    Some(seconds)
}

fn parse_clock_time(value: &str) -> Option<f64> {
    let caps = CLOCK_TIME_REGEX.captures(value)?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    let mut total = hours * 3600.0 + minutes * 60.0 + seconds;

    if let Some(fraction) = caps.get(4) {
        total += format!("0.{}", fraction.as_str()).parse::<f64>().ok()?;
    } else if let Some(frames) = caps.get(5) {
        let frames = frames
            .as_str()
            .parse::<f64>()
            .ok()?
            .clamp(0.0, FRAME_RATE - 1.0);
        let sub_frames = match caps.get(6) {
            Some(sub) => (format!("0.{}", sub.as_str()).parse::<f64>().ok()? / SUB_FRAME_RATE)
                .clamp(0.0, 1.0),
            None => 0.0,
        };
        total += (frames + sub_frames) / FRAME_RATE;
    }

    Some(total)
}
