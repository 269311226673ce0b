//! Gesture database loading. The real SDK reads an opaque `.gbd` file; the
//! simulated backend uses a line-oriented text format instead:
//!
//! ```text
//! # comment
//! discrete Punch
//! continuous Squat
//! ```
//!
//! Names are kept exactly as written (minus the leading whitespace after the
//! kind), so trailing padding in the file survives into the definitions the
//! same way the SDK's fixed-capacity name buffers do.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::types::{GestureDefinition, GestureKind};

pub fn load_gesture_database(path: &Path) -> Result<Vec<GestureDefinition>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read gesture database {}", path.display()))?;
    parse_gesture_database(&text)
        .with_context(|| format!("invalid gesture database {}", path.display()))
}

pub fn parse_gesture_database(text: &str) -> Result<Vec<GestureDefinition>> {
    let mut gestures = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let line = line.trim_start();
        let Some((kind, name)) = line.split_once(char::is_whitespace) else {
            bail!("line {}: expected `<kind> <name>`", index + 1);
        };

        let kind = match kind {
            "discrete" => GestureKind::Discrete,
            "continuous" => GestureKind::Continuous,
            other => bail!("line {}: unknown gesture kind {other:?}", index + 1),
        };

        gestures.push(GestureDefinition::new(name.trim_start(), kind));
    }

    if gestures.is_empty() {
        bail!("no gesture definitions found");
    }

    Ok(gestures)
}

/// Sample gesture set used when no database file is given, mirroring the kind
/// of content a demo `.gbd` ships with.
pub fn builtin_gestures() -> Vec<GestureDefinition> {
    vec![
        GestureDefinition::new("Punch", GestureKind::Discrete),
        GestureDefinition::new("HandsUp", GestureKind::Discrete),
        GestureDefinition::new("Squat", GestureKind::Continuous),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kinds_in_order() {
        let gestures = parse_gesture_database("discrete Punch\ncontinuous Squat\n").unwrap();
        assert_eq!(gestures.len(), 2);
        assert_eq!(gestures[0], GestureDefinition::new("Punch", GestureKind::Discrete));
        assert_eq!(gestures[1], GestureDefinition::new("Squat", GestureKind::Continuous));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# demo set\n\n  \ndiscrete Wave\n";
        let gestures = parse_gesture_database(text).unwrap();
        assert_eq!(gestures.len(), 1);
        assert_eq!(gestures[0].trimmed_name(), "Wave");
    }

    #[test]
    fn keeps_trailing_padding_in_names() {
        let gestures = parse_gesture_database("discrete Punch   ").unwrap();
        assert_eq!(gestures[0].name, "Punch   ");
        assert_eq!(gestures[0].trimmed_name(), "Punch");
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(parse_gesture_database("pose Tree\n").is_err());
    }

    #[test]
    fn rejects_missing_name() {
        assert!(parse_gesture_database("discrete\n").is_err());
    }

    #[test]
    fn rejects_empty_database() {
        assert!(parse_gesture_database("# nothing here\n").is_err());
    }
}
