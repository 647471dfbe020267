//! Diagram styles a sentence can be drawn in.

use std::{fmt, str::FromStr};

use crate::KelloggError;

/// Which kind of diagram to produce.
///
/// # Examples
///
/// ```
/// use kellogg::DiagramStyle;
///
/// let style: DiagramStyle = "reed-kellogg".parse().unwrap();
/// assert_eq!(style, DiagramStyle::ReedKellogg);
/// assert!("arc-diagram".parse::<DiagramStyle>().is_err());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DiagramStyle {
    /// Baselines, dividers and diagonals, rendered as SVG.
    #[default]
    ReedKellogg,
    /// The parser's head/dependent graph, described in DOT.
    Dependency,
}

impl DiagramStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReedKellogg => "reed-kellogg",
            Self::Dependency => "dependency",
        }
    }
}

impl FromStr for DiagramStyle {
    type Err = KelloggError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reed-kellogg" => Ok(Self::ReedKellogg),
            "dependency" => Ok(Self::Dependency),
            _ => Err(KelloggError::UnsupportedStyle(s.to_string())),
        }
    }
}

impl fmt::Display for DiagramStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_display() {
        for style in [DiagramStyle::ReedKellogg, DiagramStyle::Dependency] {
            assert_eq!(style.to_string().parse::<DiagramStyle>().unwrap(), style);
        }
    }

    #[test]
    fn test_rejects_unknown_style() {
        let err = "arc-diagram".parse::<DiagramStyle>().unwrap_err();
        assert!(matches!(err, KelloggError::UnsupportedStyle(style) if style == "arc-diagram"));
    }
}
