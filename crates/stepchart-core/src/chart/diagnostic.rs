use serde::{Deserialize, Serialize};

/// A recoverable anomaly found while parsing. The chart is still produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Diagnostic {
    /// A freeze head on a lane that already had an open freeze. The newer
    /// head replaces the older one.
    OverlappingFreeze { slug: String, lane: usize, offset: f64 },
    /// A freeze tail on a lane with no open freeze.
    UnopenedFreezeClose { slug: String, lane: usize, offset: f64 },
    /// A freeze still open when the chart ended. `resolved_at` is set when
    /// the format gives pending freezes a fixed release after their head.
    UnclosedFreeze {
        slug: String,
        lane: usize,
        start: f64,
        resolved_at: Option<f64>,
    },
    /// A freeze whose end is not after its start.
    EmptyFreeze {
        slug: String,
        lane: usize,
        start: f64,
        end: f64,
    },
    /// A BPM or stop entry that was dropped.
    IgnoredTiming { tag: String, entry: String },
    /// A chart skipped because its difficulty is outside the vocabulary.
    UnknownDifficulty { mode: String, difficulty: String },
    /// A second chart with a slug already seen. The first one is kept.
    DuplicateChart { slug: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OverlappingFreeze { slug, lane, offset } => write!(
                f,
                "{}: found a new starting freeze on lane {} at {} before a previous one finished",
                slug, lane, offset
            ),
            Self::UnopenedFreezeClose { slug, lane, offset } => write!(
                f,
                "{}: needed to close a freeze on lane {} at {} that never opened",
                slug, lane, offset
            ),
            Self::UnclosedFreeze {
                slug,
                lane,
                start,
                resolved_at,
            } => match resolved_at {
                Some(end) => write!(
                    f,
                    "{}: freeze on lane {} from {} never closed, ended at {}",
                    slug, lane, start, end
                ),
                None => write!(
                    f,
                    "{}: freeze on lane {} from {} never closed, dropped",
                    slug, lane, start
                ),
            },
            Self::EmptyFreeze {
                slug,
                lane,
                start,
                end,
            } => write!(
                f,
                "{}: freeze on lane {} has no length ({} -> {}), dropped",
                slug, lane, start, end
            ),
            Self::IgnoredTiming { tag, entry } => {
                write!(f, "ignoring #{} entry '{}'", tag, entry)
            }
            Self::UnknownDifficulty { mode, difficulty } => {
                write!(f, "skipping {} chart with unknown difficulty '{}'", mode, difficulty)
            }
            Self::DuplicateChart { slug } => {
                write!(f, "skipping duplicate chart {}", slug)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_kind_tag() {
        let diagnostic = Diagnostic::UnclosedFreeze {
            slug: "single-basic".to_string(),
            lane: 1,
            start: 0.0,
            resolved_at: Some(0.25),
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "unclosedFreeze");
        assert_eq!(json["resolvedAt"], 0.25);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::DuplicateChart {
            slug: "single-expert".to_string(),
        };
        assert_eq!(diagnostic.to_string(), "skipping duplicate chart single-expert");
    }
}
