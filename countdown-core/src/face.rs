//! Render model handed to the view layer.

use serde::{Deserialize, Serialize};

use crate::ending::EndingPhase;
use crate::remaining::{Remaining, Unit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitGroup {
    pub unit: Unit,
    pub value: String,
    pub label: String,
}

impl DigitGroup {
    #[must_use]
    pub fn read(remaining: &Remaining, unit: Unit) -> Self {
        Self {
            unit,
            value: remaining.padded(unit),
            label: unit.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountingFace {
    pub greeting: String,
    pub digits: Vec<DigitGroup>,
    /// Last-day emphasis: larger pulsing red digits.
    pub urgent: bool,
    pub shaking: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingLine {
    pub text: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingFace {
    pub phase: EndingPhase,
    pub lines: [EndingLine; 2],
}

impl EndingFace {
    #[must_use]
    pub fn new(phase: EndingPhase, first: &str, second: &str) -> Self {
        Self {
            phase,
            lines: [
                EndingLine {
                    text: first.to_string(),
                    visible: phase.first_visible(),
                },
                EndingLine {
                    text: second.to_string(),
                    visible: phase.second_visible(),
                },
            ],
        }
    }

    #[must_use]
    pub fn visible_text(&self) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.visible)
            .map(|line| line.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum Face {
    Loading,
    Counting(CountingFace),
    Ending(EndingFace),
}

impl Face {
    #[must_use]
    pub const fn counting(&self) -> Option<&CountingFace> {
        match self {
            Self::Counting(face) => Some(face),
            _ => None,
        }
    }

    #[must_use]
    pub const fn ending(&self) -> Option<&EndingFace> {
        match self {
            Self::Ending(face) => Some(face),
            _ => None,
        }
    }

    /// Single-line summary, used by the terminal watcher and traces.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Loading => "Loading...".to_string(),
            Self::Counting(face) => {
                let digits: Vec<String> = face
                    .digits
                    .iter()
                    .map(|group| format!("{} {}", group.value, group.label))
                    .collect();
                let mut line = digits.join(" : ");
                if let Some(message) = &face.message {
                    line.push_str(" | ");
                    line.push_str(message);
                }
                line
            }
            Self::Ending(face) => face.visible_text().unwrap_or_default().to_string(),
        }
    }
}
