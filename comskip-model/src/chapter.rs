use crate::ticks::Ticks;

/// A named chapter marker as reported by the media library.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chapter {
    pub name: String,
    pub start: Ticks,
}

impl Chapter {
    pub fn new(name: impl Into<String>, start: Ticks) -> Self {
        Self {
            name: name.into(),
            start,
        }
    }
}
