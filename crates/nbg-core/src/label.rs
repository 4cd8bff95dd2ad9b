//! Two-class document labels.

use serde::{Deserialize, Serialize};

/// Class assignment of a document. `Zero` is the first configured category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    Zero,
    One,
}

impl Label {
    pub const BOTH: [Label; 2] = [Label::Zero, Label::One];

    /// 0 or 1, for indexing per-class arrays.
    pub fn index(self) -> usize {
        match self {
            Label::Zero => 0,
            Label::One => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Label::Zero),
            1 => Some(Label::One),
            _ => None,
        }
    }
}

impl From<bool> for Label {
    fn from(one: bool) -> Self {
        if one {
            Label::One
        } else {
            Label::Zero
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.index() as u8
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Label::from_index(value as usize).ok_or_else(|| format!("label must be 0 or 1, got {}", value))
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for label in Label::BOTH {
            assert_eq!(Label::from_index(label.index()), Some(label));
        }
        assert_eq!(Label::from_index(2), None);
    }

    #[test]
    fn serializes_as_bit() {
        let json = serde_json::to_string(&vec![Label::Zero, Label::One]).unwrap();
        assert_eq!(json, "[0,1]");
        let back: Vec<Label> = serde_json::from_str("[1,0]").unwrap();
        assert_eq!(back, vec![Label::One, Label::Zero]);
        assert!(serde_json::from_str::<Label>("2").is_err());
    }
}
