use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of signs the recognizer can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignLabel {
    Hello,
    #[serde(rename = "Thank You")]
    ThankYou,
    Please,
    Help,
    Yes,
    No,
    #[serde(rename = "Good Morning")]
    GoodMorning,
    Water,
    Food,
    Sorry,
}

impl SignLabel {
    /// Every label, in a fixed order.
    pub const ALL: [SignLabel; 10] = [
        SignLabel::Hello,
        SignLabel::ThankYou,
        SignLabel::Please,
        SignLabel::Help,
        SignLabel::Yes,
        SignLabel::No,
        SignLabel::GoodMorning,
        SignLabel::Water,
        SignLabel::Food,
        SignLabel::Sorry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignLabel::Hello => "Hello",
            SignLabel::ThankYou => "Thank You",
            SignLabel::Please => "Please",
            SignLabel::Help => "Help",
            SignLabel::Yes => "Yes",
            SignLabel::No => "No",
            SignLabel::GoodMorning => "Good Morning",
            SignLabel::Water => "Water",
            SignLabel::Food => "Food",
            SignLabel::Sorry => "Sorry",
        }
    }
}

impl fmt::Display for SignLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_labels_are_distinct() {
        let unique: HashSet<_> = SignLabel::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_serializes_to_display_string() {
        // Multi-word labels keep their space on the wire.
        let json = serde_json::to_string(&SignLabel::GoodMorning).unwrap();
        assert_eq!(json, "\"Good Morning\"");

        for label in SignLabel::ALL {
            let json = serde_json::to_value(label).unwrap();
            assert_eq!(json.as_str(), Some(label.as_str()));
            assert_eq!(label.to_string(), label.as_str());
        }
    }
}
