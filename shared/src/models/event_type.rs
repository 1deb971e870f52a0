use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of event an invitation is for. Controls the default background.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Birthday,
    Wedding,
    Anniversary,
    BabyShower,
    Graduation,
    Corporate,
    Meetup,
    #[default]
    Other,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::Birthday,
        EventType::Wedding,
        EventType::Anniversary,
        EventType::BabyShower,
        EventType::Graduation,
        EventType::Corporate,
        EventType::Meetup,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Birthday => "birthday",
            EventType::Wedding => "wedding",
            EventType::Anniversary => "anniversary",
            EventType::BabyShower => "baby_shower",
            EventType::Graduation => "graduation",
            EventType::Corporate => "corporate",
            EventType::Meetup => "meetup",
            EventType::Other => "other",
        }
    }

    /// Exact match against the wire names; `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Like [`EventType::parse`] but falls back to `Other`.
    pub fn from_loose(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    /// Human label shown on the preview badge ("baby shower").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
