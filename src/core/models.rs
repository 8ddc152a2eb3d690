/*
 * Plain data types shared by the gesture tracker, the card stack and the
 * presentation contract: profile identity and payload, swipe direction, the
 * lean preview signal and the per-frame card transform.
 */
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/*
 * Stable identity of a profile entry. Unique within a stack and unchanged for the
 * lifetime of the entry, whichever collection it currently lives in.
 */
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        ProfileId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/*
 * Display payload of a profile. The core never inspects it; it only travels
 * together with its `ProfileId` between the active and history collections.
 */
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfilePayload {
    pub name: String,
    pub age: u32,
    pub distance: String,
    pub bio: String,
    pub interests: Vec<String>,
    pub preferences: Vec<String>,
    pub tags: Vec<String>,
    pub image: String,
    pub about_me: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub id: ProfileId,
    #[serde(flatten)]
    pub payload: ProfilePayload,
}

impl ProfileEntry {
    pub fn new(id: impl Into<String>, payload: ProfilePayload) -> Self {
        ProfileEntry {
            id: ProfileId::new(id),
            payload,
        }
    }

    #[cfg(test)]
    pub fn new_test(id: &str) -> Self {
        ProfileEntry::new(
            id,
            ProfilePayload {
                name: format!("Profile {id}"),
                ..ProfilePayload::default()
            },
        )
    }
}

// Direction of a committed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    // Sign of the off-screen target offset for this direction.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

/*
 * Preview of the commit direction while a drag is in progress. The presentation
 * layer uses it to highlight a label before the finger is lifted.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lean {
    #[default]
    None,
    Left,
    Right,
}

// Transform the presentation layer applies to a card visual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardTransform {
    pub translate_x: f64,
    pub rotate_deg: f64,
    pub opacity: f64,
}

impl CardTransform {
    pub const IDENTITY: CardTransform = CardTransform {
        translate_x: 0.0,
        rotate_deg: 0.0,
        opacity: 1.0,
    };
}

impl Default for CardTransform {
    fn default() -> Self {
        CardTransform::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_entry_flattens_payload_in_json() {
        let json = r#"{
            "id": "7",
            "name": "Sarah Johnson",
            "age": 28,
            "tags": ["Kind", "Funny"],
            "aboutMe": { "height": "175 cm" }
        }"#;
        let entry: ProfileEntry = serde_json::from_str(json).expect("valid entry json");
        assert_eq!(entry.id, ProfileId::new("7"));
        assert_eq!(entry.payload.name, "Sarah Johnson");
        assert_eq!(entry.payload.age, 28);
        assert_eq!(entry.payload.tags, vec!["Kind", "Funny"]);
        assert_eq!(
            entry.payload.about_me.get("height").map(String::as_str),
            Some("175 cm")
        );
        assert!(entry.payload.bio.is_empty());
    }

    #[test]
    fn test_direction_sign_and_display() {
        assert_eq!(Direction::Left.sign(), -1.0);
        assert_eq!(Direction::Right.sign(), 1.0);
        assert_eq!(Direction::Left.to_string(), "left");
    }

    #[test]
    fn test_identity_transform_is_default() {
        assert_eq!(CardTransform::default(), CardTransform::IDENTITY);
        assert_eq!(CardTransform::IDENTITY.opacity, 1.0);
    }
}
