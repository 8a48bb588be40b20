use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One field-goal attempt. Coordinates are in tenths of a foot with the basket
/// at the origin, `x` across the court and `y` toward half court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    #[serde(
        rename = "SHOT_MADE_FLAG",
        alias = "made",
        alias = "shot_made",
        deserialize_with = "made_flag"
    )]
    pub made: bool,
    #[serde(rename = "LOC_X", alias = "x")]
    pub x: f64,
    #[serde(rename = "LOC_Y", alias = "y")]
    pub y: f64,
    #[serde(rename = "SHOT_DISTANCE", default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(rename = "SHOT_ZONE_BASIC", default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(rename = "ACTION_TYPE", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Shot {
    pub fn new(made: bool, x: f64, y: f64) -> Self {
        Self {
            made,
            x,
            y,
            distance: None,
            zone: None,
            action: None,
        }
    }

    /// Distance from the basket in feet, preferring the recorded value.
    pub fn distance_ft(&self) -> f64 {
        self.distance
            .unwrap_or_else(|| (self.x * self.x + self.y * self.y).sqrt() / 10.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(alias = "player_name")]
    pub name: String,
    #[serde(default, alias = "player_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub shots: Vec<Shot>,
}

impl Player {
    pub fn attempts(&self) -> usize {
        self.shots.len()
    }

    pub fn makes(&self) -> usize {
        self.shots.iter().filter(|s| s.made).count()
    }

    pub fn fg_pct(&self) -> Option<f64> {
        fg_pct(self.makes(), self.attempts())
    }
}

pub fn fg_pct(makes: usize, attempts: usize) -> Option<f64> {
    if attempts == 0 {
        return None;
    }
    Some(100.0 * makes as f64 / attempts as f64)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MadeFlag {
    Bool(bool),
    Int(i64),
}

fn made_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match MadeFlag::deserialize(deserializer)? {
        MadeFlag::Bool(v) => Ok(v),
        MadeFlag::Int(0) => Ok(false),
        MadeFlag::Int(1) => Ok(true),
        MadeFlag::Int(other) => Err(D::Error::custom(format!(
            "made flag must be 0 or 1, got {other}"
        ))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(u64),
}

// League exports carry numeric ids; bundled files use strings.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdValue::deserialize(deserializer)? {
        IdValue::Text(s) => s,
        IdValue::Number(n) => n.to_string(),
    })
}
