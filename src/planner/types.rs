use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder color for a record whose environment color is not resolved yet
pub const SENTINEL_COLOR: Rgb = Rgb(0x6b, 0x72, 0x80);

/// A hex color like `#3B82F6`, written as a string in JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}


/// Target testing context for a qualification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Environment {
    #[serde(rename = "Light simulation")]
    LightSimulation,
    #[serde(rename = "Heavy simulation")]
    HeavySimulation,
    #[serde(rename = "Pre-exhibition")]
    PreExhibition,
}

impl Environment {
    /// Display order for timeline sections, the legend and dropdowns
    pub const ALL: [Environment; 3] = [
        Environment::LightSimulation,
        Environment::HeavySimulation,
        Environment::PreExhibition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Environment::LightSimulation => "Light simulation",
            Environment::HeavySimulation => "Heavy simulation",
            Environment::PreExhibition => "Pre-exhibition",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Environment::LightSimulation => Rgb(0x3b, 0x82, 0xf6),
            Environment::HeavySimulation => Rgb(0x10, 0xb9, 0x81),
            Environment::PreExhibition => Rgb(0xf5, 0x9e, 0x0b),
        }
    }

    /// Case-insensitive lookup by display name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|env| env.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stored names are matched against the fixed set; anything else is rejected
impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Environment::from_name(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown environment: {}", raw)))
    }
}

fn unresolved_color() -> Rgb {
    SENTINEL_COLOR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationRecord {
    pub id: RecordId,
    pub name: String,
    pub team: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub environment: Environment,
    /// Written for readability, never read back: loading re-derives it
    #[serde(skip_deserializing, default = "unresolved_color")]
    pub color: Rgb,
    #[serde(default)]
    pub deployed: bool,
}

impl QualificationRecord {
    pub fn from_input(id: RecordId, input: QualificationInput) -> Self {
        Self {
            id,
            color: input.environment.color(),
            name: input.name,
            team: input.team,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            environment: input.environment,
            deployed: input.deployed,
        }
    }

    /// Re-derive the color from the environment
    pub fn resolve_color(&mut self) {
        self.color = self.environment.color();
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Validated add/edit payload handed to the planner
#[derive(Debug, Clone, PartialEq)]
pub struct QualificationInput {
    pub name: String,
    pub team: String,
    pub description: Option<String>,
    pub environment: Environment,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub deployed: bool,
}

impl QualificationInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.team.trim().is_empty() {
            return Err(ValidationError::MissingTeam);
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,
    #[error("team is required")]
    MissingTeam,
    #[error("{field} date is not a valid YYYY-MM-DD date: {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// Built-in record set used when nothing usable is stored
pub fn default_records() -> Vec<QualificationRecord> {
    let seed = [
        (1, "v2.1.0", "Team A", "Security component update", (2024, 9, 15), (2024, 9, 25), Environment::LightSimulation, false),
        (2, "v2.2.0", "Team B", "System performance tuning", (2024, 9, 20), (2024, 10, 5), Environment::HeavySimulation, false),
        (3, "v3.0.0", "Team C", "Migration to the new architecture", (2024, 10, 1), (2024, 10, 15), Environment::PreExhibition, true),
        (4, "v3.1.0", "Team A", "Critical bug fixes", (2024, 10, 10), (2024, 10, 20), Environment::PreExhibition, false),
        (5, "v3.2.0", "Team B", "New user features", (2024, 10, 18), (2024, 10, 28), Environment::LightSimulation, false),
    ];

    seed.into_iter()
        .filter_map(|(id, name, team, description, start, end, environment, deployed)| {
            let start_date = NaiveDate::from_ymd_opt(start.0, start.1, start.2)?;
            let end_date = NaiveDate::from_ymd_opt(end.0, end.1, end.2)?;
            Some(QualificationRecord::from_input(
                RecordId(id),
                QualificationInput {
                    name: name.to_string(),
                    team: team.to_string(),
                    description: Some(description.to_string()),
                    environment,
                    start_date,
                    end_date,
                    deployed,
                },
            ))
        })
        .collect()
}
