//! Ship and crew member records, their inputs, and field validation.
//!
//! Records carry the wire names the browser UI uses (`shipID`,
//! `crewMemberID`). Inputs never carry keys: a ship's key comes from the store
//! and a crew member's owning ship comes from the request path.

use crate::{error::Result, CrewMemberId, Error, ShipId};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum ship name length, in characters.
pub const SHIP_NAME_MIN_LEN: usize = 3;

/// Minimum ship displacement.
pub const MIN_DISPLACEMENT: i64 = 50;

/// Minimum crew member name length, in characters.
pub const CREW_NAME_MIN_LEN: usize = 5;

/// A ship record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    #[serde(rename = "shipID")]
    pub ship_id: ShipId,
    pub name: String,
    pub displacement: i64,
}

impl Ship {
    /// Check the record's fields against the ship constraints.
    pub fn validate(&self) -> Result<()> {
        validate_ship_name(&self.name)?;
        validate_displacement(self.displacement)
    }

    /// Copy of this ship with every field present in `patch` replaced.
    ///
    /// The key is never touched.
    pub fn patched(&self, patch: &ShipPatch) -> Ship {
        Ship {
            ship_id: self.ship_id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            displacement: patch.displacement.unwrap_or(self.displacement),
        }
    }
}

/// Fields for creating a ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShip {
    pub name: String,
    #[serde(deserialize_with = "lenient_int")]
    pub displacement: i64,
}

impl NewShip {
    pub fn new(name: impl Into<String>, displacement: i64) -> Self {
        Self {
            name: name.into(),
            displacement,
        }
    }

    /// Check the fields against the ship constraints.
    pub fn validate(&self) -> Result<()> {
        validate_ship_name(&self.name)?;
        validate_displacement(self.displacement)
    }
}

/// Partial replacement of a ship's fields. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub displacement: Option<i64>,
}

/// Role held by a crew member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Captain,
    Boatswain,
}

impl Role {
    /// Every accepted role.
    pub const ALL: [Role; 2] = [Role::Captain, Role::Boatswain];

    /// Wire and storage spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Captain => "CAPTAIN",
            Role::Boatswain => "BOATSWAIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    /// Exact, case-sensitive match on the wire spelling.
    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::InvalidRole(s.to_string()))
    }
}

/// A crew member record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    #[serde(rename = "crewMemberID")]
    pub crew_member_id: CrewMemberId,
    pub name: String,
    pub role: Role,
    #[serde(rename = "shipID")]
    pub ship_id: ShipId,
}

impl CrewMember {
    /// Check the record's fields against the crew member constraints.
    pub fn validate(&self) -> Result<()> {
        validate_crew_name(&self.name)
    }

    /// Copy of this crew member with every field present in `patch` replaced.
    ///
    /// Fails when the patch names an unknown role. Neither key changes.
    pub fn patched(&self, patch: &CrewMemberPatch) -> Result<CrewMember> {
        let role = match &patch.role {
            Some(role) => role.parse()?,
            None => self.role,
        };

        Ok(CrewMember {
            crew_member_id: self.crew_member_id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            role,
            ship_id: self.ship_id,
        })
    }
}

/// Crew member fields as submitted.
///
/// The role stays text until [`NewCrewMember::validate`] so an unknown role is
/// reported as such rather than as a malformed body. Missing or non-text
/// fields decode as empty text and fail validation the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCrewMember {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub role: String,
}

impl NewCrewMember {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }

    /// Check the role, then the name.
    pub fn validate(&self) -> Result<CrewMemberFields> {
        let role = self.role.parse()?;
        validate_crew_name(&self.name)?;
        Ok(CrewMemberFields {
            name: self.name.clone(),
            role,
        })
    }
}

/// Validated crew member fields, ready to insert under a ship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewMemberFields {
    pub name: String,
    pub role: Role,
}

/// Partial replacement of a crew member's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMemberPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
}

pub fn validate_ship_name(name: &str) -> Result<()> {
    if name.chars().count() < SHIP_NAME_MIN_LEN {
        return Err(Error::invalid_field(
            "name",
            format!("must be at least {SHIP_NAME_MIN_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_displacement(displacement: i64) -> Result<()> {
    if displacement < MIN_DISPLACEMENT {
        return Err(Error::invalid_field(
            "displacement",
            format!("must be at least {MIN_DISPLACEMENT}"),
        ));
    }
    Ok(())
}

pub fn validate_crew_name(name: &str) -> Result<()> {
    if name.chars().count() < CREW_NAME_MIN_LEN {
        return Err(Error::invalid_field(
            "name",
            format!("must be at least {CREW_NAME_MIN_LEN} characters"),
        ));
    }
    Ok(())
}

// Form inputs arrive as text, so integers may be quoted.
#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Text(String),
}

impl IntOrText {
    fn into_int<E: serde::de::Error>(self) -> std::result::Result<i64, E> {
        match self {
            IntOrText::Int(value) => Ok(value),
            IntOrText::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected an integer, got '{text}'"))),
        }
    }
}

fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    IntOrText::deserialize(deserializer)?.into_int()
}

fn lenient_opt_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<IntOrText>::deserialize(deserializer)?
        .map(IntOrText::into_int)
        .transpose()
}

// A role of the wrong JSON type is still just an unknown role.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrOther {
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl TextOrOther {
    fn into_text(self) -> String {
        match self {
            TextOrOther::Text(text) => text,
            TextOrOther::Other(_) => String::new(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(TextOrOther::deserialize(deserializer)?.into_text())
}

fn lenient_opt_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrOther>::deserialize(deserializer)?.map(TextOrOther::into_text))
}
