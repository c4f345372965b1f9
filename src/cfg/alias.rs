use chrono::{Local, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Format of the `created` field in alias files
pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

lazy_static! {
    static ref ALIAS_NAME: Regex = Regex::new(r"^[A-Za-z0-9_.:-]+$").unwrap();
}

/// Names that can be emitted into an `alias` statement without quoting
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    ALIAS_NAME.is_match(name)
}

/// Precedence scope of an alias
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Level {
    #[default]
    User,
    Global,
}

impl Level {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::User => "user",
            Level::Global => "global",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Level {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// Only the exact string "global" selects the global level. Anything else,
// including non-string values, falls back to the user level.
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LevelVisitor;

        impl<'de> Visitor<'de> for LevelVisitor {
            type Value = Level;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an alias level")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(if value == "global" { Level::Global } else { Level::User })
            }

            fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Level::User)
            }

            fn visit_i64<E>(self, _: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Level::User)
            }

            fn visit_u64<E>(self, _: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Level::User)
            }

            fn visit_f64<E>(self, _: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Level::User)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Level::User)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Level::User)
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(Level::User)
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

/// A name-to-command mapping at one level
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub command: String,

    #[serde(default)]
    pub created: String,

    #[serde(default)]
    pub level: Level,
}

impl Alias {
    /// Create a record stamped with the current local time
    #[must_use]
    pub fn new(name: &str, command: &str, level: Level) -> Self {
        Self::created_at(name, command, level, Local::now().naive_local())
    }

    #[must_use]
    pub fn created_at(name: &str, command: &str, level: Level, when: NaiveDateTime) -> Self {
        Self {
            name: name.to_owned(),
            command: command.to_owned(),
            created: when.format(CREATED_FORMAT).to_string(),
            level,
        }
    }

    /// Case-sensitive substring match on name or command; an empty keyword matches everything
    #[must_use]
    pub fn matches(&self, keyword: &str) -> bool {
        keyword.is_empty() || self.name.contains(keyword) || self.command.contains(keyword)
    }
}
