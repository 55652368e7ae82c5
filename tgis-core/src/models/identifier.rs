//! Dataset identifiers of the form `name@mapset`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{TgisError, TgisResult};

/// Globally unique dataset identifier.
///
/// Immutable once created; the textual form `name@mapset` is the primary key
/// of every dataset table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetId {
    name: String,
    mapset: String,
}

impl DatasetId {
    pub fn new(name: impl Into<String>, mapset: impl Into<String>) -> TgisResult<Self> {
        let name = name.into();
        let mapset = mapset.into();
        let ident = format!("{name}@{mapset}");
        check_part(&name, "name", &ident)?;
        check_part(&mapset, "mapset", &ident)?;
        Ok(Self { name, mapset })
    }

    /// Parse `name@mapset`.
    pub fn parse(ident: &str) -> TgisResult<Self> {
        let mut parts = ident.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(mapset), None) => Self::new(name, mapset),
            _ => Err(TgisError::InvalidIdentifier {
                ident: ident.to_string(),
                reason: "expected exactly one '@' separating name and mapset".to_string(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mapset(&self) -> &str {
        &self.mapset
    }
}

fn check_part(part: &str, what: &str, ident: &str) -> TgisResult<()> {
    let reason = if part.is_empty() {
        Some(format!("empty {what}"))
    } else if part.starts_with('.') {
        Some(format!("{what} must not start with '.'"))
    } else {
        part.chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
            .map(|c| format!("illegal character {c:?} in {what}"))
    };

    match reason {
        Some(reason) => Err(TgisError::InvalidIdentifier {
            ident: ident.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.mapset)
    }
}

impl FromStr for DatasetId {
    type Err = TgisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DatasetId {
    type Error = TgisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DatasetId> for String {
    fn from(id: DatasetId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_mapset() {
        let id = DatasetId::parse("soil@PERMANENT").unwrap();
        assert_eq!(id.name(), "soil");
        assert_eq!(id.mapset(), "PERMANENT");
        assert_eq!(id.to_string(), "soil@PERMANENT");
    }

    #[test]
    fn rejects_missing_or_repeated_separator() {
        assert!(DatasetId::parse("soil").is_err());
        assert!(DatasetId::parse("soil@a@b").is_err());
        assert!(DatasetId::parse("@PERMANENT").is_err());
        assert!(DatasetId::parse("soil@").is_err());
    }

    #[test]
    fn rejects_illegal_characters() {
        assert!(DatasetId::parse("so il@PERMANENT").is_err());
        assert!(DatasetId::parse("soil\"x@PERMANENT").is_err());
        assert!(DatasetId::parse(".hidden@PERMANENT").is_err());
        assert!(DatasetId::parse("elev.2001-01@user_1").is_ok());
    }

    #[test]
    fn serializes_as_string() {
        let id = DatasetId::new("temp", "climate").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"temp@climate\"");
        let back: DatasetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<DatasetId>("\"nope\"").is_err());
    }
}
