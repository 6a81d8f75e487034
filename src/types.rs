//! Core types for linguanodon-sync

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Unique identifier of a learning goal or unit of meaning
///
/// Unit identifiers carry their language as a prefix (`"<lang>_..."`),
/// e.g. `fr_chat` belongs to language `fr`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(pub String);

impl Uid {
    /// Create a new Uid
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Language segment encoded in the identifier
    ///
    /// This is the substring before the first `_`. An identifier without a
    /// separator is its own language segment.
    pub fn language(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }
}

impl From<&str> for Uid {
    fn from(uid: &str) -> Self {
        Self(uid.to_string())
    }
}

impl From<String> for Uid {
    fn from(uid: String) -> Self {
        Self(uid)
    }
}

impl From<Uid> for String {
    fn from(uid: Uid) -> Self {
        uid.0
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Uid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Uid {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Uid {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Implement sqlx Type, Encode, and Decode for database operations
impl sqlx::Type<sqlx::Sqlite> for Uid {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Uid {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::Encode::<sqlx::Sqlite>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Uid {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let uid = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self(uid))
    }
}

/// Minimal description of a learning goal, as listed by the content service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningGoalSummary {
    /// Identifier of the goal
    pub uid: Uid,
    /// Display name
    pub name: String,
}

impl LearningGoalSummary {
    /// Create a new summary
    pub fn new(uid: impl Into<Uid>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
        }
    }
}

/// A named topic composed of an ordered set of units of meaning
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningGoal {
    /// Globally unique identifier
    pub uid: Uid,
    /// Display name
    pub name: String,
    /// Parent goal identifiers
    #[serde(default)]
    pub parents: Vec<Uid>,
    /// Goals that must be completed before this one
    #[serde(default)]
    pub blocked_by: Vec<Uid>,
    /// Language tag of the goal
    pub language: String,
    /// Ordered unit-of-meaning identifiers (may reference units not present locally)
    #[serde(default)]
    pub units_of_meaning: Vec<Uid>,
    /// Whether the goal was authored by the user rather than downloaded
    #[serde(default)]
    pub user_created: bool,
}

impl LearningGoal {
    /// Summary of this goal
    pub fn summary(&self) -> LearningGoalSummary {
        LearningGoalSummary {
            uid: self.uid.clone(),
            name: self.name.clone(),
        }
    }
}

/// An atomic vocabulary item (word, phrase) in a given language
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOfMeaning {
    /// Globally unique identifier, prefixed with the unit's language
    pub uid: Uid,
    /// Textual content
    pub content: String,
    /// Word type tag (noun, verb, ...)
    pub word_type: String,
    /// Pronunciation hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Identifiers of units this one translates to
    #[serde(default)]
    pub translations: Vec<Uid>,
    /// Identifiers of related units
    #[serde(default)]
    pub related: Vec<Uid>,
    /// Whether the unit was authored by the user rather than downloaded
    #[serde(default)]
    pub user_created: bool,
    /// Attribution and license information, if needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<UnitOfMeaningCredit>,
}

impl UnitOfMeaning {
    /// Language of this unit, derived from its identifier
    pub fn language(&self) -> &str {
        self.uid.language()
    }
}

/// Attribution and license metadata for a unit of meaning
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOfMeaningCredit {
    /// Context in which the unit was created
    pub creation_context: String,
    /// License name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Owner of the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Link to the owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_link: Option<String>,
    /// Source of the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Link to the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
}

/// Tables of the local store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// Learning goals, keyed by uid
    LearningGoals,
    /// Units of meaning, keyed by uid
    UnitsOfMeaning,
}

impl Table {
    /// SQL table name
    pub fn name(&self) -> &'static str {
        match self {
            Table::LearningGoals => "learning_goals",
            Table::UnitsOfMeaning => "units_of_meaning",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_language_is_prefix_before_first_separator() {
        assert_eq!(Uid::from("fr_chat").language(), "fr");
        assert_eq!(Uid::from("en_ice_cream").language(), "en");
        assert_eq!(Uid::from("plain").language(), "plain");
        assert_eq!(Uid::from("_odd").language(), "");
    }

    #[test]
    fn test_learning_goal_deserializes_camel_case_with_defaults() {
        let json = r#"{
            "uid": "en_goal1",
            "name": "Animals",
            "blockedBy": ["en_goal0"],
            "language": "en",
            "unitsOfMeaning": ["en_cat", "fr_chat"]
        }"#;

        let goal: LearningGoal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.uid, "en_goal1");
        assert!(goal.parents.is_empty());
        assert_eq!(goal.blocked_by, vec![Uid::from("en_goal0")]);
        assert_eq!(goal.units_of_meaning.len(), 2);
        assert!(!goal.user_created);
    }

    #[test]
    fn test_unit_deserializes_credit_and_optional_fields() {
        let json = r#"{
            "uid": "fr_chat",
            "content": "chat",
            "wordType": "noun",
            "translations": ["en_cat"],
            "credit": {"creationContext": "imported", "license": "CC-BY-SA"}
        }"#;

        let unit: UnitOfMeaning = serde_json::from_str(json).unwrap();
        assert_eq!(unit.language(), "fr");
        assert_eq!(unit.pronunciation, None);
        assert!(unit.related.is_empty());
        let credit = unit.credit.unwrap();
        assert_eq!(credit.creation_context, "imported");
        assert_eq!(credit.license.as_deref(), Some("CC-BY-SA"));
        assert_eq!(credit.owner, None);
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Table::LearningGoals.name(), "learning_goals");
        assert_eq!(Table::UnitsOfMeaning.to_string(), "units_of_meaning");
    }
}
