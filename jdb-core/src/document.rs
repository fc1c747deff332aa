use crate::{AsValue, Column, Result, Value};
use serde::{Serialize, de::DeserializeOwned};
use time::OffsetDateTime;

/// What a document field means to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Kind,
    Id,
    ParentKind,
    ParentId,
    CreateTime,
    UpdateTime,
    UniqueStringKey,
    StringKey,
    NumericKey,
    TimeKey,
}

impl Role {
    pub fn column(&self) -> Column {
        match self {
            Role::Kind => Column::Kind,
            Role::Id => Column::Id,
            Role::ParentKind => Column::ParentKind,
            Role::ParentId => Column::ParentId,
            Role::CreateTime => Column::CreateTime,
            Role::UpdateTime => Column::UpdateTime,
            Role::UniqueStringKey => Column::UniqueStringKey,
            Role::StringKey => Column::StringKey,
            Role::NumericKey => Column::NumericKey,
            Role::TimeKey => Column::TimeKey,
        }
    }

    /// One of the four indexed key slots.
    pub fn is_key(&self) -> bool {
        matches!(
            self,
            Role::UniqueStringKey | Role::StringKey | Role::NumericKey | Role::TimeKey
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Kind => "kind",
            Role::Id => "id",
            Role::ParentKind => "parent kind",
            Role::ParentId => "parent id",
            Role::CreateTime => "create time",
            Role::UpdateTime => "update time",
            Role::UniqueStringKey => "unique string key",
            Role::StringKey => "string key",
            Role::NumericKey => "numeric key",
            Role::TimeKey => "time key",
        }
    }
}

/// Declared role of one field of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRole {
    /// Key of the field in the serialized payload.
    pub name: &'static str,
    pub role: Role,
    /// Zero values do not claim the key.
    pub omit_empty: bool,
    /// The field is also part of the payload. Only key roles can be.
    pub in_data: bool,
}

/// A record stored in the document table.
///
/// Usually derived with `#[derive(Document)]`. The role table is declared once and the
/// marshaller in [`crate::Row`] does the rest: role fields are read through [`AsValue`], every
/// other field travels in the JSON payload.
///
/// Metadata roles (kind, id, parent kind, parent id) hold text, see [`TextRole`].
/// When decoding, a top level payload key missing from the stored JSON keeps its value from
/// `Default`. Nested payload types are decoded by serde alone and need `#[serde(default)]` to
/// accept missing keys.
///
pub trait Document: Serialize + DeserializeOwned + Default {
    fn roles() -> &'static [FieldRole];

    /// Current values of the role fields, aligned with [`Document::roles`].
    fn role_values(&self) -> Vec<Value>;

    /// Assigns the field at `index` of [`Document::roles`].
    fn set_role(&mut self, index: usize, value: Value) -> Result<()>;

    /// Keys derived from the whole document, see [`ComputedKeys`].
    fn computed_keys(&self) -> KeySet {
        KeySet::default()
    }
}

/// Field types the kind, id and parent roles can be declared with.
///
/// `#[derive(Document)]` requires it on those fields, rejecting any other type at compile time.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot hold a document kind, id or parent",
    note = "kind, id, parent_kind and parent_id fields are `String` or `Option<String>`"
)]
pub trait TextRole: AsValue {}

impl TextRole for String {}
impl TextRole for Option<String> {}

/// Keys computed by a document instead of being read from a field.
///
/// The outer `Option` tells whether the key is claimed, the inner one is the value to store
/// (`None` stores NULL).
pub trait ComputedKeys {
    fn unique_string_key(&self) -> Option<Option<String>> {
        None
    }
    fn string_key(&self) -> Option<Option<String>> {
        None
    }
    fn numeric_key(&self) -> Option<Option<f64>> {
        None
    }
    fn time_key(&self) -> Option<Option<OffsetDateTime>> {
        None
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct KeySet {
    pub unique_string_key: Option<Option<String>>,
    pub string_key: Option<Option<String>>,
    pub numeric_key: Option<Option<f64>>,
    pub time_key: Option<Option<OffsetDateTime>>,
}

impl KeySet {
    pub fn from_computed<T: ComputedKeys + ?Sized>(value: &T) -> Self {
        Self {
            unique_string_key: value.unique_string_key(),
            string_key: value.string_key(),
            numeric_key: value.numeric_key(),
            time_key: value.time_key(),
        }
    }
}
