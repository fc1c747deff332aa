use crate::{AsValue, Column, Document, JdbError, Result, Role, RowLabeled, Value};
use anyhow::Context;
use time::OffsetDateTime;

pub const MAX_KIND: usize = 64;
pub const MAX_ID: usize = 64;
pub const MAX_UNIQUE_STRING_KEY: usize = 255;
pub const MAX_STRING_KEY: usize = 255;

/// The flat form of a document, one field per table column.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    pub kind: String,
    pub id: String,
    pub parent_kind: Option<String>,
    pub parent_id: Option<String>,
    pub unique_string_key: Option<String>,
    pub string_key: Option<String>,
    pub numeric_key: Option<f64>,
    pub time_key: Option<OffsetDateTime>,
    pub data: Option<String>,
    /// Only filled when reading.
    pub create_time: Option<OffsetDateTime>,
    /// Only filled when reading.
    pub update_time: Option<OffsetDateTime>,
}

fn invalid(message: String) -> anyhow::Error {
    JdbError::Invalid(message).into()
}

fn check_length(value: Option<&str>, max: usize, what: &str) -> Result<()> {
    if let Some(value) = value {
        let len = value.chars().count();
        if len > max {
            return Err(invalid(format!(
                "{what} max length {max} characters: {value} ({len})"
            )));
        }
    }
    Ok(())
}

impl Row {
    /// Reads metadata and keys of a document without validating them.
    ///
    /// Computed keys are claimed first, then the role fields in declaration order. NULL fields
    /// are skipped, zero values are skipped when the field is `omit_empty`.
    pub fn scan<D: Document>(document: &D) -> Result<Row> {
        let mut row = Row::default();
        let mut claimed = [false; 4];
        let computed = document.computed_keys();
        if let Some(v) = computed.unique_string_key {
            row.unique_string_key = v;
            claimed[0] = true;
        }
        if let Some(v) = computed.string_key {
            row.string_key = v;
            claimed[1] = true;
        }
        if let Some(v) = computed.numeric_key {
            row.numeric_key = v;
            claimed[2] = true;
        }
        if let Some(v) = computed.time_key {
            row.time_key = v;
            claimed[3] = true;
        }
        for (field, value) in D::roles().iter().zip(document.role_values()) {
            if value.is_null() {
                continue;
            }
            let role = field.role;
            let error = |value: &Value| invalid(format!("{} is invalid: {value:?}", role.description()));
            match role {
                Role::Kind | Role::Id | Role::ParentKind | Role::ParentId => {
                    let v = String::try_from_value(value.clone()).map_err(|_| error(&value))?;
                    if v.is_empty() {
                        continue;
                    }
                    match role {
                        Role::Kind => row.kind = v,
                        Role::Id => row.id = v,
                        Role::ParentKind => row.parent_kind = Some(v),
                        _ => row.parent_id = Some(v),
                    }
                }
                Role::CreateTime | Role::UpdateTime => {}
                Role::UniqueStringKey | Role::StringKey | Role::NumericKey | Role::TimeKey => {
                    if field.omit_empty && value.is_zero() {
                        continue;
                    }
                    let slot = match role {
                        Role::UniqueStringKey => 0,
                        Role::StringKey => 1,
                        Role::NumericKey => 2,
                        _ => 3,
                    };
                    if claimed[slot] {
                        return Err(invalid(format!("has duplicate {}s", role.description())));
                    }
                    claimed[slot] = true;
                    match role {
                        Role::UniqueStringKey => {
                            row.unique_string_key = Some(
                                String::try_from_value(value.clone()).map_err(|_| error(&value))?,
                            )
                        }
                        Role::StringKey => {
                            row.string_key = Some(
                                String::try_from_value(value.clone()).map_err(|_| error(&value))?,
                            )
                        }
                        Role::NumericKey => {
                            row.numeric_key =
                                Some(f64::try_from_value(value.clone()).map_err(|_| error(&value))?)
                        }
                        _ => {
                            row.time_key = Some(
                                OffsetDateTime::try_from_value(value.clone())
                                    .map_err(|_| error(&value))?,
                            )
                        }
                    }
                }
            }
        }
        Ok(row)
    }

    /// Validated row ready to be inserted under `kind`.
    pub fn encode<D: Document>(document: &D, kind: &str) -> Result<Row> {
        Self::encode_checked(document, kind, true)
    }

    /// Like [`Row::encode`] but a missing id or a different kind are accepted, the update
    /// statement already targets nothing in that case.
    pub fn encode_update<D: Document>(document: &D, kind: &str) -> Result<Row> {
        Self::encode_checked(document, kind, false)
    }

    fn encode_checked<D: Document>(document: &D, kind: &str, identity: bool) -> Result<Row> {
        let mut row = Self::scan(document)?;
        if identity && !row.kind.is_empty() && row.kind != kind {
            return Err(invalid(format!("kind mismatch: {kind} != {}", row.kind)));
        }
        row.kind = kind.to_owned();
        if row.kind.is_empty() {
            return Err(invalid("kind not defined".into()));
        }
        check_length(Some(&row.kind), MAX_KIND, "kind")?;
        if identity && row.id.is_empty() {
            return Err(invalid("id not defined".into()));
        }
        check_length(Some(&row.id), MAX_ID, "id")?;
        if row.parent_id.is_some() && row.parent_kind.is_none() {
            return Err(invalid("parent kind not defined".into()));
        }
        check_length(row.parent_kind.as_deref(), MAX_KIND, "parent kind")?;
        check_length(row.parent_id.as_deref(), MAX_ID, "parent id")?;
        check_length(
            row.unique_string_key.as_deref(),
            MAX_UNIQUE_STRING_KEY,
            "unique string key",
        )?;
        check_length(row.string_key.as_deref(), MAX_STRING_KEY, "string key")?;
        row.data = payload(document)?;
        Ok(row)
    }

    /// Kind (possibly empty) and id of a document, [`JdbError::IdNotFound`] without an id.
    pub fn identity<D: Document>(document: &D) -> Result<(String, String)> {
        let row = Self::scan(document)?;
        if row.id.is_empty() {
            return Err(JdbError::IdNotFound.into());
        }
        Ok((row.kind, row.id))
    }

    /// Arguments in the order of the insert column list.
    pub fn insert_args(&self) -> [Value; 9] {
        [
            self.kind.clone().as_value(),
            self.id.clone().as_value(),
            self.parent_kind.clone().as_value(),
            self.parent_id.clone().as_value(),
            self.unique_string_key.clone().as_value(),
            self.string_key.clone().as_value(),
            self.numeric_key.as_value(),
            self.time_key.as_value(),
            self.data.clone().as_value(),
        ]
    }

    /// Arguments in the order of the update assignments.
    pub fn update_args(&self) -> [Value; 7] {
        [
            self.parent_kind.clone().as_value(),
            self.parent_id.clone().as_value(),
            self.unique_string_key.clone().as_value(),
            self.string_key.clone().as_value(),
            self.numeric_key.as_value(),
            self.time_key.as_value(),
            self.data.clone().as_value(),
        ]
    }

    /// Builds a document from a result row.
    ///
    /// The payload, when selected and not empty, is laid over the default document. Payload
    /// keys naming a metadata field or a `skip_data` key are dropped, metadata only comes from
    /// its own columns. Only missing top level keys fall back to the default, see [`Document`].
    pub fn decode<D: Document>(row: &RowLabeled) -> Result<D> {
        let data = row
            .get_column(Column::Data.name())
            .and_then(Value::as_text)
            .filter(|v| !v.is_empty());
        let mut result = match data {
            Some(data) => {
                let payload: serde_json::Value =
                    serde_json::from_str(data).context("Cannot parse the document payload")?;
                let mut base = serde_json::to_value(D::default())
                    .context("Cannot serialize the default document")?;
                match (base.as_object_mut(), payload) {
                    (Some(base), serde_json::Value::Object(mut payload)) => {
                        for field in D::roles().iter().filter(|v| !v.in_data) {
                            payload.remove(field.name);
                        }
                        base.extend(payload)
                    }
                    _ => return Err(invalid("dest must be a struct".into())),
                }
                serde_json::from_value(base).context("Cannot decode the document payload")?
            }
            None => D::default(),
        };
        for (i, field) in D::roles().iter().enumerate() {
            if field.role.is_key() {
                continue;
            }
            let Some(value) = row.get_column(field.role.column().name()) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            result.set_role(i, value.clone()).with_context(|| {
                format!(
                    "Cannot assign {} from {value:?}",
                    field.role.description()
                )
            })?;
        }
        Ok(result)
    }

    /// Decodes a row with a single column into a scalar.
    pub fn decode_value<T: AsValue>(row: RowLabeled) -> Result<T> {
        let len = row.values.len();
        if len != 1 {
            return Err(invalid(format!(
                "dest must be a struct, a single value needs exactly one selected column (found {len})"
            )));
        }
        let value = row.values.into_vec().into_iter().next().unwrap_or_default();
        T::try_from_value(value)
    }
}

/// JSON of the fields that are not stored in their own column, `None` when nothing is left.
pub fn payload<D: Document>(document: &D) -> Result<Option<String>> {
    let mut value = serde_json::to_value(document).context("Cannot serialize the document")?;
    let Some(object) = value.as_object_mut() else {
        return Err(invalid("input must be a struct".into()));
    };
    for field in D::roles() {
        if !field.in_data {
            object.remove(field.name);
        }
    }
    if object.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        serde_json::to_string(&value).context("Cannot serialize the document payload")?,
    ))
}

/// Type erased document held by insert and update builders.
pub trait EncodeDocument: Send + Sync {
    fn encode(&self, kind: &str) -> Result<Row>;
    fn encode_update(&self, kind: &str) -> Result<Row>;
    fn identity(&self) -> Result<(String, String)>;
}

impl<D: Document + Send + Sync> EncodeDocument for D {
    fn encode(&self, kind: &str) -> Result<Row> {
        Row::encode(self, kind)
    }
    fn encode_update(&self, kind: &str) -> Result<Row> {
        Row::encode_update(self, kind)
    }
    fn identity(&self) -> Result<(String, String)> {
        Row::identity(self)
    }
}
