use jdb::{ComputedKeys, Document};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Document)]
pub struct Person {
    #[jdb(id)]
    pub id: String,
    #[jdb(string_key, omit_empty)]
    pub email: String,
    pub name: String,
    pub age: u32,
    #[jdb(create_time)]
    pub create_time: Option<OffsetDateTime>,
    #[jdb(update_time)]
    pub update_time: Option<OffsetDateTime>,
}

impl Person {
    pub fn new(id: &str, email: &str, name: &str, age: u32) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            age,
            ..Default::default()
        }
    }

    /// Payload stored for this person.
    pub fn data(&self) -> String {
        format!(
            r#"{{"age":{},"email":"{}","name":"{}"}}"#,
            self.age, self.email, self.name
        )
    }
}

/// Child document keyed on its position among the siblings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
#[jdb(computed_keys)]
pub struct Address {
    #[jdb(kind)]
    pub kind: String,
    #[jdb(id)]
    pub id: String,
    #[jdb(parent_kind)]
    pub parent_kind: String,
    #[jdb(parent_id)]
    pub parent_id: String,
    pub street_name: String,
    pub position: u32,
}

impl ComputedKeys for Address {
    fn numeric_key(&self) -> Option<Option<f64>> {
        Some(Some(self.position as f64))
    }
    fn unique_string_key(&self) -> Option<Option<String>> {
        Some(Some(format!("{}/{}", self.parent_id, self.position)))
    }
}
