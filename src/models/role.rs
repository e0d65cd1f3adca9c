use chrono::{DateTime, Utc};
use diesel::QueryableByName;
use serde::Serialize;
use utoipa::ToSchema;

use super::fields::{FormFields, ROLE_NAME_MAX_CHARS};
use super::{Entity, FromFields};
use crate::domain::entity::EntityKind;
use crate::domain::errors::DomainError;
use crate::query::SqlValue;
use crate::schema::roles;

#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRole {
    pub name: String,
}

impl FromFields for NewRole {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(NewRole {
            name: fields.required_bounded("name", ROLE_NAME_MAX_CHARS)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleChanges {
    pub name: Option<String>,
}

impl FromFields for RoleChanges {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(RoleChanges {
            name: fields.bounded("name", ROLE_NAME_MAX_CHARS)?,
        })
    }
}

// The id is a serial, so inserts leave it to the database.
impl Entity for Role {
    const KIND: EntityKind = EntityKind::Role;

    type Key = i32;
    type New = NewRole;
    type Changes = RoleChanges;

    fn insert_values(new: NewRole) -> Vec<(&'static str, SqlValue)> {
        vec![("name", new.name.into())]
    }

    fn apply(&mut self, changes: RoleChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![("name", self.name.clone().into())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_does_not_supply_an_id() {
        let fields = FormFields::from_pairs([("name", "courier")]);
        let values = Role::insert_values(NewRole::from_fields(&fields).unwrap());
        assert_eq!(values, vec![("name", SqlValue::Text("courier".to_string()))]);
    }

    #[test]
    fn create_requires_name() {
        assert!(NewRole::from_fields(&FormFields::new()).is_err());
    }
}
