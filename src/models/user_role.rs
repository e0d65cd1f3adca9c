use diesel::QueryableByName;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::fields::FormFields;
use super::{parse_int_segment, parse_uuid_segment, Entity, FromFields, RecordKey};
use crate::domain::entity::EntityKind;
use crate::domain::errors::DomainError;
use crate::query::SqlValue;
use crate::schema::user_roles;

#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = user_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRole {
    pub user_id: Uuid,
    pub role_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRoleKey {
    pub user_id: Uuid,
    pub role_id: i32,
}

impl RecordKey for UserRoleKey {
    type Path = (String, String);

    fn from_path((user_id, role_id): (String, String)) -> Result<Self, DomainError> {
        Ok(UserRoleKey {
            user_id: parse_uuid_segment(&user_id, "user_id")?,
            role_id: parse_int_segment(&role_id, "role_id")?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.user_id.into(), self.role_id.into()]
    }
}

impl FromFields for UserRole {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["user_id", "role_id"])?;
        Ok(UserRole {
            user_id: fields.parse_required("user_id")?,
            role_id: fields.parse_required("role_id")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRoleChanges {
    pub role_id: Option<i32>,
}

impl FromFields for UserRoleChanges {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(UserRoleChanges {
            role_id: fields.parse("role_id")?,
        })
    }
}

impl Entity for UserRole {
    const KIND: EntityKind = EntityKind::UserRole;

    type Key = UserRoleKey;
    type New = UserRole;
    type Changes = UserRoleChanges;

    fn insert_values(new: UserRole) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("user_id", new.user_id.into()),
            ("role_id", new.role_id.into()),
        ]
    }

    fn apply(&mut self, changes: UserRoleChanges) {
        if let Some(role_id) = changes.role_id {
            self.role_id = role_id;
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![("role_id", self.role_id.into())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_mixes_uuid_and_integer() {
        let user = Uuid::new_v4();
        let key = UserRoleKey::from_path((user.to_string(), "3".to_string())).unwrap();
        assert_eq!(key.values(), vec![SqlValue::Uuid(user), SqlValue::Integer(3)]);
    }

    #[test]
    fn create_rejects_non_numeric_role() {
        let user = Uuid::new_v4().to_string();
        let fields = FormFields::from_pairs([("user_id", user.as_str()), ("role_id", "admin")]);
        assert_eq!(
            UserRole::from_fields(&fields).unwrap_err(),
            DomainError::InvalidInput("Invalid role_id format".to_string())
        );
    }
}
