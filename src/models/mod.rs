pub mod cart;
pub mod cart_item;
pub mod fields;
pub mod item;
pub mod order;
pub mod order_item;
pub mod role;
pub mod table;
pub mod user;
pub mod user_role;
pub mod vendor;
pub mod vendor_admin;

use diesel::pg::Pg;
use diesel::QueryableByName;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entity::{Descriptor, EntityKind};
use crate::domain::errors::DomainError;
use crate::query::SqlValue;

use fields::FormFields;

/// A table-backed record served by the generic repository.
///
/// The record type itself is what list/get/create/update return. `New` and
/// `Changes` carry validated request data for inserts and partial updates.
pub trait Entity: QueryableByName<Pg> + Serialize + Send + Sized + 'static {
    const KIND: EntityKind;

    type Key: RecordKey;
    type New: Send + 'static;
    type Changes: Send + 'static;

    fn descriptor() -> &'static Descriptor {
        Self::KIND.descriptor()
    }

    fn insert_values(new: Self::New) -> Vec<(&'static str, SqlValue)>;

    /// Overwrites the fields present in `changes`.
    fn apply(&mut self, changes: Self::Changes);

    /// Every mutable column with its current value.
    fn assignments(&self) -> Vec<(&'static str, SqlValue)>;

    /// Writes to columns the projection does not expose.
    fn hidden_assignments(_changes: &Self::Changes) -> Vec<(&'static str, SqlValue)> {
        Vec::new()
    }
}

/// Primary key of an entity, parsed from URL path segments.
///
/// Segments are taken as strings and parsed here so that a malformed id is a
/// client error rather than an unmatched route.
pub trait RecordKey: Clone + Send + Sized + 'static {
    type Path: DeserializeOwned + 'static;

    fn from_path(path: Self::Path) -> Result<Self, DomainError>;

    /// Values in the order of the descriptor's key columns.
    fn values(&self) -> Vec<SqlValue>;
}

impl RecordKey for Uuid {
    type Path = String;

    fn from_path(path: String) -> Result<Self, DomainError> {
        parse_uuid_segment(&path, "id")
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![SqlValue::Uuid(*self)]
    }
}

impl RecordKey for i32 {
    type Path = String;

    fn from_path(path: String) -> Result<Self, DomainError> {
        parse_int_segment(&path, "id")
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![SqlValue::Integer(*self)]
    }
}

pub(crate) fn parse_uuid_segment(raw: &str, name: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::invalid(format!("Invalid {name} format")))
}

pub(crate) fn parse_int_segment(raw: &str, name: &str) -> Result<i32, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::invalid(format!("Invalid {name} format")))
}

/// Request form input that validates itself.
pub trait FromFields: Sized {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError>;

    /// Records the relative path of an uploaded image.
    fn attach_image(&mut self, _path: String) {}
}

/// Serializes `NUMERIC` columns as JSON numbers instead of strings.
pub(crate) mod decimal {
    use bigdecimal::{BigDecimal, ToPrimitive};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_f64().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_key_rejects_malformed_segment() {
        let err = Uuid::from_path("123".to_string()).unwrap_err();
        assert_eq!(err, DomainError::InvalidInput("Invalid id format".to_string()));
    }

    #[test]
    fn uuid_key_binds_single_value() {
        let id = Uuid::new_v4();
        let key = Uuid::from_path(id.to_string()).unwrap();
        assert_eq!(key.values(), vec![SqlValue::Uuid(id)]);
    }

    #[test]
    fn integer_key_rejects_malformed_segment() {
        assert!(i32::from_path("abc".to_string()).is_err());
        assert_eq!(i32::from_path("7".to_string()).unwrap(), 7);
    }
}
