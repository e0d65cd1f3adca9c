use diesel::QueryableByName;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::fields::FormFields;
use super::{parse_uuid_segment, Entity, FromFields, RecordKey};
use crate::domain::entity::EntityKind;
use crate::domain::errors::DomainError;
use crate::query::SqlValue;
use crate::schema::vendor_admins;

/// Grants a user administrative rights over a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = vendor_admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VendorAdmin {
    pub user_id: Uuid,
    pub vendor_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorAdminKey {
    pub user_id: Uuid,
    pub vendor_id: Uuid,
}

impl RecordKey for VendorAdminKey {
    type Path = (String, String);

    fn from_path((user_id, vendor_id): (String, String)) -> Result<Self, DomainError> {
        Ok(VendorAdminKey {
            user_id: parse_uuid_segment(&user_id, "user_id")?,
            vendor_id: parse_uuid_segment(&vendor_id, "vendor_id")?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.user_id.into(), self.vendor_id.into()]
    }
}

impl FromFields for VendorAdmin {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["user_id", "vendor_id"])?;
        Ok(VendorAdmin {
            user_id: fields.parse_required("user_id")?,
            vendor_id: fields.parse_required("vendor_id")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorAdminChanges {
    pub vendor_id: Option<Uuid>,
}

impl FromFields for VendorAdminChanges {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(VendorAdminChanges {
            vendor_id: fields.parse("vendor_id")?,
        })
    }
}

impl Entity for VendorAdmin {
    const KIND: EntityKind = EntityKind::VendorAdmin;

    type Key = VendorAdminKey;
    type New = VendorAdmin;
    type Changes = VendorAdminChanges;

    fn insert_values(new: VendorAdmin) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("user_id", new.user_id.into()),
            ("vendor_id", new.vendor_id.into()),
        ]
    }

    fn apply(&mut self, changes: VendorAdminChanges) {
        if let Some(vendor_id) = changes.vendor_id {
            self.vendor_id = vendor_id;
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![("vendor_id", self.vendor_id.into())]
    }
}
