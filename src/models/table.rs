use diesel::QueryableByName;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::fields::{FormFields, NAME_MAX_CHARS};
use super::{Entity, FromFields};
use crate::domain::entity::EntityKind;
use crate::domain::errors::DomainError;
use crate::query::SqlValue;
use crate::schema::tables;

/// A physical table at a vendor, optionally occupied by a customer.
#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = tables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DiningTable {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub is_available: bool,
    pub customer_id: Option<Uuid>,
    pub is_needs_service: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDiningTable {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub is_available: bool,
    pub customer_id: Option<Uuid>,
    pub is_needs_service: bool,
}

impl FromFields for NewDiningTable {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["name", "vendor_id"])?;
        Ok(NewDiningTable {
            id: Uuid::new_v4(),
            vendor_id: fields.parse_required("vendor_id")?,
            name: fields.required_bounded("name", NAME_MAX_CHARS)?,
            is_available: fields.boolean("is_available")?.unwrap_or(false),
            customer_id: fields.parse("customer_id")?,
            is_needs_service: fields.boolean("is_needs_service")?.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiningTableChanges {
    pub vendor_id: Option<Uuid>,
    pub name: Option<String>,
    pub is_available: Option<bool>,
    pub customer_id: Option<Uuid>,
    pub is_needs_service: Option<bool>,
}

impl FromFields for DiningTableChanges {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(DiningTableChanges {
            vendor_id: fields.parse("vendor_id")?,
            name: fields.bounded("name", NAME_MAX_CHARS)?,
            is_available: fields.boolean("is_available")?,
            customer_id: fields.parse("customer_id")?,
            is_needs_service: fields.boolean("is_needs_service")?,
        })
    }
}

impl Entity for DiningTable {
    const KIND: EntityKind = EntityKind::Table;

    type Key = Uuid;
    type New = NewDiningTable;
    type Changes = DiningTableChanges;

    fn insert_values(new: NewDiningTable) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", new.id.into()),
            ("vendor_id", new.vendor_id.into()),
            ("name", new.name.into()),
            ("is_available", new.is_available.into()),
            ("customer_id", new.customer_id.into()),
            ("is_needs_service", new.is_needs_service.into()),
        ]
    }

    fn apply(&mut self, changes: DiningTableChanges) {
        if let Some(vendor_id) = changes.vendor_id {
            self.vendor_id = vendor_id;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(is_available) = changes.is_available {
            self.is_available = is_available;
        }
        if let Some(customer_id) = changes.customer_id {
            self.customer_id = Some(customer_id);
        }
        if let Some(is_needs_service) = changes.is_needs_service {
            self.is_needs_service = is_needs_service;
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("vendor_id", self.vendor_id.into()),
            ("name", self.name.clone().into()),
            ("is_available", self.is_available.into()),
            ("customer_id", self.customer_id.into()),
            ("is_needs_service", self.is_needs_service.into()),
        ]
    }
}
