use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::QueryableByName;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::fields::FormFields;
use super::{Entity, FromFields};
use crate::domain::entity::EntityKind;
use crate::domain::errors::DomainError;
use crate::query::SqlValue;
use crate::schema::carts;

#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Cart {
    pub id: Uuid,
    #[serde(serialize_with = "super::decimal::serialize")]
    #[schema(value_type = f64)]
    pub total_price: BigDecimal,
    pub quantity: i32,
    pub vendor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Carts are keyed by an id the client chooses, usually its session id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCart {
    pub id: Uuid,
    pub total_price: BigDecimal,
    pub quantity: i32,
    pub vendor_id: Option<Uuid>,
}

impl FromFields for NewCart {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["id", "total_price", "quantity"])?;
        Ok(NewCart {
            id: fields.parse_required("id")?,
            total_price: fields.required_amount("total_price")?,
            quantity: fields.parse_required("quantity")?,
            vendor_id: fields.parse("vendor_id")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartChanges {
    pub total_price: Option<BigDecimal>,
    pub quantity: Option<i32>,
    pub vendor_id: Option<Uuid>,
}

impl FromFields for CartChanges {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(CartChanges {
            total_price: fields.amount("total_price")?,
            quantity: fields.parse("quantity")?,
            vendor_id: fields.parse("vendor_id")?,
        })
    }
}

impl Entity for Cart {
    const KIND: EntityKind = EntityKind::Cart;

    type Key = Uuid;
    type New = NewCart;
    type Changes = CartChanges;

    fn insert_values(new: NewCart) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", new.id.into()),
            ("total_price", new.total_price.into()),
            ("quantity", new.quantity.into()),
            ("vendor_id", new.vendor_id.into()),
        ]
    }

    fn apply(&mut self, changes: CartChanges) {
        if let Some(total_price) = changes.total_price {
            self.total_price = total_price;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(vendor_id) = changes.vendor_id {
            self.vendor_id = Some(vendor_id);
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("total_price", self.total_price.clone().into()),
            ("quantity", self.quantity.into()),
            ("vendor_id", self.vendor_id.into()),
        ]
    }
}
