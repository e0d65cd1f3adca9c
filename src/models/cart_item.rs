use diesel::QueryableByName;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::fields::FormFields;
use super::{parse_uuid_segment, Entity, FromFields, RecordKey};
use crate::domain::entity::EntityKind;
use crate::domain::errors::DomainError;
use crate::query::SqlValue;
use crate::schema::cart_items;

#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = cart_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItem {
    pub cart_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemKey {
    pub cart_id: Uuid,
    pub item_id: Uuid,
}

impl RecordKey for CartItemKey {
    type Path = (String, String);

    fn from_path((cart_id, item_id): (String, String)) -> Result<Self, DomainError> {
        Ok(CartItemKey {
            cart_id: parse_uuid_segment(&cart_id, "cart_id")?,
            item_id: parse_uuid_segment(&item_id, "item_id")?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.cart_id.into(), self.item_id.into()]
    }
}

impl FromFields for CartItem {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["cart_id", "item_id", "quantity"])?;
        Ok(CartItem {
            cart_id: fields.parse_required("cart_id")?,
            item_id: fields.parse_required("item_id")?,
            quantity: fields.parse_required("quantity")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartItemChanges {
    pub quantity: Option<i32>,
}

impl FromFields for CartItemChanges {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(CartItemChanges {
            quantity: fields.parse("quantity")?,
        })
    }
}

impl Entity for CartItem {
    const KIND: EntityKind = EntityKind::CartItem;

    type Key = CartItemKey;
    type New = CartItem;
    type Changes = CartItemChanges;

    fn insert_values(new: CartItem) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("cart_id", new.cart_id.into()),
            ("item_id", new.item_id.into()),
            ("quantity", new.quantity.into()),
        ]
    }

    fn apply(&mut self, changes: CartItemChanges) {
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![("quantity", self.quantity.into())]
    }
}
