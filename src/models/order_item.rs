use bigdecimal::BigDecimal;
use diesel::QueryableByName;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::fields::FormFields;
use super::{Entity, FromFields};
use crate::domain::entity::EntityKind;
use crate::domain::errors::DomainError;
use crate::query::SqlValue;
use crate::schema::order_items;

/// One line of an order, priced at the time it was placed.
#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    #[serde(serialize_with = "super::decimal::serialize")]
    #[schema(value_type = f64)]
    pub price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

impl FromFields for NewOrderItem {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["order_id", "item_id", "quantity", "price"])?;
        Ok(NewOrderItem {
            id: Uuid::new_v4(),
            order_id: fields.parse_required("order_id")?,
            item_id: fields.parse_required("item_id")?,
            quantity: fields.parse_required("quantity")?,
            price: fields.required_amount("price")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderItemChanges {
    pub quantity: Option<i32>,
    pub price: Option<BigDecimal>,
}

impl FromFields for OrderItemChanges {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(OrderItemChanges {
            quantity: fields.parse("quantity")?,
            price: fields.amount("price")?,
        })
    }
}

impl Entity for OrderItem {
    const KIND: EntityKind = EntityKind::OrderItem;

    type Key = Uuid;
    type New = NewOrderItem;
    type Changes = OrderItemChanges;

    fn insert_values(new: NewOrderItem) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", new.id.into()),
            ("order_id", new.order_id.into()),
            ("item_id", new.item_id.into()),
            ("quantity", new.quantity.into()),
            ("price", new.price.into()),
        ]
    }

    fn apply(&mut self, changes: OrderItemChanges) {
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("quantity", self.quantity.into()),
            ("price", self.price.clone().into()),
        ]
    }
}
