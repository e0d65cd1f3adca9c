use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::pg::{Pg, PgValue};
use diesel::sql_types::Text;
use diesel::QueryableByName;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::fields::FormFields;
use super::{Entity, FromFields};
use crate::domain::entity::EntityKind;
use crate::domain::errors::DomainError;
use crate::query::SqlValue;
use crate::schema::orders;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromSqlRow, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Preparing,
    Completed,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Preparing => "preparing",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "preparing" => Ok(OrderStatus::Preparing),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(DomainError::invalid(format!("Invalid order status: {other}"))),
        }
    }
}

impl FromSql<Text, Pg> for OrderStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        Ok(raw.parse::<OrderStatus>()?)
    }
}

impl From<OrderStatus> for SqlValue {
    fn from(status: OrderStatus) -> Self {
        SqlValue::Text(status.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: Uuid,
    #[serde(serialize_with = "super::decimal::serialize")]
    #[schema(value_type = f64)]
    pub total_order_cost: BigDecimal,
    pub customer_id: Uuid,
    pub vendor_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub id: Uuid,
    pub total_order_cost: BigDecimal,
    pub customer_id: Uuid,
    pub vendor_id: Uuid,
    pub status: OrderStatus,
}

impl FromFields for NewOrder {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["total_order_cost", "customer_id", "vendor_id", "status"])?;
        Ok(NewOrder {
            id: Uuid::new_v4(),
            total_order_cost: fields.required_amount("total_order_cost")?,
            customer_id: fields.parse_required("customer_id")?,
            vendor_id: fields.parse_required("vendor_id")?,
            status: status(fields)?.unwrap_or(OrderStatus::Preparing),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub total_order_cost: Option<BigDecimal>,
    pub customer_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

impl FromFields for OrderChanges {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(OrderChanges {
            total_order_cost: fields.amount("total_order_cost")?,
            customer_id: fields.parse("customer_id")?,
            vendor_id: fields.parse("vendor_id")?,
            status: status(fields)?,
        })
    }
}

// The status error names the rejected value, not just the field.
fn status(fields: &FormFields) -> Result<Option<OrderStatus>, DomainError> {
    fields.text("status").map(str::parse).transpose()
}

impl Entity for Order {
    const KIND: EntityKind = EntityKind::Order;

    type Key = Uuid;
    type New = NewOrder;
    type Changes = OrderChanges;

    fn insert_values(new: NewOrder) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", new.id.into()),
            ("total_order_cost", new.total_order_cost.into()),
            ("customer_id", new.customer_id.into()),
            ("vendor_id", new.vendor_id.into()),
            ("status", new.status.into()),
        ]
    }

    fn apply(&mut self, changes: OrderChanges) {
        if let Some(total_order_cost) = changes.total_order_cost {
            self.total_order_cost = total_order_cost;
        }
        if let Some(customer_id) = changes.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(vendor_id) = changes.vendor_id {
            self.vendor_id = vendor_id;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("total_order_cost", self.total_order_cost.clone().into()),
            ("customer_id", self.customer_id.into()),
            ("vendor_id", self.vendor_id.into()),
            ("status", self.status.into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_fields(status: &str) -> FormFields {
        FormFields::from_pairs([
            ("total_order_cost", "25.50".to_string()),
            ("customer_id", Uuid::new_v4().to_string()),
            ("vendor_id", Uuid::new_v4().to_string()),
            ("status", status.to_string()),
        ])
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [OrderStatus::Preparing, OrderStatus::Completed] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_invalid_input() {
        let err = NewOrder::from_fields(&create_fields("shipped")).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidInput("Invalid order status: shipped".to_string())
        );
    }

    #[test]
    fn create_requires_status() {
        let err = NewOrder::from_fields(&create_fields("")).unwrap_err();
        assert_eq!(err, DomainError::InvalidInput("status is required".to_string()));
    }

    #[test]
    fn update_completes_order() {
        let new = NewOrder::from_fields(&create_fields("preparing")).unwrap();
        let mut order = Order {
            id: new.id,
            total_order_cost: new.total_order_cost.clone(),
            customer_id: new.customer_id,
            vendor_id: new.vendor_id,
            status: new.status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let fields = FormFields::from_pairs([("status", "completed")]);
        order.apply(OrderChanges::from_fields(&fields).unwrap());
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.total_order_cost, new.total_order_cost);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Completed).unwrap(),
            serde_json::json!("completed")
        );
    }
}
