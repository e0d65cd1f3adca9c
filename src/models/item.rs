use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::QueryableByName;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::fields::{FormFields, NAME_MAX_CHARS};
use super::{Entity, FromFields};
use crate::domain::entity::{EntityKind, IMAGE_COLUMN};
use crate::domain::errors::DomainError;
use crate::query::SqlValue;
use crate::schema::items;

/// A menu item offered by a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Item {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    #[serde(serialize_with = "super::decimal::serialize")]
    #[schema(value_type = f64)]
    pub price: BigDecimal,
    pub img: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub img: Option<String>,
}

impl FromFields for NewItem {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["name", "price", "vendor_id"])?;
        Ok(NewItem {
            id: Uuid::new_v4(),
            price: fields.required_amount("price")?,
            vendor_id: fields.parse_required("vendor_id")?,
            name: fields.required_bounded("name", NAME_MAX_CHARS)?,
            img: None,
        })
    }

    fn attach_image(&mut self, path: String) {
        self.img = Some(path);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub price: Option<BigDecimal>,
    pub vendor_id: Option<Uuid>,
    pub img: Option<String>,
}

impl FromFields for ItemChanges {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(ItemChanges {
            name: fields.bounded("name", NAME_MAX_CHARS)?,
            price: fields.amount("price")?,
            vendor_id: fields.parse("vendor_id")?,
            img: None,
        })
    }

    fn attach_image(&mut self, path: String) {
        self.img = Some(path);
    }
}

impl Entity for Item {
    const KIND: EntityKind = EntityKind::Item;

    type Key = Uuid;
    type New = NewItem;
    type Changes = ItemChanges;

    fn insert_values(new: NewItem) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", new.id.into()),
            ("vendor_id", new.vendor_id.into()),
            ("name", new.name.into()),
            ("price", new.price.into()),
            (IMAGE_COLUMN, new.img.into()),
        ]
    }

    fn apply(&mut self, changes: ItemChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(vendor_id) = changes.vendor_id {
            self.vendor_id = vendor_id;
        }
        if let Some(img) = changes.img {
            self.img = Some(img);
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", self.name.clone().into()),
            ("price", self.price.clone().into()),
            ("vendor_id", self.vendor_id.into()),
            (IMAGE_COLUMN, self.img.clone().into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn item() -> Item {
        Item {
            id: Uuid::new_v4(),
            vendor_id: Uuid::new_v4(),
            name: "Pizza".to_string(),
            price: BigDecimal::from_str("9.99").unwrap(),
            img: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_requires_name_price_and_vendor() {
        let fields = FormFields::from_pairs([("name", "Pizza")]);
        let err = NewItem::from_fields(&fields).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidInput("price, vendor_id are required".to_string())
        );
    }

    #[test]
    fn create_rejects_malformed_price() {
        let vendor = Uuid::new_v4().to_string();
        let fields = FormFields::from_pairs([
            ("name", "Pizza"),
            ("price", "cheap"),
            ("vendor_id", vendor.as_str()),
        ]);
        let err = NewItem::from_fields(&fields).unwrap_err();
        assert_eq!(err, DomainError::InvalidInput("Invalid price format".to_string()));
    }

    #[test]
    fn create_rejects_price_beyond_money_column() {
        let vendor = Uuid::new_v4().to_string();
        let fields = FormFields::from_pairs([
            ("name", "Pizza"),
            ("price", "123456789012"),
            ("vendor_id", vendor.as_str()),
        ]);
        let err = NewItem::from_fields(&fields).unwrap_err();
        assert_eq!(err, DomainError::InvalidInput("price is out of range".to_string()));
    }

    #[test]
    fn update_rejects_overlong_name() {
        let name = "x".repeat(300);
        let fields = FormFields::from_pairs([("name", name.as_str())]);
        assert!(matches!(
            ItemChanges::from_fields(&fields),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn create_generates_an_id() {
        let vendor = Uuid::new_v4();
        let vendor_text = vendor.to_string();
        let fields = FormFields::from_pairs([
            ("name", "Pizza"),
            ("price", "9.99"),
            ("vendor_id", vendor_text.as_str()),
        ]);
        let new = NewItem::from_fields(&fields).unwrap();
        assert!(!new.id.is_nil());
        assert_eq!(new.vendor_id, vendor);
        assert_eq!(new.img, None);
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let mut current = item();
        let fields = FormFields::from_pairs([("name", ""), ("price", "12.5")]);
        current.apply(ItemChanges::from_fields(&fields).unwrap());
        assert_eq!(current.name, "Pizza");
        assert_eq!(current.price, BigDecimal::from_str("12.5").unwrap());
    }

    #[test]
    fn assignments_cover_every_mutable_column() {
        let columns: Vec<_> = item().assignments().into_iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["name", "price", "vendor_id", "img"]);
    }

    #[test]
    fn price_serializes_as_number() {
        let json = serde_json::to_value(item()).unwrap();
        assert_eq!(json["price"], serde_json::json!(9.99));
        assert!(json["img"].is_null());
    }
}
