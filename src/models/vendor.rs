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
use crate::schema::vendors;

#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = vendors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub img: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVendor {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub img: Option<String>,
}

impl FromFields for NewVendor {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["name"])?;
        Ok(NewVendor {
            id: Uuid::new_v4(),
            name: fields.required_bounded("name", NAME_MAX_CHARS)?,
            description: fields.owned("description").unwrap_or_default(),
            img: None,
        })
    }

    fn attach_image(&mut self, path: String) {
        self.img = Some(path);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub img: Option<String>,
}

impl FromFields for VendorChanges {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(VendorChanges {
            name: fields.bounded("name", NAME_MAX_CHARS)?,
            description: fields.owned("description"),
            img: None,
        })
    }

    fn attach_image(&mut self, path: String) {
        self.img = Some(path);
    }
}

impl Entity for Vendor {
    const KIND: EntityKind = EntityKind::Vendor;

    type Key = Uuid;
    type New = NewVendor;
    type Changes = VendorChanges;

    fn insert_values(new: NewVendor) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", new.id.into()),
            ("name", new.name.into()),
            ("description", new.description.into()),
            (IMAGE_COLUMN, new.img.into()),
        ]
    }

    fn apply(&mut self, changes: VendorChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(img) = changes.img {
            self.img = Some(img);
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", self.name.clone().into()),
            ("description", self.description.clone().into()),
            (IMAGE_COLUMN, self.img.clone().into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_requires_name() {
        let fields = FormFields::from_pairs([("description", "Late night noodles")]);
        assert_eq!(
            NewVendor::from_fields(&fields).unwrap_err(),
            DomainError::InvalidInput("name is required".to_string())
        );
    }

    #[test]
    fn signup_defaults_description_and_takes_image() {
        let fields = FormFields::from_pairs([("name", "Noodle Bar")]);
        let mut new = NewVendor::from_fields(&fields).unwrap();
        new.attach_image("vendors/logo.png".to_string());
        assert_eq!(new.description, "");
        assert_eq!(new.img.as_deref(), Some("vendors/logo.png"));
    }

    #[test]
    fn update_without_image_keeps_stored_path() {
        let mut vendor = Vendor {
            id: Uuid::new_v4(),
            name: "Noodle Bar".to_string(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            img: Some("vendors/logo.png".to_string()),
        };
        let fields = FormFields::from_pairs([("description", "Open till 2am")]);
        vendor.apply(VendorChanges::from_fields(&fields).unwrap());
        assert_eq!(vendor.description, "Open till 2am");
        assert_eq!(vendor.img.as_deref(), Some("vendors/logo.png"));
    }
}
