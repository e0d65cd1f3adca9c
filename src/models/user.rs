use chrono::{DateTime, Utc};
use diesel::{Queryable, QueryableByName, Selectable};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::fields::{FormFields, NAME_MAX_CHARS, PHONE_MAX_CHARS};
use super::{Entity, FromFields};
use crate::domain::entity::{EntityKind, IMAGE_COLUMN};
use crate::domain::errors::DomainError;
use crate::query::SqlValue;
use crate::schema::users;

/// Public view of an account. The password hash is never loaded into it.
#[derive(Debug, Clone, PartialEq, Serialize, QueryableByName, ToSchema)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub img: Option<String>,
}

/// What login needs to check a password.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Credentials {
    pub id: Uuid,
    #[diesel(column_name = password)]
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub img: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub img: Option<String>,
}

// ── Forms ───────────────────────────────────────────────────────────

/// Signup input, still carrying the plaintext password.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub img: Option<String>,
}

impl FromFields for SignupForm {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["email", "password"])?;
        Ok(SignupForm {
            email: fields.required_bounded("email", NAME_MAX_CHARS)?,
            password: fields.required_text("password")?,
            name: fields.bounded("name", NAME_MAX_CHARS)?.unwrap_or_default(),
            phone: fields.bounded("phone", PHONE_MAX_CHARS)?.unwrap_or_default(),
            img: None,
        })
    }

    fn attach_image(&mut self, path: String) {
        self.img = Some(path);
    }
}

impl SignupForm {
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            phone: self.phone,
            password_hash,
            img: self.img,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl FromFields for LoginForm {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        fields.require(&["email", "password"])?;
        Ok(LoginForm {
            email: fields.required_text("email")?,
            password: fields.required_text("password")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdateForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub img: Option<String>,
}

impl FromFields for UserUpdateForm {
    fn from_fields(fields: &FormFields) -> Result<Self, DomainError> {
        Ok(UserUpdateForm {
            name: fields.bounded("name", NAME_MAX_CHARS)?,
            email: fields.bounded("email", NAME_MAX_CHARS)?,
            phone: fields.bounded("phone", PHONE_MAX_CHARS)?,
            password: fields.owned("password"),
            img: None,
        })
    }

    fn attach_image(&mut self, path: String) {
        self.img = Some(path);
    }
}

impl UserUpdateForm {
    pub fn into_changes(self, password_hash: Option<String>) -> UserChanges {
        UserChanges {
            name: self.name,
            email: self.email,
            phone: self.phone,
            password_hash,
            img: self.img,
        }
    }
}

// ── Entity ──────────────────────────────────────────────────────────

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    type Key = Uuid;
    type New = NewUser;
    type Changes = UserChanges;

    fn insert_values(new: NewUser) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", new.id.into()),
            ("name", new.name.into()),
            ("email", new.email.into()),
            ("phone", new.phone.into()),
            ("password", new.password_hash.into()),
            (IMAGE_COLUMN, new.img.into()),
        ]
    }

    fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(img) = changes.img {
            self.img = Some(img);
        }
    }

    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", self.name.clone().into()),
            ("email", self.email.clone().into()),
            ("phone", self.phone.clone().into()),
            (IMAGE_COLUMN, self.img.clone().into()),
        ]
    }

    fn hidden_assignments(changes: &UserChanges) -> Vec<(&'static str, SqlValue)> {
        changes
            .password_hash
            .iter()
            .map(|hash| ("password", SqlValue::from(hash.as_str())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_rejects_empty_password() {
        let fields = FormFields::from_pairs([("email", "a@b.c"), ("password", "")]);
        assert_eq!(
            SignupForm::from_fields(&fields).unwrap_err(),
            DomainError::InvalidInput("password is required".to_string())
        );
    }

    #[test]
    fn signup_optional_fields_default_to_empty() {
        let fields = FormFields::from_pairs([("email", "a@b.c"), ("password", "pw")]);
        let form = SignupForm::from_fields(&fields).unwrap();
        assert_eq!(form.name, "");
        assert_eq!(form.phone, "");
        let new = form.into_new_user("hash".to_string());
        assert_eq!(new.password_hash, "hash");
        assert!(!new.id.is_nil());
    }

    #[test]
    fn signup_rejects_email_wider_than_its_column() {
        let email = format!("{}@example.com", "x".repeat(NAME_MAX_CHARS));
        let fields = FormFields::from_pairs([("email", email.as_str()), ("password", "pw")]);
        assert_eq!(
            SignupForm::from_fields(&fields).unwrap_err(),
            DomainError::InvalidInput("email must be at most 255 characters".to_string())
        );
    }

    #[test]
    fn update_rejects_overlong_phone() {
        let phone = "5".repeat(PHONE_MAX_CHARS + 1);
        let fields = FormFields::from_pairs([("phone", phone.as_str())]);
        assert!(matches!(
            UserUpdateForm::from_fields(&fields),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn login_requires_both_fields() {
        let fields = FormFields::from_pairs([("email", "a@b.c")]);
        assert!(LoginForm::from_fields(&fields).is_err());
    }

    #[test]
    fn password_is_written_only_when_changed() {
        assert!(User::hidden_assignments(&UserChanges::default()).is_empty());
        let changes = UserChanges {
            password_hash: Some("$2b$04$hash".to_string()),
            ..UserChanges::default()
        };
        assert_eq!(
            User::hidden_assignments(&changes),
            vec![("password", SqlValue::Text("$2b$04$hash".to_string()))]
        );
    }

    #[test]
    fn serialized_user_has_no_password() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            phone: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            img: None,
        };
        let json = serde_json::to_value(user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ann@example.com");
    }
}
