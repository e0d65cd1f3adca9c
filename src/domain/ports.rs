use uuid::Uuid;

use super::errors::DomainError;
use crate::models::user::{Credentials, NewUser, User, UserChanges};
use crate::models::Entity;

/// What a delete leaves behind that lives outside the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removed {
    /// Stored relative path of the row's image, if it had one.
    pub image: Option<String>,
}

/// Storage for every [`Entity`]. "Not found" is `Ok(None)`, never an error.
pub trait Repository: Send + Sync + 'static {
    fn list<E: Entity>(&self) -> Result<Vec<E>, DomainError>;

    fn find<E: Entity>(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    fn create<E: Entity>(&self, new: E::New) -> Result<E, DomainError>;

    fn update<E: Entity>(&self, key: &E::Key, changes: E::Changes)
        -> Result<Option<E>, DomainError>;

    fn delete<E: Entity>(&self, key: &E::Key) -> Result<Option<Removed>, DomainError>;

    /// Relative path of the image a row currently stores. `None` for entities
    /// without an image slot.
    fn stored_image<E: Entity>(&self, key: &E::Key) -> Result<Option<String>, DomainError>;
}

/// Account persistence used by signup, login and profile updates.
pub trait AccountStore: Send + Sync + 'static {
    fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, DomainError>;

    fn insert_user(&self, new: NewUser) -> Result<User, DomainError>;

    fn find_user(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DomainError>;
}
