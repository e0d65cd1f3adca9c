use uuid::Uuid;

use super::credentials::{CredentialService, IssuedToken};
use crate::domain::errors::DomainError;
use crate::domain::ports::AccountStore;
use crate::models::user::{LoginForm, SignupForm, User, UserUpdateForm};

/// Signup, login and profile updates on top of an [`AccountStore`].
pub struct AccountService<S> {
    store: S,
    credentials: CredentialService,
}

impl<S: AccountStore> AccountService<S> {
    pub fn new(store: S, credentials: CredentialService) -> Self {
        Self { store, credentials }
    }

    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }

    pub fn signup(&self, form: SignupForm) -> Result<User, DomainError> {
        let hash = self.credentials.hash_password(&form.password)?;
        self.store.insert_user(form.into_new_user(hash))
    }

    /// Unknown email and wrong password fail the same way, after the same
    /// amount of hashing.
    pub fn login(&self, form: LoginForm) -> Result<IssuedToken, DomainError> {
        let Some(credentials) = self.store.find_credentials(&form.email)? else {
            self.credentials.verify_decoy(&form.password);
            return Err(DomainError::InvalidCredentials);
        };
        if !self
            .credentials
            .verify_password(&credentials.password_hash, &form.password)
        {
            return Err(DomainError::InvalidCredentials);
        }
        self.credentials.issue_token(credentials.id)
    }

    /// Re-hashes the password only when a new one was sent.
    pub fn update(&self, id: Uuid, form: UserUpdateForm) -> Result<Option<User>, DomainError> {
        let hash = form
            .password
            .as_deref()
            .map(|password| self.credentials.hash_password(password))
            .transpose()?;
        self.store.update_user(id, form.into_changes(hash))
    }

    pub fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.store
            .find_user(user_id)?
            .ok_or(DomainError::InvalidCredentials)
    }
}
