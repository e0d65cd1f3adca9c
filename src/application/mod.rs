pub mod accounts;
pub mod credentials;

pub use accounts::AccountService;
pub use credentials::{CredentialService, IssuedToken, ACCESS_TOKEN_COOKIE};
