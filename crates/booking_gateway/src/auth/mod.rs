pub mod credential;
pub mod guard;
pub mod registration;
pub mod token_store;

pub use credential::{bearer_token, extract_credential};
pub use guard::GuardDecision;
pub use registration::{FieldErrors, RegistrationRequest};
pub use token_store::{Credential, TokenStore, ACCESS_TOKEN_COOKIE, SESSION_COOKIE};
