// src/auth/mod.rs
//
// Identity boundary. Services receive an already authenticated `Principal`
// and use it only to attribute ownership and check roles.

pub mod authenticator;
pub mod password;

pub use authenticator::{AuthenticationProvider, CredentialAuthenticator, Principal};
pub use password::{hash_password, verify_password};
