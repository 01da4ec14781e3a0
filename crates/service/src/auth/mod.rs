//! Auth module: credential storage, password hashing, token issuance and
//! verification, split into domain / repository / service layers.
//!
//! This module centralizes registration and login business logic under the
//! service crate; the HTTP auth gate in the server crate only consumes
//! [`token::TokenKeys`] and never touches the store.

pub mod domain;
pub mod errors;
pub mod password;
pub mod token;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
