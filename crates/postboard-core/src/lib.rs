//! # Postboard Core
//!
//! The domain layer of Postboard: entities, the access layer that reads and
//! writes them, and the ports infrastructure must implement.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod identity;
pub mod pagination;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use identity::{Identity, Requester};
pub use pagination::{Page, PageRequest};
pub use service::BlogService;
