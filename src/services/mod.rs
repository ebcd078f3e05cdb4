//! Domain services: input validation and cross-entity rules on top of a [`Store`].
//!
//! [`Store`]: crate::repository::Store

pub mod auth;
pub mod categories;
pub mod products;
pub mod stock;
