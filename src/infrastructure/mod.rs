//! Infrastructure layer - adapters and services around the domain

pub mod logging;
pub mod object_store;
pub mod records;
pub mod services;
