//! Infrastructure layer - Implementations of domain traits

pub mod logging;
pub mod observability;
pub mod storage;
pub mod user;
