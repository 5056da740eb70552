pub mod error;
pub mod migration_service;
pub mod populate;
pub mod retry;
