//! Application layer for Guardian.
//!
//! Use cases that coordinate the store with its persistence and remote
//! collaborators. Store locks are never held across I/O.

pub mod auth_usecase;
pub mod review_usecase;
pub mod store_service;

pub use auth_usecase::AuthUseCase;
pub use review_usecase::ReviewUseCase;
pub use store_service::StoreService;

#[cfg(test)]
mod testing;
