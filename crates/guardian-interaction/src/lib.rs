//! Remote collaborators: identity provider, task backend and Gemini analysis.

pub mod gemini_api_client;
mod http;
pub mod identity_api_client;
pub mod json_extract;
pub mod task_api_repository;

pub use gemini_api_client::GeminiApiClient;
pub use identity_api_client::RestIdentityProvider;
pub use task_api_repository::RestTaskRepository;
