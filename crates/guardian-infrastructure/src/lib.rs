pub mod async_dir_task_repository;
pub mod config_service;
pub mod demo_identity_provider;
pub mod paths;
pub mod secret_service;
pub mod state_repository;
pub mod storage;

pub use crate::async_dir_task_repository::AsyncDirTaskRepository;
pub use crate::config_service::ConfigService;
pub use crate::demo_identity_provider::DemoIdentityProvider;
pub use crate::paths::{GuardianPaths, ServiceType};
pub use crate::secret_service::SecretServiceImpl;
pub use crate::state_repository::StateRepositoryImpl;
