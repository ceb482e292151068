//! Task domain module.
//!
//! This module contains the review-queue task model, its one-way status
//! state machine, the persistence trait and the seeded demo tasks.
//!
//! # Module Structure
//!
//! - `model`: `Task`, `Tier`, `TaskStatus`, `ReviewDecision`
//! - `repository`: `TaskRepository` trait for the task backend
//! - `seed`: the three tasks every fresh queue starts with

mod model;
pub mod repository;
pub mod seed;

pub use model::{ReviewDecision, Task, TaskStatus, Tier};
pub use repository::TaskRepository;
