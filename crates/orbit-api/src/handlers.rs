//! Request handlers.

pub mod added_jobs;
pub mod all_jobs;
pub mod common;
pub mod health;
pub mod some_jobs;
pub mod tasks;
pub mod users;

pub use added_jobs::*;
pub use all_jobs::*;
pub use health::*;
pub use some_jobs::*;
pub use tasks::*;
pub use users::*;
