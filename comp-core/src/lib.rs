pub mod calculations;
pub mod engine;
pub mod models;
pub mod store;

pub use engine::{Engine, EngineError, JobSalaryProfile};
pub use models::*;
pub use store::{ReferenceStore, ReferenceStoreBuilder, StoreError};
