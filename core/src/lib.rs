pub mod core;
pub mod types;

pub use crate::core::error::{CoreError, StoreError, ValidationError};
pub use crate::core::vocabulary::{BlockList, ProfanityFilter, Vocabulary};
pub use crate::core::{
    Coordinator, MaintenanceOutcome, StatsQuery, SubmitOutcome, SubmitRequest, Submission,
};
