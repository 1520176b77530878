mod accessors;
mod application_core;
mod db;

pub use accessors::{find_accessor, flag_accessors, FlagAccessor, StatusField};
pub use application_core::{ApplicationCore, LegalStatus, SubmissionContext};
pub use db::{Application, ApplicationId, NewApplication};
