use thiserror::Error;

use crate::model::{
    lookup::LookupError,
    state::{ApplicationState, Event},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot {event} an application that is {from}")]
    InvalidTransition {
        from: ApplicationState,
        event: Event,
    },
    #[error("Unknown status catalog: {0}")]
    UnknownCatalog(String),
    #[error("Unknown status `{name}` in catalog {catalog}")]
    UnknownStatus { catalog: String, name: String },
    #[error("Unknown flag accessor: {0}")]
    UnknownAccessor(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Bad config: {0}")]
    Config(String),
    #[cfg(feature = "db")]
    #[error(transparent)]
    Db(#[from] mongodb::error::Error),
}
