use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use super::ApplicationCore;

/// Unique ID of a stored application.
pub type ApplicationId = u32;

/// An application without an ID, i.e. a fresh submission.
pub type NewApplication = ApplicationCore;

/// An application from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: ApplicationId,
    #[serde(flatten)]
    pub application: ApplicationCore,
}

impl Application {
    pub fn new(id: ApplicationId, application: ApplicationCore) -> Self {
        Self { id, application }
    }
}

impl Deref for Application {
    type Target = ApplicationCore;

    fn deref(&self) -> &Self::Target {
        &self.application
    }
}

impl DerefMut for Application {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.application
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Application {
        pub fn example() -> Self {
            Self::new(1, ApplicationCore::example())
        }
    }
}
