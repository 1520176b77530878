use std::fmt::{Display, Formatter};

#[cfg(feature = "db")]
use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Review stages of an application.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    /// Submitted, awaiting review.
    #[default]
    Pending,
    /// Accepted by a coordinator.
    Approved,
    /// Brought in from an external list rather than submitted.
    Imported,
    /// Turned down; the applicant may apply again.
    Rejected,
    /// Junk submission.
    Spammed,
}

/// Events that move an application between states.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Spam,
    Reject,
    SetImported,
    Approve,
}

impl ApplicationState {
    pub const ALL: [ApplicationState; 5] = [
        Self::Pending,
        Self::Approved,
        Self::Imported,
        Self::Rejected,
        Self::Spammed,
    ];

    /// The transition table: where `event` leads from this state, if anywhere.
    pub fn target(self, event: Event) -> Option<ApplicationState> {
        use ApplicationState::*;
        match (self, event) {
            (_, Event::Spam) => Some(Spammed),
            (_, Event::Reject) => Some(Rejected),
            (Pending, Event::SetImported) => Some(Imported),
            (Pending | Rejected | Imported, Event::Approve) => Some(Approved),
            _ => None,
        }
    }

    /// Apply `event`, failing without change if it is illegal here.
    pub fn fire(&mut self, event: Event) -> Result<()> {
        let next = self.target(event).ok_or(Error::InvalidTransition {
            from: *self,
            event,
        })?;
        debug!("Application state {self} -> {next} on {event}");
        *self = next;
        Ok(())
    }

    pub fn can_fire(self, event: Event) -> bool {
        self.target(event).is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Imported => "imported",
            Self::Rejected => "rejected",
            Self::Spammed => "spammed",
        }
    }
}

impl Display for ApplicationState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Spam => "spam",
            Self::Reject => "reject",
            Self::SetImported => "set_imported",
            Self::Approve => "approve",
        })
    }
}

#[cfg(feature = "db")]
impl From<ApplicationState> for Bson {
    fn from(state: ApplicationState) -> Self {
        to_bson(&state).expect("Serialisation is infallible")
    }
}
