pub mod application;
pub mod lookup;
#[cfg(feature = "db")]
pub mod mongodb;
pub mod phone;
pub mod reference;
pub mod social;
pub mod state;
pub mod status;
pub mod validation;
