mod catalog;
mod mask;

pub use catalog::*;
pub use mask::{Checkbox, StatusMask};
