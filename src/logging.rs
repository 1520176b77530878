use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

/// A unique identifier for a single validation pass, used to tie together
/// the log lines it produces.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct PassId(pub usize);

impl Display for PassId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PassId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> PassId {
        static PASS_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        PassId(PASS_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Set up logging from a log4rs YAML file.
pub fn init_from_file(path: impl AsRef<Path>) -> Result<()> {
    log4rs::init_file(path.as_ref(), Default::default())
        .map_err(|e| Error::Config(format!("{}: {e}", path.as_ref().display())))?;
    info!("Initialised logging");
    Ok(())
}
