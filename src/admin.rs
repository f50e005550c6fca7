//! Password-gated reset of the working snapshot.
//!
//! Only the command line front end holds this capability; the planning core
//! just receives the reloaded snapshot.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("admin file {path} is unavailable: {source}")]
    AdminFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("incorrect password, access denied")]
    Denied,

    #[error("cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Restores the canonical dataset over the working snapshot.
#[derive(Debug, Clone)]
pub struct AdminGate {
    admin_file: PathBuf,
    canonical: PathBuf,
    working: PathBuf,
}

impl AdminGate {
    pub fn new(
        admin_file: impl Into<PathBuf>,
        canonical: impl Into<PathBuf>,
        working: impl Into<PathBuf>,
    ) -> Self {
        Self {
            admin_file: admin_file.into(),
            canonical: canonical.into(),
            working: working.into(),
        }
    }

    /// Compares `password` with the first line of the admin file.
    pub fn authorize(&self, password: &str) -> Result<(), AdminError> {
        let stored = fs::read_to_string(&self.admin_file).map_err(|source| {
            AdminError::AdminFile {
                path: self.admin_file.clone(),
                source,
            }
        })?;
        let expected = stored.lines().next().unwrap_or_default().trim_end();
        if password != expected {
            return Err(AdminError::Denied);
        }
        Ok(())
    }

    /// Copies the canonical file over the working snapshot once authorized.
    pub fn reset(&self, password: &str) -> Result<(), AdminError> {
        self.authorize(password)?;
        fs::copy(&self.canonical, &self.working).map_err(|source| AdminError::Copy {
            from: self.canonical.clone(),
            to: self.working.clone(),
            source,
        })?;
        info!(
            canonical = %self.canonical.display(),
            working = %self.working.display(),
            "working snapshot reset"
        );
        Ok(())
    }
}
