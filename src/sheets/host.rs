// src/sheets/host.rs
//! The host write boundary: the platform attribute the document is stored in,
//! and the commit action that makes a written value durable.

use bevy::prelude::{warn, Resource};
use std::panic::{self, AssertUnwindSafe};

use super::error::{InvokeError, WriteError};

/// Capability object supplied by the host platform.
///
/// Implementations report unavailability through the error values rather than
/// panicking; a panic is still caught at the call site and treated as a failure.
pub trait HostBoundary: Send + Sync {
    fn try_write(&mut self, value: &str) -> Result<(), WriteError>;
    fn try_invoke(&mut self) -> Result<(), InvokeError>;
}

/// Resource owning the boundary. Its absence means the host is not wired up yet.
#[derive(Resource)]
pub struct HostLink {
    boundary: Box<dyn HostBoundary>,
}

impl HostLink {
    pub fn new(boundary: impl HostBoundary + 'static) -> Self {
        Self {
            boundary: Box::new(boundary),
        }
    }

    pub fn boundary_mut(&mut self) -> &mut dyn HostBoundary {
        self.boundary.as_mut()
    }
}

/// Result of one write-then-commit sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Value written and committed.
    Committed,
    /// Value written to the host attribute but the commit did not run.
    /// This is terminal: the data is held by the host, just not durably stored.
    WrittenNotCommitted(InvokeError),
    /// The write failed; the commit was not attempted.
    NotWritten(WriteError),
}

impl SaveOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, SaveOutcome::Committed)
    }

    pub fn value_reached_host(&self) -> bool {
        !matches!(self, SaveOutcome::NotWritten(_))
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Runs the two-phase write: attribute write first, commit action second.
/// A missing boundary is reported as `WriteError::NotReady`.
pub fn run_write_sequence(host: Option<&mut dyn HostBoundary>, value: &str) -> SaveOutcome {
    let Some(host) = host else {
        warn!("Autosave: no host boundary is linked; value not written.");
        return SaveOutcome::NotWritten(WriteError::NotReady);
    };

    let write = panic::catch_unwind(AssertUnwindSafe(|| host.try_write(value)))
        .unwrap_or_else(|payload| Err(WriteError::Panicked(panic_message(payload))));
    if let Err(e) = write {
        warn!("Autosave: host attribute write failed: {}", e);
        return SaveOutcome::NotWritten(e);
    }

    let invoke = panic::catch_unwind(AssertUnwindSafe(|| host.try_invoke()))
        .unwrap_or_else(|payload| Err(InvokeError::Panicked(panic_message(payload))));
    match invoke {
        Ok(()) => SaveOutcome::Committed,
        Err(e) => {
            warn!("Autosave: value written but commit did not run: {}", e);
            SaveOutcome::WrittenNotCommitted(e)
        }
    }
}

/// In-process host attribute with switchable readiness, for headless embedding and tests.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    pub value: Option<String>,
    pub ready: bool,
    pub writable: bool,
    pub commit_configured: bool,
    pub commit_executable: bool,
    /// Value as of the last successful commit.
    pub committed: Option<String>,
    pub writes: usize,
    pub commits: usize,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            value: None,
            ready: true,
            writable: true,
            commit_configured: true,
            commit_executable: true,
            committed: None,
            writes: 0,
            commits: 0,
        }
    }
}

impl MemoryHost {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            committed: Some(value.clone()),
            value: Some(value),
            ..Default::default()
        }
    }
}

impl HostBoundary for MemoryHost {
    fn try_write(&mut self, value: &str) -> Result<(), WriteError> {
        if !self.ready {
            return Err(WriteError::NotReady);
        }
        if !self.writable {
            return Err(WriteError::ReadOnly);
        }
        self.value = Some(value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn try_invoke(&mut self) -> Result<(), InvokeError> {
        if !self.commit_configured {
            return Err(InvokeError::NotConfigured);
        }
        if !self.commit_executable {
            return Err(InvokeError::NotExecutable);
        }
        self.committed = self.value.clone();
        self.commits += 1;
        Ok(())
    }
}
