use std::sync::Mutex;

use crate::errors::CoreError;

/// The single key under which the portfolio is persisted.
pub const SLOT_KEY: &str = "portfolio";

/// A single durable key-value slot holding the serialized portfolio —
/// the browser-localStorage contract, abstracted.
///
/// Writes are best-effort: the portfolio store logs a failed write and
/// continues, since the in-memory mapping stays authoritative.
pub trait PortfolioSlot: Send + Sync {
    /// Read the stored payload. `Ok(None)` means nothing was ever written.
    fn read(&self) -> Result<Option<String>, CoreError>;

    /// Overwrite the stored payload.
    fn write(&self, payload: &str) -> Result<(), CoreError>;
}

/// Slots behind an `Arc` are slots too; lets a test or frontend keep a
/// handle to the same slot the store owns.
impl<S: PortfolioSlot> PortfolioSlot for std::sync::Arc<S> {
    fn read(&self) -> Result<Option<String>, CoreError> {
        (**self).read()
    }

    fn write(&self, payload: &str) -> Result<(), CoreError> {
        (**self).write(payload)
    }
}

/// In-memory slot. Used in tests and by frontends that bridge to their own
/// storage (e.g. actual browser localStorage) outside this crate.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load the slot with a payload, as if a previous session wrote it.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(payload.into())),
        }
    }

    /// Snapshot the current contents (test inspection).
    pub fn contents(&self) -> Option<String> {
        self.value.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl PortfolioSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, CoreError> {
        Ok(self.value.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn write(&self, payload: &str) -> Result<(), CoreError> {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(payload.to_string());
        Ok(())
    }
}
