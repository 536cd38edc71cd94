//! Volatile service state shared across transports.
//!
//! `CoreState` owns the current analysis workspace: the latest
//! `MedicineRecord` (replaced per analysis) and the append-only chat
//! transcript. Both live in memory only and are discarded on restart.

use std::sync::{Mutex, MutexGuard};

use crate::chat;
use crate::models::{ChatMessage, MedicineRecord};

pub struct CoreState {
    /// Most recent analysis result. `None` until the first image is analyzed.
    analysis: Mutex<Option<MedicineRecord>>,
    /// Chat transcript, seeded with the assistant greeting.
    transcript: Mutex<Vec<ChatMessage>>,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
}

impl CoreState {
    pub fn new() -> Self {
        Self {
            analysis: Mutex::new(None),
            transcript: Mutex::new(vec![ChatMessage::assistant(chat::GREETING)]),
        }
    }

    // ── Analysis workspace ──────────────────────────────────

    /// Replace the current record with a fresh analysis result.
    pub fn set_analysis(&self, record: MedicineRecord) -> Result<(), CoreError> {
        *self.lock_analysis()? = Some(record);
        Ok(())
    }

    /// Clone of the current record, if any analysis has run.
    pub fn current_analysis(&self) -> Result<Option<MedicineRecord>, CoreError> {
        Ok(self.lock_analysis()?.clone())
    }

    /// Mutate the current record in place; returns the updated clone, or
    /// `None` when no analysis exists yet.
    pub fn with_analysis_mut<F>(&self, f: F) -> Result<Option<MedicineRecord>, CoreError>
    where
        F: FnOnce(&mut MedicineRecord),
    {
        let mut guard = self.lock_analysis()?;
        match guard.as_mut() {
            Some(record) => {
                f(record);
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    // ── Chat transcript ─────────────────────────────────────

    /// Append one message, preserving send order.
    pub fn push_message(&self, message: ChatMessage) -> Result<(), CoreError> {
        self.lock_transcript()?.push(message);
        Ok(())
    }

    /// Snapshot of the full transcript.
    pub fn transcript(&self) -> Result<Vec<ChatMessage>, CoreError> {
        Ok(self.lock_transcript()?.clone())
    }

    // ── Internal ────────────────────────────────────────────

    fn lock_analysis(&self) -> Result<MutexGuard<'_, Option<MedicineRecord>>, CoreError> {
        self.analysis.lock().map_err(|_| CoreError::LockPoisoned)
    }

    fn lock_transcript(&self) -> Result<MutexGuard<'_, Vec<ChatMessage>>, CoreError> {
        self.transcript.lock().map_err(|_| CoreError::LockPoisoned)
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}
