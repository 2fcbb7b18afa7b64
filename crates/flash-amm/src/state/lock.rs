/// Settlement scope guarding reentrancy into `unlock`. The scope is Open only
/// while a caller-supplied callback runs; balance-moving operations are
/// rejected outside it.
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

// ============================================================================
// Lock Status Types
// ============================================================================

/// Lock scope status flags
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockStatus {
    /// No callback in progress
    #[default]
    Closed = 0,
    /// A callback is running and may move balances
    Open = 1,
}

// ============================================================================
// Lock Scope
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LockScope {
    status: LockStatus,
}

impl LockScope {
    /// Transition Closed -> Open
    pub fn open(&mut self) -> EngineResult<()> {
        match self.status {
            LockStatus::Closed => {
                self.status = LockStatus::Open;
                debug!("lock scope opened");
                Ok(())
            }
            LockStatus::Open => Err(EngineError::AlreadyOpen),
        }
    }

    /// Transition back to Closed. Closing an already closed scope is a no-op.
    pub fn close(&mut self) {
        if self.status == LockStatus::Open {
            debug!("lock scope closed");
        }
        self.status = LockStatus::Closed;
    }

    pub fn status(&self) -> LockStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == LockStatus::Open
    }

    /// Gate for operations that only make sense inside a scope
    pub fn ensure_open(&self) -> EngineResult<()> {
        if !self.is_open() {
            return Err(EngineError::ScopeNotOpen);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
