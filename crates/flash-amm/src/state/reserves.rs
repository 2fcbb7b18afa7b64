//! Pending balance-diff settlement record.

use super::address::Currency;
use crate::error::{EngineError, EngineResult};

/// Currency being settled by balance difference and its baseline balance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncedReserve {
    pub currency: Currency,
    pub baseline: u128,
}

/// At most one pending sync per scope
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReserveSync {
    pending: Option<SyncedReserve>,
}

impl ReserveSync {
    pub fn pending(&self) -> Option<SyncedReserve> {
        self.pending
    }

    /// Record a baseline. Re-syncing the same currency refreshes it; syncing a
    /// different one while a sync is pending is rejected.
    pub fn record(&mut self, currency: Currency, baseline: u128) -> EngineResult<()> {
        if let Some(pending) = self.pending {
            if pending.currency != currency {
                return Err(EngineError::AlreadySynced);
            }
        }
        self.pending = Some(SyncedReserve { currency, baseline });
        Ok(())
    }

    /// Amount received since the baseline, given the current balance
    pub fn paid_since(reserve: &SyncedReserve, balance_now: u128) -> EngineResult<u128> {
        balance_now
            .checked_sub(reserve.baseline)
            .ok_or(EngineError::ReserveDecreased)
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
