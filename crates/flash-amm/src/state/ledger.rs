//! Flash accounting ledger.
//!
//! Every balance-moving operation inside a scope writes a signed amount per
//! (currency, owner). Negative entries are owed to the pool manager, positive
//! entries are owed to the owner. The scope may only close once every entry
//! has netted back to zero, which is checked through a counter rather than a
//! scan.

use std::collections::HashMap;
use std::ops::{Add, Neg};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::address::{Address, Currency};
use crate::error::{EngineError, EngineResult};

/// Signed token amounts for a pool's two currencies, seen from the caller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceDelta {
    pub amount0: i128,
    pub amount1: i128,
}

impl BalanceDelta {
    pub const ZERO: BalanceDelta = BalanceDelta {
        amount0: 0,
        amount1: 0,
    };

    pub const fn new(amount0: i128, amount1: i128) -> Self {
        Self { amount0, amount1 }
    }

    pub fn checked_add(self, other: BalanceDelta) -> EngineResult<BalanceDelta> {
        Ok(BalanceDelta {
            amount0: self
                .amount0
                .checked_add(other.amount0)
                .ok_or(EngineError::DeltaOverflow)?,
            amount1: self
                .amount1
                .checked_add(other.amount1)
                .ok_or(EngineError::DeltaOverflow)?,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.amount0 == 0 && self.amount1 == 0
    }
}

impl Add for BalanceDelta {
    type Output = BalanceDelta;

    /// Saturating; use `checked_add` where overflow must be reported
    fn add(self, other: BalanceDelta) -> BalanceDelta {
        BalanceDelta {
            amount0: self.amount0.saturating_add(other.amount0),
            amount1: self.amount1.saturating_add(other.amount1),
        }
    }
}

impl Neg for BalanceDelta {
    type Output = BalanceDelta;

    fn neg(self) -> BalanceDelta {
        BalanceDelta {
            amount0: self.amount0.saturating_neg(),
            amount1: self.amount1.saturating_neg(),
        }
    }
}

/// Outstanding per-(currency, owner) amounts for the current scope
#[derive(Clone, Debug, Default)]
pub struct DeltaLedger {
    entries: HashMap<(Currency, Address), i128>,
    nonzero_count: usize,
}

impl DeltaLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current signed amount for an owner, zero when absent
    pub fn get(&self, currency: Currency, owner: Address) -> i128 {
        self.entries.get(&(currency, owner)).copied().unwrap_or(0)
    }

    /// Number of entries that have not netted to zero
    pub fn nonzero_count(&self) -> usize {
        self.nonzero_count
    }

    /// Add `delta` to the owner's entry
    pub fn apply(&mut self, currency: Currency, owner: Address, delta: i128) -> EngineResult<()> {
        if delta == 0 {
            return Ok(());
        }
        let previous = self.get(currency, owner);
        let next = previous
            .checked_add(delta)
            .ok_or(EngineError::DeltaOverflow)?;
        self.write(currency, owner, previous, next);
        Ok(())
    }

    /// Apply a pool's two-currency delta to one owner. Both sums are checked
    /// before either entry is written.
    pub fn apply_pair(
        &mut self,
        currency0: Currency,
        currency1: Currency,
        delta: BalanceDelta,
        owner: Address,
    ) -> EngineResult<()> {
        let previous0 = self.get(currency0, owner);
        let next0 = previous0
            .checked_add(delta.amount0)
            .ok_or(EngineError::DeltaOverflow)?;

        // Same currency on both legs only happens through malformed keys, but
        // the second leg must still see the first one's write
        let previous1 = if currency1 == currency0 {
            next0
        } else {
            self.get(currency1, owner)
        };
        let next1 = previous1
            .checked_add(delta.amount1)
            .ok_or(EngineError::DeltaOverflow)?;

        self.write(currency0, owner, previous0, next0);
        self.write(currency1, owner, previous1, next1);
        Ok(())
    }

    /// Drop every entry. Only valid once the scope has been abandoned.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.nonzero_count = 0;
    }

    fn write(&mut self, currency: Currency, owner: Address, previous: i128, next: i128) {
        if previous == next {
            return;
        }
        if next == 0 {
            self.entries.remove(&(currency, owner));
            self.nonzero_count -= 1;
        } else {
            if previous == 0 {
                self.nonzero_count += 1;
            }
            self.entries.insert((currency, owner), next);
        }
        debug!(
            currency = %currency,
            owner = %owner,
            previous,
            next,
            nonzero = self.nonzero_count,
            "delta updated"
        );
    }
}
