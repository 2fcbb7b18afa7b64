//! Balance settlement inside an open scope: sync, take, settle, settle_for
//! and clear.

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::host::Host;
use crate::manager::PoolManager;
use crate::state::{Address, Currency, ReserveSync};

impl<H: Host> PoolManager<H> {
    /// Record the manager's current balance of `currency` as the baseline
    /// for the next `settle`. The native currency needs no baseline.
    pub fn sync(&mut self, currency: Currency) -> EngineResult<()> {
        self.state.lock.ensure_open()?;
        if currency.is_native() {
            return Ok(());
        }

        let baseline = self.host.balance_of_self(currency);
        self.state.reserves.record(currency, baseline)?;
        debug!(currency = %currency, baseline, "reserves synced");
        Ok(())
    }

    /// Withdraw `amount` of `currency` to `to`, debiting the sender
    pub fn take(
        &mut self,
        sender: Address,
        currency: Currency,
        to: Address,
        amount: u128,
    ) -> EngineResult<()> {
        self.state.lock.ensure_open()?;
        let delta = to_delta(amount)?;
        self.state.ledger.apply(currency, sender, -delta)?;
        self.host.transfer(currency, to, amount)?;
        debug!(currency = %currency, to = %to, amount, "taken");
        Ok(())
    }

    /// Credit the sender with what was paid since the last `sync`, or with
    /// `value` for the native currency
    pub fn settle(&mut self, sender: Address, value: u128) -> EngineResult<u128> {
        self.settle_for(sender, sender, value)
    }

    /// Settle on behalf of `recipient`
    pub fn settle_for(
        &mut self,
        sender: Address,
        recipient: Address,
        value: u128,
    ) -> EngineResult<u128> {
        self.state.lock.ensure_open()?;

        let (currency, paid) = match self.state.reserves.pending() {
            None => (Currency::NATIVE, value),
            Some(reserve) => {
                if value != 0 {
                    return Err(EngineError::UnexpectedNativeValue);
                }
                let balance = self.host.balance_of_self(reserve.currency);
                let paid = ReserveSync::paid_since(&reserve, balance)?;
                (reserve.currency, paid)
            }
        };

        self.state.ledger.apply(currency, recipient, to_delta(paid)?)?;
        self.state.reserves.clear();
        debug!(
            sender = %sender,
            recipient = %recipient,
            currency = %currency,
            paid,
            "settled"
        );
        Ok(paid)
    }

    /// Forfeit a positive delta. `amount` must match it exactly.
    pub fn clear(&mut self, sender: Address, currency: Currency, amount: u128) -> EngineResult<()> {
        self.state.lock.ensure_open()?;
        let current = self.state.ledger.get(currency, sender);
        let amount = i128::try_from(amount).map_err(|_| EngineError::MustClearExactPositiveDelta)?;
        if amount != current {
            return Err(EngineError::MustClearExactPositiveDelta);
        }
        self.state.ledger.apply(currency, sender, -amount)?;
        debug!(sender = %sender, currency = %currency, amount, "cleared");
        Ok(())
    }
}

fn to_delta(amount: u128) -> EngineResult<i128> {
    i128::try_from(amount).map_err(|_| EngineError::DeltaOverflow)
}
