//! In-memory host and fixtures shared by unit tests.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::constants::Q64;
use crate::error::{EngineError, EngineResult};
use crate::host::Host;
use crate::manager::PoolManager;
use crate::state::{Address, BalanceDelta, Currency, ModifyLiquidityParams, PoolKey};

#[derive(Debug, Default)]
pub struct TestHost {
    pub balances: HashMap<Currency, u128>,
    pub protocol_fee: u32,
    pub window: u64,
    pub transfers: Vec<(Currency, Address, u128)>,
}

impl TestHost {
    /// Simulate a payment into the manager
    pub fn deposit(&mut self, currency: Currency, amount: u128) {
        *self.balances.entry(currency).or_default() += amount;
    }
}

impl Host for TestHost {
    fn protocol_fee(&self, _key: &PoolKey) -> u32 {
        self.protocol_fee
    }

    fn balance_of_self(&self, currency: Currency) -> u128 {
        self.balances.get(&currency).copied().unwrap_or(0)
    }

    fn transfer(&mut self, currency: Currency, to: Address, amount: u128) -> EngineResult<()> {
        let balance = self.balances.entry(currency).or_default();
        *balance = balance
            .checked_sub(amount)
            .ok_or_else(|| EngineError::host(format!("insufficient {currency} balance")))?;
        self.transfers.push((currency, to, amount));
        Ok(())
    }

    fn current_window(&self) -> u64 {
        self.window
    }
}

pub fn token(low: u8) -> Currency {
    Currency(Address::with_low_bits(low, 0))
}

pub fn pool_key(fee: u32, tick_spacing: i32, hooks: Address) -> PoolKey {
    PoolKey {
        currency0: token(0x01),
        currency1: token(0x02),
        fee,
        tick_spacing,
        hooks,
    }
}

pub fn new_manager() -> PoolManager<TestHost> {
    PoolManager::new(TestHost::default(), EngineConfig::default(), Address::ZERO).unwrap()
}

/// Pay what `owner` owes and take what it is owed, so the scope can close
pub fn settle_delta(
    manager: &mut PoolManager<TestHost>,
    owner: Address,
    key: &PoolKey,
    delta: BalanceDelta,
) -> EngineResult<()> {
    for (currency, amount) in [(key.currency0, delta.amount0), (key.currency1, delta.amount1)] {
        if amount < 0 {
            let owed = amount.unsigned_abs();
            manager.sync(currency)?;
            manager.host_mut().deposit(currency, owed);
            let value = if currency.is_native() { owed } else { 0 };
            manager.settle(owner, value)?;
        } else if amount > 0 {
            manager.take(owner, currency, owner, amount as u128)?;
        }
    }
    Ok(())
}

/// Initialize `key` at price 1 and fund a position over [lower, upper]
pub fn seeded_pool(
    manager: &mut PoolManager<TestHost>,
    key: PoolKey,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: i128,
) {
    let lp = Address::with_low_bits(0x0b, 0);
    manager.initialize(Address::ZERO, key, Q64).unwrap();
    manager
        .unlock(lp, &[], |m, _| {
            let params = ModifyLiquidityParams {
                tick_lower,
                tick_upper,
                liquidity_delta: liquidity,
                salt: [0u8; 32],
            };
            let (delta, _) = m.modify_liquidity(lp, key, params)?;
            settle_delta(m, lp, &key, delta)?;
            Ok(vec![])
        })
        .unwrap();
}
