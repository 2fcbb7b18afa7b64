//! In-memory host: token custody, a settable window clock and recorded hook
//! callbacks

use std::collections::HashMap;

use flash_amm::{
    Address, BalanceDelta, Currency, EngineError, EngineResult, Host, ModifyLiquidityParams,
    PoolKey,
};

#[derive(Debug, Default)]
pub struct MockHost {
    pub balances: HashMap<Currency, u128>,
    /// Wallet balances of everyone the manager paid out to
    pub received: HashMap<(Currency, Address), u128>,
    pub protocol_fee: u32,
    pub window: u64,
    pub reject_after_initialize: bool,
    pub initialize_calls: Vec<PoolKey>,
    pub liquidity_calls: Vec<(Address, BalanceDelta)>,
}

impl MockHost {
    pub fn deposit(&mut self, currency: Currency, amount: u128) {
        *self.balances.entry(currency).or_default() += amount;
    }

    pub fn received(&self, currency: Currency, who: Address) -> u128 {
        self.received.get(&(currency, who)).copied().unwrap_or(0)
    }

    pub fn advance_window(&mut self) {
        self.window += 1;
    }
}

impl Host for MockHost {
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
            .ok_or_else(|| EngineError::host(format!("manager holds too little {currency}")))?;
        *self.received.entry((currency, to)).or_default() += amount;
        Ok(())
    }

    fn current_window(&self) -> u64 {
        self.window
    }

    fn before_initialize(
        &mut self,
        _sender: Address,
        key: &PoolKey,
        _sqrt_price_x64: u128,
    ) -> EngineResult<()> {
        self.initialize_calls.push(*key);
        Ok(())
    }

    fn after_initialize(
        &mut self,
        _sender: Address,
        _key: &PoolKey,
        _sqrt_price_x64: u128,
        _tick: i32,
    ) -> EngineResult<()> {
        if self.reject_after_initialize {
            return Err(EngineError::host("after_initialize rejected"));
        }
        Ok(())
    }

    fn after_modify_liquidity(
        &mut self,
        sender: Address,
        _key: &PoolKey,
        _params: &ModifyLiquidityParams,
        delta: BalanceDelta,
        _fees_accrued: BalanceDelta,
    ) -> EngineResult<()> {
        self.liquidity_calls.push((sender, delta));
        Ok(())
    }
}
