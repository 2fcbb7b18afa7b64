//! Common fixtures: addresses, pool keys and funded flows

use flash_amm::{
    Address, BalanceDelta, Currency, EngineConfig, EngineResult, ModifyLiquidityParams, PoolKey,
    PoolManager, SwapDirection, SwapOutcome, SwapParams, Q64,
};

use super::host::MockHost;

pub const DEFAULT_FEE: u32 = 3000;
pub const DEFAULT_TICK_SPACING: i32 = 10;
pub const DEEP_LIQUIDITY: i128 = 1_000_000_000_000;

pub fn alice() -> Address {
    Address::with_low_bits(0xa1, 0)
}

pub fn bob() -> Address {
    Address::with_low_bits(0xb0, 0)
}

pub fn lp() -> Address {
    Address::with_low_bits(0x1f, 0)
}

pub fn token0() -> Currency {
    Currency(Address::with_low_bits(0x10, 0))
}

pub fn token1() -> Currency {
    Currency(Address::with_low_bits(0x20, 0))
}

pub fn default_key() -> PoolKey {
    PoolKey {
        currency0: token0(),
        currency1: token1(),
        fee: DEFAULT_FEE,
        tick_spacing: DEFAULT_TICK_SPACING,
        hooks: Address::ZERO,
    }
}

pub fn manager() -> PoolManager<MockHost> {
    super::init_test_tracing();
    PoolManager::new(MockHost::default(), EngineConfig::default(), Address::ZERO)
        .expect("default config is valid")
}

pub fn position(tick_lower: i32, tick_upper: i32, liquidity_delta: i128) -> ModifyLiquidityParams {
    ModifyLiquidityParams {
        tick_lower,
        tick_upper,
        liquidity_delta,
        salt: [0u8; 32],
    }
}

/// Pay every negative entry of `delta` into the manager and take every
/// positive one out
pub fn settle_delta(
    manager: &mut PoolManager<MockHost>,
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

/// Initialize `key` at price 1 and fund a position over [tick_lower, tick_upper]
pub fn seed_pool(
    manager: &mut PoolManager<MockHost>,
    key: PoolKey,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: i128,
) {
    manager
        .initialize(lp(), key, Q64)
        .expect("pool initializes");
    add_liquidity(manager, key, tick_lower, tick_upper, liquidity);
}

pub fn add_liquidity(
    manager: &mut PoolManager<MockHost>,
    key: PoolKey,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: i128,
) {
    manager
        .unlock(lp(), &[], |m, _| {
            let (delta, _) = m.modify_liquidity(lp(), key, position(tick_lower, tick_upper, liquidity))?;
            settle_delta(m, lp(), &key, delta)?;
            Ok(vec![])
        })
        .expect("liquidity funded");
}

/// Swap inside its own scope and settle it in full
pub fn swap(
    manager: &mut PoolManager<MockHost>,
    trader: Address,
    key: PoolKey,
    params: SwapParams,
) -> EngineResult<SwapOutcome> {
    let mut outcome = None;
    manager.unlock(trader, &[], |m, _| {
        let result = m.swap(trader, key, params)?;
        settle_delta(m, trader, &key, result.delta)?;
        outcome = Some(result);
        Ok(vec![])
    })?;
    Ok(outcome.expect("callback ran"))
}

pub fn sell(manager: &mut PoolManager<MockHost>, trader: Address, amount0: u64) -> SwapOutcome {
    swap(
        manager,
        trader,
        default_key(),
        SwapParams::exact_input(SwapDirection::ZeroForOne, amount0),
    )
    .expect("sell executes")
}

pub fn buy(manager: &mut PoolManager<MockHost>, trader: Address, amount1: u64) -> SwapOutcome {
    swap(
        manager,
        trader,
        default_key(),
        SwapParams::exact_input(SwapDirection::OneForZero, amount1),
    )
    .expect("buy executes")
}

/// Token1 per token0 of a fill, scaled by 1e12
pub fn fill_price(outcome: &SwapOutcome) -> u128 {
    let amount0 = outcome.delta.amount0.unsigned_abs();
    let amount1 = outcome.delta.amount1.unsigned_abs();
    amount1 * 1_000_000_000_000 / amount0
}
