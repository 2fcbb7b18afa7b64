//! Same-window pricing against the checkpoint and window rollover

mod common;

use common::*;
use flash_amm::{EngineEvent, PoolKey, PoolManager, SwapDirection, SwapParams};

const ONE: u128 = 1_000_000_000_000;

fn seeded() -> PoolManager<MockHost> {
    let mut manager = manager();
    seed_pool(&mut manager, default_key(), -600, 600, DEEP_LIQUIDITY);
    manager
}

fn attacker() -> flash_amm::Address {
    flash_amm::Address::with_low_bits(0xee, 0)
}

#[test]
fn buy_then_sell_fills_at_or_below_checkpoint() {
    let mut manager = seeded();
    let id = default_key().to_id();
    let p0 = manager.slot0(&id).unwrap().sqrt_price_x64;

    buy(&mut manager, alice(), 1_000_000_000);
    assert!(manager.slot0(&id).unwrap().sqrt_price_x64 > p0);

    let sold = sell(&mut manager, bob(), 100_000_000);
    assert!(fill_price(&sold) <= ONE);

    let window = manager.window_state(&id).unwrap();
    assert_eq!(window.checkpoint.sqrt_price_x64, p0);
    assert!(window.shadow.bid.sqrt_price_x64 <= p0);
}

#[test]
fn sandwich_around_victim_is_unprofitable() {
    let mut manager = seeded();

    let front = buy(&mut manager, attacker(), 1_000_000_000);
    let spent1 = front.delta.amount1.unsigned_abs();
    let bought0 = front.delta.amount0 as u64;

    buy(&mut manager, alice(), 1_000_000_000);

    let back = sell(&mut manager, attacker(), bought0);
    let received1 = back.delta.amount1.unsigned_abs();
    assert!(received1 < spent1);
}

#[test]
fn sell_then_buy_pays_at_least_checkpoint() {
    let mut manager = seeded();
    sell(&mut manager, alice(), 2_000_000_000);

    let bought = buy(&mut manager, bob(), 50_000_000);
    assert!(fill_price(&bought) >= ONE);

    let window = manager.window_state(&default_key().to_id()).unwrap();
    assert!(window.shadow.offer.sqrt_price_x64 >= window.checkpoint.sqrt_price_x64);
}

#[test]
fn sell_beyond_synthetic_depth_walks_bid_curve() {
    let mut manager = seeded();
    let id = default_key().to_id();
    buy(&mut manager, alice(), 1_000_000);

    let sold = sell(&mut manager, bob(), 1_000_000_000);
    assert!(fill_price(&sold) < ONE);

    let window = manager.window_state(&id).unwrap();
    assert_eq!(window.shadow.synthetic_bid, 0);
    assert!(window.shadow.bid.sqrt_price_x64 < window.checkpoint.sqrt_price_x64);
}

#[test]
fn same_direction_flow_prices_like_base() {
    let mut guarded = seeded();
    buy(&mut guarded, alice(), 500_000_000);
    let shadowed = buy(&mut guarded, bob(), 500_000_000);

    let mut control = seeded();
    buy(&mut control, alice(), 500_000_000);
    control.host_mut().advance_window();
    let unguarded = buy(&mut control, bob(), 500_000_000);

    assert_eq!(shadowed.delta, unguarded.delta);
}

#[test]
fn shadow_pricing_is_flagged_on_events() {
    let mut manager = seeded();
    manager.drain_events();

    buy(&mut manager, alice(), 1_000_000);
    sell(&mut manager, bob(), 1_000_000);

    let flags: Vec<bool> = manager
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::Swap(swap) => Some(swap.shadow),
            _ => None,
        })
        .collect();
    assert_eq!(flags, vec![false, true]);
}

#[test]
fn new_window_rebuilds_from_base() {
    let mut manager = seeded();
    let id = default_key().to_id();

    buy(&mut manager, alice(), 10_000_000_000);
    sell(&mut manager, bob(), 10_000_000);
    let moved = manager.slot0(&id).unwrap();

    manager.host_mut().advance_window();
    manager.drain_events();
    let sold = sell(&mut manager, bob(), 10_000_000);

    let window = manager.window_state(&id).unwrap();
    assert_eq!(window.key, 1);
    assert_eq!(window.checkpoint.sqrt_price_x64, moved.sqrt_price_x64);
    assert_eq!(window.checkpoint.tick, moved.tick);
    assert_eq!(window.shadow.synthetic_bid, 0);
    assert!(window.shadow.synthetic_offer > 0);

    // The base price sits above 1 after the buy, so a base-priced sell beats it
    assert!(fill_price(&sold) > ONE);
    assert!(matches!(
        manager.drain_events().as_slice(),
        [EngineEvent::Swap(swap)] if !swap.shadow
    ));
}

#[test]
fn exact_output_sell_in_window_respects_checkpoint() {
    let mut manager = seeded();
    buy(&mut manager, alice(), 1_000_000_000);

    let outcome = swap(
        &mut manager,
        bob(),
        default_key(),
        SwapParams::exact_output(SwapDirection::ZeroForOne, 5_000_000),
    )
    .unwrap();
    assert_eq!(outcome.delta.amount1, 5_000_000);
    assert!(fill_price(&outcome) <= ONE);
}

#[test]
fn lp_withdrawal_stays_backed_after_same_window_round_trips() {
    let mut manager = manager();
    let key = PoolKey {
        fee: 0,
        ..default_key()
    };
    seed_pool(&mut manager, key, -600, 600, DEEP_LIQUIDITY);

    swap(
        &mut manager,
        alice(),
        key,
        SwapParams::exact_input(SwapDirection::OneForZero, 20_000_000_000),
    )
    .unwrap();
    for _ in 0..20 {
        let sold = swap(
            &mut manager,
            attacker(),
            key,
            SwapParams::exact_input(SwapDirection::ZeroForOne, 1_000_000_000),
        )
        .unwrap();
        swap(
            &mut manager,
            attacker(),
            key,
            SwapParams::exact_input(SwapDirection::OneForZero, sold.delta.amount1 as u64),
        )
        .unwrap();
    }

    // Base moved more than the shadow paid out; the difference went to the LP
    let (growth0, growth1) = manager.fee_growth_globals(&key.to_id()).unwrap();
    assert!(growth0 > 0 || growth1 > 0);

    let result = manager.unlock(lp(), &[], |m, _| {
        let (delta, _) = m.modify_liquidity(lp(), key, position(-600, 600, -DEEP_LIQUIDITY))?;
        settle_delta(m, lp(), &key, delta)?;
        Ok(vec![])
    });
    assert!(result.is_ok(), "withdrawal failed: {result:?}");
    assert_eq!(manager.liquidity(&key.to_id()), Some(0));
}

#[test]
fn liquidity_added_mid_window_reaches_shadow_cursors() {
    let mut manager = seeded();
    let id = default_key().to_id();
    buy(&mut manager, alice(), 1_000_000_000);
    let before = *manager.window_state(&id).unwrap();

    add_liquidity(&mut manager, default_key(), -1200, 1200, DEEP_LIQUIDITY);
    let after = *manager.window_state(&id).unwrap();
    let added = DEEP_LIQUIDITY as u128;
    assert_eq!(after.shadow.bid.liquidity, before.shadow.bid.liquidity + added);
    assert_eq!(after.shadow.offer.liquidity, before.shadow.offer.liquidity + added);
    assert_eq!(after.checkpoint, before.checkpoint);

    // A range neither cursor sits in leaves the shadow alone
    add_liquidity(&mut manager, default_key(), 1200, 1800, DEEP_LIQUIDITY);
    assert_eq!(*manager.window_state(&id).unwrap(), after);

    // Walking the bid past synthetic depth prices against both ranges
    let sold = sell(&mut manager, bob(), 30_000_000_000);
    assert!(fill_price(&sold) < ONE);
    let window = manager.window_state(&id).unwrap();
    assert!(window.shadow.bid.tick > -600);
    assert_eq!(window.shadow.bid.liquidity, 2 * added);
}
