//! Live counter tests

use std::sync::Arc;
use std::thread;

use coffee_sim_core::{DispatchRules, LiveShop, OrderError, OrderStatus};

#[test]
fn test_counter_opens_at_seven() {
    let shop = LiveShop::open(2, DispatchRules::default());
    assert_eq!(shop.current_minute(), 0);
    assert_eq!(shop.wall_clock(), "07:00");

    shop.advance_tick();
    assert_eq!(shop.wall_clock(), "07:01");
}

#[test]
fn test_placed_order_is_visible_then_served() {
    let shop = LiveShop::open(1, DispatchRules::default());
    let id = shop.place_order(&["CAPPUCCINO"], false).unwrap();

    let waiting = shop.waiting_orders();
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].id(), id);
    assert_eq!(waiting[0].status(), OrderStatus::Pending);

    let tick = shop.advance_tick();
    assert_eq!(tick.num_assigned, 1);
    assert!(shop.waiting_orders().is_empty());

    let preparing = shop.in_preparation();
    assert_eq!(preparing.len(), 1);
    assert_eq!(preparing[0].status(), OrderStatus::Assigned);
    assert_eq!(preparing[0].barista_id(), Some(1));
}

#[test]
fn test_finished_orders_are_reported_once() {
    let shop = LiveShop::open(1, DispatchRules::default());
    shop.place_order(&["COLD_BREW"], true).unwrap();

    // Assigned at minute 1, one minute of preparation, done at minute 2
    shop.advance_tick();
    assert!(shop.take_finished().is_empty());

    let tick = shop.advance_tick();
    assert_eq!(tick.num_completed, 1);

    let finished = shop.take_finished();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].status(), OrderStatus::Completed);

    // Report-once: the order is pruned from the live view
    assert!(shop.take_finished().is_empty());
    assert!(shop.in_preparation().is_empty());
}

#[test]
fn test_rejects_bad_placements() {
    let shop = LiveShop::open(1, DispatchRules::default());

    assert_eq!(shop.place_order(&[], false), Err(OrderError::EmptyOrder));
    assert_eq!(
        shop.place_order(&["ESPRESSO", "PUMPKIN_SPICE"], false),
        Err(OrderError::InvalidDrinkKind {
            name: "PUMPKIN_SPICE".to_string()
        })
    );
    // A failed placement consumes no ID
    assert_eq!(shop.place_order(&["ESPRESSO"], false).unwrap(), 1);
}

#[test]
fn test_ids_never_repeat_after_walkouts() {
    let shop = LiveShop::open(0, DispatchRules::default());
    let first = shop.place_order(&["LATTE"], false).unwrap();

    // No baristas: the customer walks out at the patience limit
    for _ in 0..8 {
        shop.advance_tick();
    }
    assert_eq!(shop.abandoned_count(), 1);
    assert!(shop.waiting_orders().is_empty());

    let second = shop.place_order(&["LATTE"], false).unwrap();
    assert!(second > first, "order IDs must never be reused");
}

#[test]
fn test_impatient_regular_walks_out_live() {
    let shop = LiveShop::open(1, DispatchRules::default());
    // Eleven minutes of drinks occupy the barista
    shop.place_order(&["SPECIALTY", "CAPPUCCINO", "COLD_BREW"], true)
        .unwrap();
    shop.advance_tick();

    let regular = shop.place_order(&["ESPRESSO"], false).unwrap();

    for _ in 0..7 {
        let tick = shop.advance_tick();
        assert_eq!(tick.num_abandoned, 0);
    }

    // Placed at minute 1, patience runs out at minute 9
    let tick = shop.advance_tick();
    assert_eq!(tick.num_abandoned, 1);
    assert_eq!(shop.abandoned_count(), 1);
    assert!(shop.waiting_orders().iter().all(|o| o.id() != regular));
}

#[test]
fn test_estimate_wait_grows_with_the_clock() {
    let shop = LiveShop::open(0, DispatchRules::default());
    // Loyalty member, so the order stays queued as the clock moves
    let id = shop.place_order(&["LATTE", "ESPRESSO"], true).unwrap();

    // 6 minutes of preparation, no elapsed wait yet
    assert_eq!(shop.estimate_wait(id), Some(6));

    shop.advance_tick();
    shop.advance_tick();
    assert_eq!(shop.estimate_wait(id), Some(8));

    assert_eq!(shop.estimate_wait(999), None);
}

#[test]
fn test_explanations_follow_queue_position() {
    let shop = LiveShop::open(0, DispatchRules::default());
    let id = shop.place_order(&["AMERICANO"], true).unwrap();

    let explanation = shop.explain(id).unwrap();
    assert_eq!(explanation, "standard");

    // After 11 minutes a loyalty member scores 100, over the display threshold
    for _ in 0..11 {
        shop.advance_tick();
    }
    let explanation = shop.explain(id).unwrap();
    assert_eq!(explanation, "high priority");

    assert_eq!(shop.explain(12345), None);
}

#[test]
fn test_concurrent_placements_all_land() {
    let shop = Arc::new(LiveShop::open(3, DispatchRules::default()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shop = Arc::clone(&shop);
            thread::spawn(move || shop.place_order(&["ESPRESSO"], false).unwrap())
        })
        .collect();

    let mut ids: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 8, "every concurrent placement got a distinct ID");
    assert_eq!(shop.waiting_orders().len(), 8);
}

#[test]
fn test_snapshot_is_ranked_best_first() {
    let shop = LiveShop::open(0, DispatchRules::default());
    let regular = shop.place_order(&["LATTE"], false).unwrap();
    let loyal = shop.place_order(&["LATTE"], true).unwrap();

    shop.advance_tick();

    let waiting = shop.waiting_orders();
    assert_eq!(waiting[0].id(), loyal);
    assert_eq!(waiting[1].id(), regular);
    assert!(waiting[0].priority_score() > waiting[1].priority_score());
}
