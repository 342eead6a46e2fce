//! Integration tests for cart mutations and derived totals.

use rust_decimal::{Decimal, dec};
use testresult::TestResult;

use cartkit::{
    pricing::total_price,
    products::{LineId, ProductSnapshot},
    storage::MemoryStorage,
    store::{CartStore, ChangeKind},
};

fn product(id: u64, title: &str, price: Decimal) -> ProductSnapshot {
    ProductSnapshot::new(id, title, price, format!("/images/{id}.jpg"))
}

#[test]
fn adding_same_product_twice_merges_into_one_line() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    assert_eq!(store.add_item(product(1, "A", dec!(10.00)))?, ChangeKind::ItemAdded);
    assert_eq!(
        store.add_item(product(1, "A", dec!(10.00)))?,
        ChangeKind::QuantityUpdated
    );

    assert_eq!(store.cart().len(), 1);
    assert_eq!(store.cart().get(LineId(1)).map(|line| line.quantity), Some(2));
    assert_eq!(store.total(), dec!(20.00));
    assert_eq!(store.item_count(), 2);

    Ok(())
}

#[test]
fn removing_a_line_leaves_the_others() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    store.add_item(product(1, "A", dec!(5)))?;
    store.add_item(product(2, "B", dec!(7.5)))?;

    assert!(store.remove_item(LineId(1))?);

    let ids: Vec<LineId> = store.cart().iter().map(|line| line.id).collect();

    assert_eq!(ids, vec![LineId(2)]);
    assert_eq!(store.total(), dec!(7.5));

    Ok(())
}

#[test]
fn item_count_tracks_every_add() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    let ids = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];

    for (n, id) in ids.iter().enumerate() {
        store.add_item(product(*id, "P", dec!(1.25)))?;

        assert_eq!(store.item_count(), u64::try_from(n + 1)?);
    }

    let mut distinct = ids.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    assert_eq!(store.cart().len(), distinct.len());

    Ok(())
}

#[test]
fn lines_keep_add_order() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    for id in [30, 10, 20] {
        store.add_item(product(id, "P", dec!(1)))?;
    }

    store.add_item(product(10, "P", dec!(1)))?;

    let ids: Vec<u64> = store.cart().iter().map(|line| line.id.0).collect();

    assert_eq!(ids, vec![30, 10, 20]);

    Ok(())
}

#[test]
fn total_matches_independent_recomputation() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    store.add_item(product(1, "A", dec!(3.99)))?;
    store.add_item(product(2, "B", dec!(0.01)))?;
    store.add_item(product(1, "A", dec!(3.99)))?;
    store.update_quantity(LineId(2), 4)?;
    store.add_item(product(3, "C", dec!(120)))?;
    store.update_quantity(LineId(3), -1)?;

    let expected = store
        .cart()
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum::<Decimal>();

    assert_eq!(store.total(), expected);
    assert_eq!(store.total(), total_price(store.cart()));
    assert_eq!(store.total(), dec!(8.03));

    Ok(())
}

#[test]
fn decrementing_by_full_quantity_removes_line() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    store.add_item(product(8, "H", dec!(2)))?;
    store.add_item(product(8, "H", dec!(2)))?;
    store.add_item(product(8, "H", dec!(2)))?;

    assert_eq!(store.update_quantity(LineId(8), -3)?, ChangeKind::ItemRemoved);
    assert!(store.cart().get(LineId(8)).is_none());

    for delta in [1, -1, 10] {
        assert_eq!(store.update_quantity(LineId(8), delta)?, ChangeKind::NotFound);
    }

    Ok(())
}

#[test]
fn negative_prices_pass_through() -> TestResult {
    let mut store = CartStore::new(MemoryStorage::new());

    store.add_item(product(1, "Item", dec!(10)))?;
    store.add_item(product(2, "Voucher", dec!(-2.5)))?;

    assert_eq!(store.total(), dec!(7.5));

    Ok(())
}

#[test]
fn empty_store_reports_zero() {
    let mut store = CartStore::new(MemoryStorage::new());

    assert!(store.load().is_empty());
    assert_eq!(store.total(), Decimal::ZERO);
    assert_eq!(store.item_count(), 0);
}
