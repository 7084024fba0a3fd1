//! Integration tests for order fan-out and status propagation, driven
//! through the signal dispatcher the way a transport would drive it.

use common::{Money, OrderId, SellerId};
use domain::{
    FulfillmentStatus, LineItem, LineItemTotals, Order, OrderStatus, PaymentStatus, StatusTriple,
};
use fanout::{
    FanOutError, OrderSignal, PropagationOutcome, SignalDispatcher, SignalOutcome, SplitConfig,
    SplitOutcome, UnassignedItemPolicy,
};
use order_store::{InMemoryOrderStore, OrderStore};

fn line_item(seller: Option<SellerId>, subtotal: i64, tax: i64) -> LineItem {
    LineItem::new(
        "PROD-1",
        "VAR-1",
        1,
        seller,
        LineItemTotals {
            subtotal: Money::from_cents(subtotal),
            tax_total: Money::from_cents(tax),
            total: Money::from_cents(subtotal + tax),
            ..LineItemTotals::zero()
        },
    )
}

struct Harness {
    store: InMemoryOrderStore,
    dispatcher: SignalDispatcher<InMemoryOrderStore>,
}

impl Harness {
    fn new() -> Self {
        let store = InMemoryOrderStore::new();
        let dispatcher = SignalDispatcher::new(store.clone());
        Self { store, dispatcher }
    }

    async fn place_order(&self, items: Vec<LineItem>) -> OrderId {
        let root = Order::root(OrderId::new(), items);
        let id = root.id;
        self.store.insert(root).await.unwrap();
        self.dispatcher
            .handle(OrderSignal::Placed { order_id: id })
            .await
            .unwrap();
        id
    }
}

mod splitting {
    use super::*;

    #[tokio::test]
    async fn hundred_fifty_split_between_two_sellers() {
        let harness = Harness::new();
        let seller_a = SellerId::new();
        let seller_b = SellerId::new();

        // 100/10 for A, 50/5 for B.
        let root_id = harness
            .place_order(vec![
                line_item(Some(seller_a), 10_000, 1_000),
                line_item(Some(seller_b), 5_000, 500),
            ])
            .await;

        let children = harness.store.children_of(root_id).await.unwrap();
        assert_eq!(children.len(), 2);

        let child_a = children
            .iter()
            .find(|c| c.store_id == Some(seller_a))
            .unwrap();
        let child_b = children
            .iter()
            .find(|c| c.store_id == Some(seller_b))
            .unwrap();

        assert_eq!(child_a.totals.subtotal.cents(), 10_000);
        assert_eq!(child_a.totals.tax_total.cents(), 1_000);
        assert_eq!(child_b.totals.subtotal.cents(), 5_000);
        assert_eq!(child_b.totals.tax_total.cents(), 500);

        let root = harness.store.get(root_id).await.unwrap().unwrap();
        let children_subtotal: i64 = children.iter().map(|c| c.totals.subtotal.cents()).sum();
        assert_eq!(children_subtotal, root.totals.subtotal.cents());
    }

    #[tokio::test]
    async fn children_link_to_root_and_root_stays_a_root() {
        let harness = Harness::new();
        let root_id = harness
            .place_order(vec![
                line_item(Some(SellerId::new()), 100, 10),
                line_item(Some(SellerId::new()), 200, 20),
            ])
            .await;

        for child in harness.store.children_of(root_id).await.unwrap() {
            assert_eq!(child.parent_id, Some(root_id));
            assert!(child.store_id.is_some());
        }

        let root = harness.store.get(root_id).await.unwrap().unwrap();
        assert_eq!(root.parent_id, None);
    }

    #[tokio::test]
    async fn duplicate_placed_signal_creates_no_extra_children() {
        let harness = Harness::new();
        let root_id = harness
            .place_order(vec![line_item(Some(SellerId::new()), 100, 10)])
            .await;

        let outcome = harness
            .dispatcher
            .handle(OrderSignal::Placed { order_id: root_id })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SignalOutcome::Split(SplitOutcome::AlreadySplit { children: 1 })
        );
        assert_eq!(harness.store.children_of(root_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reject_policy_surfaces_unassigned_items() {
        let store = InMemoryOrderStore::new();
        let dispatcher = SignalDispatcher::with_config(
            store.clone(),
            SplitConfig {
                unassigned_policy: UnassignedItemPolicy::Reject,
            },
        );

        let root = Order::root(
            OrderId::new(),
            vec![
                line_item(Some(SellerId::new()), 100, 10),
                line_item(None, 50, 5),
            ],
        );
        let root_id = root.id;
        store.insert(root).await.unwrap();

        let err = dispatcher
            .handle(OrderSignal::Placed { order_id: root_id })
            .await
            .unwrap_err();

        assert!(matches!(err, FanOutError::UnassignedItems { count: 1, .. }));
        assert!(store.children_of(root_id).await.unwrap().is_empty());
    }
}

mod propagation {
    use super::*;

    fn completed() -> StatusTriple {
        StatusTriple::new(
            OrderStatus::Completed,
            PaymentStatus::Captured,
            FulfillmentStatus::Shipped,
        )
    }

    #[tokio::test]
    async fn completed_root_completes_every_child() {
        let harness = Harness::new();
        let root_id = harness
            .place_order(vec![
                line_item(Some(SellerId::new()), 100, 10),
                line_item(Some(SellerId::new()), 200, 20),
            ])
            .await;

        harness
            .store
            .update_status(root_id, completed())
            .await
            .unwrap();

        let outcome = harness
            .dispatcher
            .handle(OrderSignal::Updated { order_id: root_id })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SignalOutcome::Propagated(PropagationOutcome::Applied {
                children_updated: 2
            })
        );
        for child in harness.store.children_of(root_id).await.unwrap() {
            assert_eq!(child.status.status, OrderStatus::Completed);
            assert_eq!(child.status.payment_status, PaymentStatus::Captured);
            assert_eq!(child.status.fulfillment_status, FulfillmentStatus::Shipped);
        }
    }

    #[tokio::test]
    async fn updated_signal_for_a_child_is_a_no_op() {
        let harness = Harness::new();
        let root_id = harness
            .place_order(vec![line_item(Some(SellerId::new()), 100, 10)])
            .await;
        let child_id = harness.store.children_of(root_id).await.unwrap()[0].id;

        let outcome = harness
            .dispatcher
            .handle(OrderSignal::Updated { order_id: child_id })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SignalOutcome::Propagated(PropagationOutcome::SkippedChild)
        );
    }

    #[tokio::test]
    async fn stale_update_cannot_clobber_newer_state() {
        let harness = Harness::new();
        let root_id = harness
            .place_order(vec![line_item(Some(SellerId::new()), 100, 10)])
            .await;

        // Two status changes land before any propagation runs; the
        // children should end at the latest state and a late signal for
        // the earlier change must not regress them.
        harness
            .store
            .update_status(
                root_id,
                StatusTriple::new(
                    OrderStatus::Pending,
                    PaymentStatus::Awaiting,
                    FulfillmentStatus::NotFulfilled,
                ),
            )
            .await
            .unwrap();
        harness
            .store
            .update_status(root_id, completed())
            .await
            .unwrap();

        harness
            .dispatcher
            .handle(OrderSignal::Updated { order_id: root_id })
            .await
            .unwrap();

        let outcome = harness
            .dispatcher
            .handle(OrderSignal::Updated { order_id: root_id })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SignalOutcome::Propagated(PropagationOutcome::Applied {
                children_updated: 0
            })
        );
        let child = harness.store.children_of(root_id).await.unwrap().remove(0);
        assert_eq!(child.status, completed());
        assert_eq!(child.status_version, 2);
    }
}

mod recovery {
    use super::*;

    #[tokio::test]
    async fn failed_split_is_retryable_with_no_partial_children() {
        let harness = Harness::new();
        let root = Order::root(
            OrderId::new(),
            vec![
                line_item(Some(SellerId::new()), 100, 10),
                line_item(Some(SellerId::new()), 200, 20),
            ],
        );
        let root_id = root.id;
        harness.store.insert(root).await.unwrap();

        harness.store.set_fail_next_children_insert(true);
        let result = harness
            .dispatcher
            .handle(OrderSignal::Placed { order_id: root_id })
            .await;
        assert!(result.is_err());
        assert!(harness.store.children_of(root_id).await.unwrap().is_empty());

        // Redelivery succeeds in full.
        let outcome = harness
            .dispatcher
            .handle(OrderSignal::Placed { order_id: root_id })
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            SignalOutcome::Split(SplitOutcome::Split { ref children }) if children.len() == 2
        ));
    }

    #[tokio::test]
    async fn signal_for_unknown_order_is_an_error() {
        let harness = Harness::new();
        let err = harness
            .dispatcher
            .handle(OrderSignal::Placed {
                order_id: OrderId::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, FanOutError::OrderNotFound(_)));
    }
}
