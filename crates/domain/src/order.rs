//! Orders, line items, and exact monetary totals.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId, SellerId, VariantId};
use serde::{Deserialize, Serialize};

use crate::status::StatusTriple;

/// The eight monetary fields carried by orders and line items.
///
/// These are already-computed amounts: aggregation is exact field-wise
/// addition, never re-derivation or rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax_total: Money,
    pub total: Money,
    pub original_total: Money,
    pub original_tax_total: Money,
    pub discount_total: Money,
    pub raw_discount_total: Money,
    pub gift_card_total: Money,
}

/// Line items carry the same eight fields as orders.
pub type LineItemTotals = OrderTotals;

impl OrderTotals {
    /// Returns all-zero totals.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Sums the totals of the given line items field-wise.
    pub fn aggregate<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Self {
        items
            .into_iter()
            .fold(Self::zero(), |acc, item| acc + item.totals)
    }
}

impl std::ops::Add for OrderTotals {
    type Output = OrderTotals;

    fn add(self, rhs: Self) -> Self::Output {
        OrderTotals {
            subtotal: self.subtotal + rhs.subtotal,
            tax_total: self.tax_total + rhs.tax_total,
            total: self.total + rhs.total,
            original_total: self.original_total + rhs.original_total,
            original_tax_total: self.original_tax_total + rhs.original_tax_total,
            discount_total: self.discount_total + rhs.discount_total,
            raw_discount_total: self.raw_discount_total + rhs.raw_discount_total,
            gift_card_total: self.gift_card_total + rhs.gift_card_total,
        }
    }
}

impl std::ops::AddAssign for OrderTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// A line item on an order.
///
/// The owning seller is resolved through the item's product at order
/// creation; items whose product has no seller carry `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: u32,
    pub seller_id: Option<SellerId>,
    pub totals: LineItemTotals,
}

impl LineItem {
    /// Creates a line item owned by a seller.
    pub fn new(
        product_id: impl Into<ProductId>,
        variant_id: impl Into<VariantId>,
        quantity: u32,
        seller_id: Option<SellerId>,
        totals: LineItemTotals,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: variant_id.into(),
            quantity,
            seller_id,
            totals,
        }
    }
}

/// An order, root or child.
///
/// A root order has `parent_id == None` and no `store_id`. A child order
/// always points at a root (never at another child) and is scoped to one
/// seller via `store_id`. Child status fields are derived: propagation
/// from the root overwrites them, they are never computed locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub parent_id: Option<OrderId>,
    pub store_id: Option<SellerId>,
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
    pub status: StatusTriple,
    /// Monotonic token guarding status propagation against stale events.
    pub status_version: i64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a root order from the given line items.
    ///
    /// Totals are aggregated from the items; statuses start at their
    /// defaults.
    pub fn root(id: OrderId, items: Vec<LineItem>) -> Self {
        let totals = OrderTotals::aggregate(&items);
        Self {
            id,
            parent_id: None,
            store_id: None,
            items,
            totals,
            status: StatusTriple::default(),
            status_version: 0,
            created_at: Utc::now(),
        }
    }

    /// Creates a seller-scoped child of a root order.
    ///
    /// The child inherits the root's status triple and version so a
    /// propagation run between split and first status change is a no-op.
    pub fn child_of(root: &Order, store_id: SellerId, items: Vec<LineItem>) -> Self {
        let totals = OrderTotals::aggregate(&items);
        Self {
            id: OrderId::new(),
            parent_id: Some(root.id),
            store_id: Some(store_id),
            items,
            totals,
            status: root.status,
            status_version: root.status_version,
            created_at: Utc::now(),
        }
    }

    /// Returns true if this order has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;

    fn totals(subtotal: i64, tax: i64) -> LineItemTotals {
        LineItemTotals {
            subtotal: Money::from_cents(subtotal),
            tax_total: Money::from_cents(tax),
            total: Money::from_cents(subtotal + tax),
            ..LineItemTotals::zero()
        }
    }

    #[test]
    fn aggregate_is_exact_field_wise_addition() {
        let seller = SellerId::new();
        let items = vec![
            LineItem::new("PROD-1", "VAR-1", 1, Some(seller), totals(10_000, 1_000)),
            LineItem::new("PROD-2", "VAR-2", 2, Some(seller), totals(5_000, 500)),
        ];

        let sum = OrderTotals::aggregate(&items);
        assert_eq!(sum.subtotal.cents(), 15_000);
        assert_eq!(sum.tax_total.cents(), 1_500);
        assert_eq!(sum.total.cents(), 16_500);
        assert_eq!(sum.discount_total.cents(), 0);
    }

    #[test]
    fn aggregate_of_no_items_is_zero() {
        assert_eq!(OrderTotals::aggregate(&[]), OrderTotals::zero());
    }

    #[test]
    fn root_order_has_no_parent() {
        let order = Order::root(OrderId::new(), vec![]);
        assert!(order.is_root());
        assert!(order.store_id.is_none());
        assert_eq!(order.status_version, 0);
    }

    #[test]
    fn child_links_to_root_and_inherits_status() {
        let seller = SellerId::new();
        let mut root = Order::root(
            OrderId::new(),
            vec![LineItem::new(
                "PROD-1",
                "VAR-1",
                1,
                Some(seller),
                totals(100, 10),
            )],
        );
        root.status_version = 3;

        let child = Order::child_of(&root, seller, root.items.clone());

        assert_eq!(child.parent_id, Some(root.id));
        assert_eq!(child.store_id, Some(seller));
        assert_eq!(child.status, root.status);
        assert_eq!(child.status_version, 3);
        assert!(!child.is_root());
        assert_eq!(child.totals.subtotal.cents(), 100);
    }
}
