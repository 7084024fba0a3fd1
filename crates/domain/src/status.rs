//! Order status fields.
//!
//! Children never compute their own statuses; the triple is overwritten
//! wholesale by propagation from the root.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a status string fails.
#[derive(Debug, Error)]
#[error("unknown {field} value: {value}")]
pub struct StatusParseError {
    pub field: &'static str,
    pub value: String,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Archived,
    Canceled,
}

impl OrderStatus {
    /// Returns the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Archived => "archived",
            OrderStatus::Canceled => "canceled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "archived" => Ok(OrderStatus::Archived),
            "canceled" => Ok(OrderStatus::Canceled),
            other => Err(StatusParseError {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    NotPaid,
    Awaiting,
    Captured,
    Refunded,
    Canceled,
}

impl PaymentStatus {
    /// Returns the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::NotPaid => "not_paid",
            PaymentStatus::Awaiting => "awaiting",
            PaymentStatus::Captured => "captured",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Canceled => "canceled",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_paid" => Ok(PaymentStatus::NotPaid),
            "awaiting" => Ok(PaymentStatus::Awaiting),
            "captured" => Ok(PaymentStatus::Captured),
            "refunded" => Ok(PaymentStatus::Refunded),
            "canceled" => Ok(PaymentStatus::Canceled),
            other => Err(StatusParseError {
                field: "payment_status",
                value: other.to_string(),
            }),
        }
    }
}

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    #[default]
    NotFulfilled,
    Fulfilled,
    Shipped,
    Delivered,
    Canceled,
}

impl FulfillmentStatus {
    /// Returns the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentStatus::NotFulfilled => "not_fulfilled",
            FulfillmentStatus::Fulfilled => "fulfilled",
            FulfillmentStatus::Shipped => "shipped",
            FulfillmentStatus::Delivered => "delivered",
            FulfillmentStatus::Canceled => "canceled",
        }
    }
}

impl std::str::FromStr for FulfillmentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_fulfilled" => Ok(FulfillmentStatus::NotFulfilled),
            "fulfilled" => Ok(FulfillmentStatus::Fulfilled),
            "shipped" => Ok(FulfillmentStatus::Shipped),
            "delivered" => Ok(FulfillmentStatus::Delivered),
            "canceled" => Ok(FulfillmentStatus::Canceled),
            other => Err(StatusParseError {
                field: "fulfillment_status",
                value: other.to_string(),
            }),
        }
    }
}

/// The three status fields mirrored from a root order onto its children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTriple {
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub fulfillment_status: FulfillmentStatus,
}

impl StatusTriple {
    /// Creates a status triple.
    pub fn new(
        status: OrderStatus,
        payment_status: PaymentStatus,
        fulfillment_status: FulfillmentStatus,
    ) -> Self {
        Self {
            status,
            payment_status,
            fulfillment_status,
        }
    }
}

impl std::fmt::Display for StatusTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.status.as_str(),
            self.payment_status.as_str(),
            self.fulfillment_status.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_triple_is_fresh_order() {
        let triple = StatusTriple::default();
        assert_eq!(triple.status, OrderStatus::Pending);
        assert_eq!(triple.payment_status, PaymentStatus::NotPaid);
        assert_eq!(triple.fulfillment_status, FulfillmentStatus::NotFulfilled);
    }

    #[test]
    fn status_string_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Archived,
            OrderStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }

        for status in [
            PaymentStatus::NotPaid,
            PaymentStatus::Awaiting,
            PaymentStatus::Captured,
            PaymentStatus::Refunded,
            PaymentStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), status);
        }

        for status in [
            FulfillmentStatus::NotFulfilled,
            FulfillmentStatus::Fulfilled,
            FulfillmentStatus::Shipped,
            FulfillmentStatus::Delivered,
            FulfillmentStatus::Canceled,
        ] {
            assert_eq!(
                status.as_str().parse::<FulfillmentStatus>().unwrap(),
                status
            );
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "nonsense".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.field, "status");
        assert!("nonsense".parse::<PaymentStatus>().is_err());
        assert!("nonsense".parse::<FulfillmentStatus>().is_err());
    }

    #[test]
    fn triple_display() {
        let triple = StatusTriple::new(
            OrderStatus::Completed,
            PaymentStatus::Captured,
            FulfillmentStatus::Shipped,
        );
        assert_eq!(triple.to_string(), "completed/captured/shipped");
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&PaymentStatus::NotPaid).unwrap();
        assert_eq!(json, "\"not_paid\"");
    }
}
