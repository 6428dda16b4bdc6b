use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use nas_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

use crate::helpers::new_game_key;

//--------------------------------------   OrderStatusType     -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has just been created from a cart and is awaiting fulfilment.
    Pending,
    /// The order is being fulfilled.
    Processing,
    /// The order has been fulfilled. Terminal.
    Completed,
    /// The order has been cancelled by the user or an admin. Terminal.
    Cancelled,
    /// The order amount has been refunded.
    Refunded,
}

impl OrderStatusType {
    /// Terminal orders admit no further status transitions, and their fields are frozen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatusType::Completed | OrderStatusType::Cancelled)
    }

    /// Whether a transition from `self` to `new` is permitted. Any transition out of a non-terminal state is
    /// accepted, including a no-op transition to the current status. Terminal states admit nothing, not even
    /// themselves.
    pub fn can_transition_to(&self, _new: OrderStatusType) -> bool {
        !self.is_terminal()
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::Processing => write!(f, "Processing"),
            OrderStatusType::Completed => write!(f, "Completed"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
            OrderStatusType::Refunded => write!(f, "Refunded"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            "Refunded" => Ok(Self::Refunded),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------     OrderNumber       -------------------------------------------------------
/// The customer-facing order number, e.g. `ORD-20240915-D00DF00D`. Assigned once at checkout and immutable
/// thereafter. The database enforces global uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderNumber(pub String);

impl FromStr for OrderNumber {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------        Game         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub stock_quantity: i64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGame {
    pub title: String,
    pub description: String,
    pub price: Money,
    pub stock_quantity: i64,
    pub is_available: bool,
}

impl NewGame {
    pub fn new<S: Into<String>>(title: S, price: Money, stock_quantity: i64) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            price,
            stock_quantity,
            is_available: true,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.is_available = false;
        self
    }
}

/// A partial update to a catalog entry. Only the populated fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub stock_quantity: Option<i64>,
    pub is_available: Option<bool>,
}

impl GameUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock_quantity.is_none()
            && self.is_available.is_none()
    }
}

//--------------------------------------      CartItem       ---------------------------------------------------------
/// One line in a user's cart. There is at most one line per (user, game); adding the same game again adjusts the
/// quantity on the existing line. `price` is the unit price captured when the line was first added, and
/// `subtotal` is always `price * quantity`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub game_id: i64,
    pub price: Money,
    pub quantity: i64,
    pub subtotal: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with the catalog columns that checkout validation needs, so the whole validation pass runs
/// off a single consistent read. The catalog columns are `None` when the referenced game no longer exists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartLine {
    pub id: i64,
    pub user_id: i64,
    pub game_id: i64,
    pub price: Money,
    pub quantity: i64,
    pub subtotal: Money,
    pub title: Option<String>,
    pub is_available: Option<bool>,
    pub stock_quantity: Option<i64>,
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_number: OrderNumber,
    pub user_id: i64,
    pub status: OrderStatusType,
    pub order_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_amount: Money,
}

//--------------------------------------      OrderItem      ---------------------------------------------------------
/// An immutable snapshot of a cart line, captured at checkout. `price` and `quantity` never change after
/// creation, even if the catalog price does. `game_key` is the redemption token minted for this line.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub game_id: i64,
    pub price: Money,
    pub quantity: i64,
    pub subtotal: Money,
    pub game_key: String,
}

/// The line items for a new order, built from validated cart lines just before insertion.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub game_id: i64,
    pub price: Money,
    pub quantity: i64,
    pub subtotal: Money,
    pub game_key: String,
}

impl NewOrderItem {
    /// Snapshot a cart line, recomputing the subtotal from the frozen unit price and minting a fresh game key.
    pub fn from_cart_line(line: &CartLine) -> Self {
        Self {
            game_id: line.game_id,
            price: line.price,
            quantity: line.quantity,
            subtotal: line.price * line.quantity,
            game_key: new_game_key(line.game_id),
        }
    }
}
