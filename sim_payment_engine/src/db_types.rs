use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spg_common::Rubles;
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------        OrderId        -------------------------------------------------------
/// The provider-facing order number (`InvId` on the wire). Assigned exactly once at creation, unique across all
/// orders, and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl From<i64> for OrderId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for OrderId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

//--------------------------------------      OrderStatus      -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// The order has been created; no payment has been observed yet.
    Pending,
    /// A transfer receipt has been uploaded and awaits an operator's verdict.
    AwaitingConfirmation,
    /// The order has been paid, either through a verified provider callback or by operator approval. Terminal.
    Paid,
    /// An operator rejected the uploaded receipt. The buyer may resubmit.
    PaymentRejected,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::AwaitingConfirmation => write!(f, "awaiting_confirmation"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::PaymentRejected => write!(f, "payment_rejected"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "awaiting_confirmation" => Ok(Self::AwaitingConfirmation),
            "paid" => Ok(Self::Paid),
            "payment_rejected" => Ok(Self::PaymentRejected),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------    FulfilmentMode     -------------------------------------------------------
/// How the buyer wants the connection fulfilled: port an existing number in, or issue a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FulfilmentMode {
    Transfer,
    New,
}

impl Display for FulfilmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FulfilmentMode::Transfer => write!(f, "transfer"),
            FulfilmentMode::New => write!(f, "new"),
        }
    }
}

impl FromStr for FulfilmentMode {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transfer" => Ok(Self::Transfer),
            "new" => Ok(Self::New),
            s => Err(ConversionError(format!("Invalid fulfilment mode: {s}"))),
        }
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub buyer_id: i64,
    pub username: Option<String>,
    pub tariff_id: i64,
    pub tariff_name: String,
    pub operator_id: i64,
    pub operator_name: String,
    pub monthly_fee: Option<Rubles>,
    /// The one-time charge recorded at creation. Immutable; every callback amount is checked against this value,
    /// never against what the provider sends.
    pub connection_price: Rubles,
    pub mode: FulfilmentMode,
    pub transfer_phone: Option<String>,
    pub full_name: String,
    pub region_city: String,
    pub passport_photo_1: String,
    pub passport_photo_2: String,
    pub payment_receipt: Option<String>,
    pub payment_method_name: Option<String>,
    pub payment_confirmed_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder      ---------------------------------------------------------
/// A fully collected order request, ready for the store. The provider-facing order id and the initial `pending`
/// status are assigned by the flow API at insertion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub buyer_id: i64,
    pub username: Option<String>,
    pub tariff_id: i64,
    pub tariff_name: String,
    pub operator_id: i64,
    pub operator_name: String,
    pub monthly_fee: Option<Rubles>,
    pub connection_price: Rubles,
    pub mode: FulfilmentMode,
    pub transfer_phone: Option<String>,
    pub full_name: String,
    pub region_city: String,
    pub passport_photo_1: String,
    pub passport_photo_2: String,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(buyer_id: i64, tariff: TariffSnapshot, mode: FulfilmentMode) -> Self {
        Self {
            buyer_id,
            username: None,
            tariff_id: tariff.tariff_id,
            tariff_name: tariff.tariff_name,
            operator_id: tariff.operator_id,
            operator_name: tariff.operator_name,
            monthly_fee: tariff.monthly_fee,
            connection_price: tariff.connection_price,
            mode,
            transfer_phone: None,
            full_name: String::default(),
            region_city: String::default(),
            passport_photo_1: String::default(),
            passport_photo_2: String::default(),
            created_at: Utc::now(),
        }
    }
}

/// The priced-item snapshot captured into an order at creation time. The catalog is authoritative for these values
/// only at this instant; later catalog edits never touch existing orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffSnapshot {
    pub tariff_id: i64,
    pub tariff_name: String,
    pub operator_id: i64,
    pub operator_name: String,
    pub monthly_fee: Option<Rubles>,
    pub connection_price: Rubles,
}
