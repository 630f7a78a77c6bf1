//! Domain model for deliveries and their lifecycle.
//!
//! Defines the validated identifier types, the closed status enum, the
//! `Delivery` aggregate, and the transient tracking-status report consumed
//! by the polling engine. Includes database serialization traits so the
//! types bind directly in store queries.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

type PgDb = sqlx::Postgres;
type PgValueRef<'r> = sqlx::postgres::PgValueRef<'r>;
type PgTypeInfo = sqlx::postgres::PgTypeInfo;
type PgArgumentBuffer = sqlx::postgres::PgArgumentBuffer;
type EncodeResult =
    Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync + 'static>>;
type BoxDynError = sqlx::error::BoxDynError;

/// Validated delivery identifier.
///
/// Accepts three formats, matching the identifier shapes the service has
/// historically stored:
/// - 24-character hexadecimal (case-insensitive),
/// - RFC-4122 UUID, version 1 through 5 with variant nibble `8`/`9`/`a`/`b`
///   (case-insensitive),
/// - 26-character ULID whose first character is `0`-`7` and whose alphabet
///   is uppercase Crockford base32 (no `I`, `L`, `O`, `U`).
///
/// Equality is by value; the identifier never changes once assigned.
///
/// # Example
///
/// ```
/// use paket_core::models::DeliveryId;
///
/// let id = DeliveryId::parse("507f1f77bcf86cd799439011").expect("valid hex id");
/// assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(String);

impl DeliveryId {
    /// Parses and validates a delivery identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] when the value is empty or
    /// matches none of the accepted formats.
    pub fn parse(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CoreError::InvalidInput("delivery id must not be empty".into()));
        }
        if is_hex_object_id(&value) || is_uuid(&value) || is_ulid(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidInput(format!("malformed delivery id: {value}")))
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for DeliveryId {
    /// Builds an identifier from a UUID without re-validation.
    ///
    /// The hyphenated form of any RFC-4122 UUID satisfies the UUID format,
    /// so this cannot produce an invalid identifier for v1-v5 values.
    fn from(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }
}

impl sqlx::Type<PgDb> for DeliveryId {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for DeliveryId {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <String as sqlx::Decode<PgDb>>::decode(value)?;
        Ok(Self(raw))
    }
}

impl sqlx::Encode<'_, PgDb> for DeliveryId {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <String as sqlx::Encode<PgDb>>::encode_by_ref(&self.0, buf)
    }
}

fn is_hex_object_id(value: &str) -> bool {
    value.len() == 24 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_uuid(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    for (i, &b) in bytes.iter().enumerate() {
        match i {
            8 | 13 | 18 | 23 => {
                if b != b'-' {
                    return false;
                }
            },
            _ => {
                if !b.is_ascii_hexdigit() {
                    return false;
                }
            },
        }
    }
    // Version nibble 1-5 and RFC-4122 variant nibble 8/9/a/b.
    matches!(bytes[14], b'1'..=b'5')
        && matches!(bytes[19].to_ascii_lowercase(), b'8' | b'9' | b'a' | b'b')
}

fn is_ulid(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 26 || !matches!(bytes[0], b'0'..=b'7') {
        return false;
    }
    bytes.iter().all(|&b| is_crockford_base32(b))
}

fn is_crockford_base32(b: u8) -> bool {
    b.is_ascii_digit() || (b.is_ascii_uppercase() && !matches!(b, b'I' | b'L' | b'O' | b'U'))
}

/// Validated order identifier.
///
/// The originating order's id. Must be non-empty after trimming and at
/// least three characters long; no other format constraint. The raw value
/// is stored untrimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Parses and validates an order identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] when the value is blank or
    /// shorter than three characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CoreError::InvalidInput("order id must not be empty".into()));
        }
        if value.chars().count() < 3 {
            return Err(CoreError::InvalidInput(format!(
                "order id must be at least 3 characters: {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl sqlx::Type<PgDb> for OrderId {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for OrderId {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <String as sqlx::Decode<PgDb>>::decode(value)?;
        Ok(Self(raw))
    }
}

impl sqlx::Encode<'_, PgDb> for OrderId {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <String as sqlx::Encode<PgDb>>::encode_by_ref(&self.0, buf)
    }
}

/// Lifecycle status of a delivery.
///
/// Wire and storage representation is SCREAMING_SNAKE_CASE. `Delivered`
/// and `Cancelled` are terminal; the remaining statuses form the pollable
/// set the sync engine keeps watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    /// Created but not yet confirmed by a provider.
    Pending,
    /// Label issued and shipment confirmed by the provider.
    Confirmed,
    /// Shipment moving through the carrier network.
    InTransit,
    /// Shipment arrived at its destination. Terminal.
    Delivered,
    /// Shipment cancelled. Terminal.
    Cancelled,
}

impl DeliveryStatus {
    /// Statuses the polling engine sweeps; excludes the terminal states.
    pub const POLLABLE: [DeliveryStatus; 3] =
        [DeliveryStatus::Pending, DeliveryStatus::Confirmed, DeliveryStatus::InTransit];

    /// True when no further transitions are expected.
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Cancelled)
    }

    /// Wire representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Confirmed => "CONFIRMED",
            DeliveryStatus::InTransit => "IN_TRANSIT",
            DeliveryStatus::Delivered => "DELIVERED",
            DeliveryStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(DeliveryStatus::Pending),
            "CONFIRMED" => Ok(DeliveryStatus::Confirmed),
            "IN_TRANSIT" => Ok(DeliveryStatus::InTransit),
            "DELIVERED" => Ok(DeliveryStatus::Delivered),
            "CANCELLED" => Ok(DeliveryStatus::Cancelled),
            other => Err(CoreError::InvalidInput(format!("unknown delivery status: {other}"))),
        }
    }
}

impl sqlx::Type<PgDb> for DeliveryStatus {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for DeliveryStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as sqlx::Decode<PgDb>>::decode(value)?;
        raw.parse().map_err(|_| format!("invalid delivery status in database: {raw}").into())
    }
}

impl sqlx::Encode<'_, PgDb> for DeliveryStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <&str as sqlx::Encode<PgDb>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// Destination address captured at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line, including house or unit number.
    pub street: String,
    /// City or locality.
    pub city: String,
    /// State, province, or region.
    pub state: String,
    /// Postal or ZIP code.
    pub zip_code: String,
    /// Country as supplied by the caller.
    pub country: String,
}

/// Recipient contact details captured at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Full name of the recipient.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
}

/// Aggregate root for a shipment tied to a customer order.
///
/// Everything except `status` and `updated_at` is fixed at creation. The
/// only mutation path is [`Delivery::update_status`], which overwrites the
/// status unconditionally; transition policy lives in the status update
/// workflow, and every caller goes through it rather than mutating the
/// entity directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    /// Unique delivery identifier, assigned once at creation.
    pub id: DeliveryId,
    /// Originating order. Unique across all deliveries, enforced by the
    /// store rather than the entity.
    pub order_id: OrderId,
    /// Name of the shipping provider that issued the label.
    pub provider: String,
    /// Carrier tracking number. Unique across all deliveries.
    pub tracking_number: String,
    /// Current lifecycle status.
    pub status: DeliveryStatus,
    /// URL of the generated shipping label.
    pub label_url: String,
    /// Destination address.
    pub shipping_address: Address,
    /// Recipient contact details.
    pub customer_info: CustomerInfo,
    /// Set once when the delivery is created.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation, including the initial save.
    pub updated_at: DateTime<Utc>,
}

impl Delivery {
    /// Creates a delivery with both timestamps set to the current time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: DeliveryId,
        order_id: OrderId,
        provider: impl Into<String>,
        tracking_number: impl Into<String>,
        label_url: impl Into<String>,
        status: DeliveryStatus,
        shipping_address: Address,
        customer_info: CustomerInfo,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            order_id,
            provider: provider.into(),
            tracking_number: tracking_number.into(),
            status,
            label_url: label_url.into(),
            shipping_address,
            customer_info,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the status and refreshes `updated_at`.
    ///
    /// Unconditional by contract: any status may replace any other,
    /// including transitions out of terminal states. Callers that need
    /// transition legality enforce it before calling this.
    pub fn update_status(&mut self, status: DeliveryStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// A provider's reported state for a shipment.
///
/// Produced by pull-capable providers' tracking queries. Transient:
/// consumed to drive a delivery mutation, never persisted directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingStatus {
    /// Tracking number the report refers to.
    pub tracking_number: String,
    /// Status reported by the provider.
    pub status: DeliveryStatus,
    /// When the provider last updated the shipment.
    pub updated_at: DateTime<Utc>,
    /// Stable name of the reporting provider.
    pub provider: String,
}
