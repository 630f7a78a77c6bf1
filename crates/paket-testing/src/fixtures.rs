//! Test data builders for deliveries.
//!
//! Builder defaults produce a valid confirmed delivery with unique order
//! and tracking identifiers, so tests only set the fields they assert on.

use chrono::{DateTime, Utc};
use paket_core::models::{Address, CustomerInfo, Delivery, DeliveryId, DeliveryStatus, OrderId};
use uuid::Uuid;

/// A plausible destination address.
pub fn sample_address() -> Address {
    Address {
        street: "Storgatan 1".to_string(),
        city: "Stockholm".to_string(),
        state: "AB".to_string(),
        zip_code: "111 29".to_string(),
        country: "SE".to_string(),
    }
}

/// A plausible recipient.
pub fn sample_customer() -> CustomerInfo {
    CustomerInfo {
        name: "Astrid Berg".to_string(),
        email: "astrid@example.com".to_string(),
        phone: "+46-70-123-4567".to_string(),
    }
}

/// Builder for test deliveries.
pub struct DeliveryBuilder {
    id: Option<DeliveryId>,
    order_id: Option<String>,
    provider: Option<String>,
    tracking_number: Option<String>,
    status: Option<DeliveryStatus>,
    label_url: Option<String>,
    shipping_address: Option<Address>,
    customer_info: Option<CustomerInfo>,
    created_at: Option<DateTime<Utc>>,
}

impl DeliveryBuilder {
    /// Creates a builder whose unset fields fall back to defaults at
    /// build time.
    pub fn new() -> Self {
        Self {
            id: None,
            order_id: None,
            provider: None,
            tracking_number: None,
            status: None,
            label_url: None,
            shipping_address: None,
            customer_info: None,
            created_at: None,
        }
    }

    /// Creates a builder with every field populated.
    pub fn with_defaults() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            id: Some(DeliveryId::from(Uuid::new_v4())),
            order_id: Some(format!("ORDER-{suffix}")),
            provider: Some("novapost".to_string()),
            tracking_number: Some(format!("NOVA{suffix}")),
            status: Some(DeliveryStatus::Confirmed),
            label_url: None,
            shipping_address: Some(sample_address()),
            customer_info: Some(sample_customer()),
            created_at: None,
        }
    }

    /// Sets the delivery id.
    #[must_use]
    pub fn id(mut self, id: DeliveryId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the order id (raw, validated at build time).
    #[must_use]
    pub fn order(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Sets the provider name recorded on the delivery.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the carrier tracking number.
    #[must_use]
    pub fn tracking_number(mut self, tracking_number: impl Into<String>) -> Self {
        self.tracking_number = Some(tracking_number.into());
        self
    }

    /// Sets the lifecycle status.
    #[must_use]
    pub fn status(mut self, status: DeliveryStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the label URL.
    #[must_use]
    pub fn label_url(mut self, label_url: impl Into<String>) -> Self {
        self.label_url = Some(label_url.into());
        self
    }

    /// Sets the destination address.
    #[must_use]
    pub fn address(mut self, address: Address) -> Self {
        self.shipping_address = Some(address);
        self
    }

    /// Sets the recipient details.
    #[must_use]
    pub fn customer(mut self, customer: CustomerInfo) -> Self {
        self.customer_info = Some(customer);
        self
    }

    /// Pins the creation timestamp, for tests that assert on ordering.
    #[must_use]
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the delivery.
    ///
    /// Panics on an invalid order id; builders are test code and fail
    /// loudly.
    pub fn build(self) -> Delivery {
        let suffix = Uuid::new_v4().simple().to_string();
        let tracking_number =
            self.tracking_number.unwrap_or_else(|| format!("NOVA{suffix}"));
        let order_id = self.order_id.unwrap_or_else(|| format!("ORDER-{suffix}"));
        let created_at = self.created_at.unwrap_or_else(Utc::now);

        Delivery {
            id: self.id.unwrap_or_else(|| DeliveryId::from(Uuid::new_v4())),
            order_id: OrderId::parse(order_id).expect("builder order id is valid"),
            provider: self.provider.unwrap_or_else(|| "novapost".to_string()),
            label_url: self
                .label_url
                .unwrap_or_else(|| format!("https://labels.test/{tracking_number}.pdf")),
            tracking_number,
            status: self.status.unwrap_or(DeliveryStatus::Confirmed),
            shipping_address: self.shipping_address.unwrap_or_else(sample_address),
            customer_info: self.customer_info.unwrap_or_else(sample_customer),
            created_at,
            updated_at: created_at,
        }
    }
}

impl Default for DeliveryBuilder {
    fn default() -> Self {
        Self::with_defaults()
    }
}
