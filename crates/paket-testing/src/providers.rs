//! Scripted shipping providers for deterministic tests.
//!
//! Unlike the randomized simulators, scripted providers answer exactly as
//! told: availability is a switch, labels are issued from a counter, and
//! tracking queries return pre-programmed results per tracking number.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use chrono::Utc;
use paket_core::models::{Address, CustomerInfo, DeliveryStatus, TrackingStatus};
use paket_core::OrderId;
use paket_providers::{
    ProviderError, PullProvider, Result, ShippingLabel, ShippingProvider,
};

/// Pull-capable provider that answers tracking queries from a script.
pub struct ScriptedPullProvider {
    name: String,
    available: AtomicBool,
    fail_labels: AtomicBool,
    label_counter: AtomicUsize,
    label_calls: AtomicUsize,
    tracking_calls: AtomicUsize,
    tracking_script: Mutex<HashMap<String, Result<DeliveryStatus>>>,
}

impl ScriptedPullProvider {
    /// Creates an available provider with an empty script.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: AtomicBool::new(true),
            fail_labels: AtomicBool::new(false),
            label_counter: AtomicUsize::new(0),
            label_calls: AtomicUsize::new(0),
            tracking_calls: AtomicUsize::new(0),
            tracking_script: Mutex::new(HashMap::new()),
        }
    }

    /// Switches the availability answer.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Makes every label purchase fail with an unavailable error.
    pub fn fail_labels(&self, fail: bool) {
        self.fail_labels.store(fail, Ordering::SeqCst);
    }

    /// Programs the answer for one tracking number.
    ///
    /// Unscripted tracking numbers fail with an unavailable error, which
    /// keeps accidental lookups visible in tests.
    pub fn script_tracking(
        &self,
        tracking_number: impl Into<String>,
        result: Result<DeliveryStatus>,
    ) {
        self.tracking_script
            .lock()
            .expect("tracking script lock")
            .insert(tracking_number.into(), result);
    }

    /// Number of label purchases attempted so far.
    pub fn label_calls(&self) -> usize {
        self.label_calls.load(Ordering::SeqCst)
    }

    /// Number of tracking queries received so far.
    pub fn tracking_calls(&self) -> usize {
        self.tracking_calls.load(Ordering::SeqCst)
    }
}

impl ShippingProvider for ScriptedPullProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
        let available = self.available.load(Ordering::SeqCst);
        Box::pin(async move { Ok(available) })
    }

    fn generate_label(
        &self,
        _order_id: OrderId,
        _address: Address,
        _customer: CustomerInfo,
    ) -> Pin<Box<dyn Future<Output = Result<ShippingLabel>> + Send + '_>> {
        self.label_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_labels.load(Ordering::SeqCst) {
            Err(ProviderError::unavailable(&self.name, "scripted label failure"))
        } else {
            let sequence = self.label_counter.fetch_add(1, Ordering::SeqCst);
            let tracking_number = format!("TRK-{}-{sequence}", self.name);
            Ok(ShippingLabel {
                provider: self.name.clone(),
                label_url: format!("https://labels.test/{tracking_number}.pdf"),
                tracking_number,
                estimated_delivery: Utc::now() + chrono::Duration::days(3),
            })
        };
        Box::pin(async move { result })
    }
}

impl PullProvider for ScriptedPullProvider {
    fn tracking_status(
        &self,
        tracking_number: String,
    ) -> Pin<Box<dyn Future<Output = Result<TrackingStatus>> + Send + '_>> {
        self.tracking_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .tracking_script
            .lock()
            .expect("tracking script lock")
            .get(&tracking_number)
            .cloned();
        let provider = self.name.clone();

        Box::pin(async move {
            match scripted {
                Some(Ok(status)) => Ok(TrackingStatus {
                    tracking_number,
                    status,
                    updated_at: Utc::now(),
                    provider,
                }),
                Some(Err(error)) => Err(error),
                None => Err(ProviderError::unavailable(
                    provider,
                    format!("no scripted tracking result for {tracking_number}"),
                )),
            }
        })
    }
}

/// Push-only provider that issues labels from a counter.
pub struct ScriptedPushProvider {
    name: String,
    available: AtomicBool,
    fail_labels: AtomicBool,
    label_counter: AtomicUsize,
    label_calls: AtomicUsize,
}

impl ScriptedPushProvider {
    /// Creates an available provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: AtomicBool::new(true),
            fail_labels: AtomicBool::new(false),
            label_counter: AtomicUsize::new(0),
            label_calls: AtomicUsize::new(0),
        }
    }

    /// Switches the availability answer.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Makes every label purchase fail with an unavailable error.
    pub fn fail_labels(&self, fail: bool) {
        self.fail_labels.store(fail, Ordering::SeqCst);
    }

    /// Number of label purchases attempted so far.
    pub fn label_calls(&self) -> usize {
        self.label_calls.load(Ordering::SeqCst)
    }
}

impl ShippingProvider for ScriptedPushProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
        let available = self.available.load(Ordering::SeqCst);
        Box::pin(async move { Ok(available) })
    }

    fn generate_label(
        &self,
        _order_id: OrderId,
        _address: Address,
        _customer: CustomerInfo,
    ) -> Pin<Box<dyn Future<Output = Result<ShippingLabel>> + Send + '_>> {
        self.label_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_labels.load(Ordering::SeqCst) {
            Err(ProviderError::unavailable(&self.name, "scripted label failure"))
        } else {
            let sequence = self.label_counter.fetch_add(1, Ordering::SeqCst);
            let tracking_number = format!("TRK-{}-{sequence}", self.name);
            Ok(ShippingLabel {
                provider: self.name.clone(),
                label_url: format!("https://labels.test/{tracking_number}.pdf"),
                tracking_number,
                estimated_delivery: Utc::now() + chrono::Duration::days(3),
            })
        };
        Box::pin(async move { result })
    }
}
