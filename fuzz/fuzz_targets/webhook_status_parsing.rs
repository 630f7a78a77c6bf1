#![no_main]

//! Fuzz target for carrier webhook payload parsing.
//!
//! Tests webhook payload parsing with malformed inputs to ensure the
//! endpoint never panics on unexpected or malicious JSON. Carriers
//! control these payloads end to end, so every field must survive
//! anything the other side can send.

use libfuzzer_sys::fuzz_target;
use serde_json::Value;

/// Statuses a carrier is allowed to report, in wire form.
const WIRE_STATUSES: [&str; 5] = ["PENDING", "CONFIRMED", "IN_TRANSIT", "DELIVERED", "CANCELLED"];

fuzz_target!(|data: &[u8]| {
    fuzz_webhook_status_parsing(data);
});

/// Test webhook payload parsing with arbitrary input data.
///
/// Ensures the notification field extraction, status vocabulary check,
/// and payload bounds handling all tolerate malformed input without
/// panicking. Status matching is exact; there is no trimming or case
/// folding on the wire names.
fn fuzz_webhook_status_parsing(data: &[u8]) {
    let _ = check_payload_bounds_safely(data);

    let Some(fields) = extract_notification_safely(data) else {
        return;
    };

    let _ = recognize_status_safely(fields.status.as_deref());
    let _ = recognize_timestamp_safely(fields.timestamp.as_deref());
}

/// Safely check payload size constraints.
fn check_payload_bounds_safely(data: &[u8]) -> Option<bool> {
    std::panic::catch_unwind(|| {
        // Webhook bodies beyond 1MB are rejected before parsing.
        if data.is_empty() || data.len() > 1024 * 1024 {
            return Some(false);
        }

        Some(true)
    })
    .ok()
    .flatten()
}

/// Safely extract notification fields from a JSON payload.
fn extract_notification_safely(data: &[u8]) -> Option<NotificationFields> {
    std::panic::catch_unwind(|| {
        let json: Value = serde_json::from_slice(data).ok()?;
        let obj = json.as_object()?;

        Some(NotificationFields {
            tracking_number: string_field(obj, "tracking_number"),
            status: string_field(obj, "status"),
            timestamp: string_field(obj, "timestamp"),
            signature: string_field(obj, "signature"),
            field_count: obj.len(),
        })
    })
    .ok()
    .flatten()
}

/// Safely test a reported status against the closed wire vocabulary.
fn recognize_status_safely(status: Option<&str>) -> Option<bool> {
    std::panic::catch_unwind(|| {
        let status = status?;

        Some(WIRE_STATUSES.contains(&status))
    })
    .ok()
    .flatten()
}

/// Safely probe whether a timestamp field is RFC 3339 shaped.
///
/// The real parse is stricter; this only has to not panic on arbitrary
/// separator and digit layouts.
fn recognize_timestamp_safely(timestamp: Option<&str>) -> Option<bool> {
    std::panic::catch_unwind(|| {
        let timestamp = timestamp?;
        let bytes = timestamp.as_bytes();

        // Minimum RFC 3339 form is "YYYY-MM-DDThh:mm:ssZ".
        if bytes.len() < 20 {
            return Some(false);
        }

        let date_shaped = bytes[4] == b'-' && bytes[7] == b'-';
        let time_shaped = matches!(bytes[10], b'T' | b't' | b' ')
            && bytes[13] == b':'
            && bytes[16] == b':';

        Some(date_shaped && time_shaped)
    })
    .ok()
    .flatten()
}

/// Read an object field as an owned string, ignoring non-string values.
fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Notification fields extracted from a webhook payload.
#[derive(Default, Debug)]
struct NotificationFields {
    tracking_number: Option<String>,
    status: Option<String>,
    timestamp: Option<String>,
    signature: Option<String>,
    field_count: usize,
}
