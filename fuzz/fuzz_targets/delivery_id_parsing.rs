#![no_main]

//! Fuzz target for delivery id parsing.
//!
//! Tests delivery id format recognition with arbitrary inputs to ensure
//! status lookups never panic on malformed path parameters. Ids arrive
//! as raw URL segments, so the recognizers must tolerate anything a
//! client can put in a request path.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    fuzz_delivery_id_parsing(data);
});

/// Test delivery id recognition with arbitrary input data.
///
/// Exercises all three accepted formats (24-character hex, hyphenated
/// UUID, ULID) on the raw candidate plus case-flipped and length-mutated
/// variants, since hex and UUID ids are case-insensitive while ULIDs are
/// not and every format is recognized by exact length first.
fn fuzz_delivery_id_parsing(data: &[u8]) {
    let Some(candidate) = decode_candidate_safely(data) else {
        return;
    };

    let _ = classify_id_safely(&candidate);

    // Case flips cross the boundary between the case-insensitive and
    // case-sensitive formats.
    let _ = classify_id_safely(&candidate.to_uppercase());
    let _ = classify_id_safely(&candidate.to_lowercase());

    // Truncation and extension probe the exact-length checks.
    if let Some(prefix) = candidate.get(..candidate.len() / 2) {
        let _ = classify_id_safely(prefix);
    }
    let _ = classify_id_safely(&format!("{candidate}0"));
}

/// Safely decode the raw bytes into a candidate string.
fn decode_candidate_safely(data: &[u8]) -> Option<String> {
    std::panic::catch_unwind(|| {
        // Anything longer than the longest accepted format is rejected by
        // length alone; cap the candidate so case flips stay cheap.
        if data.len() > 256 {
            return None;
        }

        std::str::from_utf8(data).ok().map(|s| s.to_string())
    })
    .ok()
    .flatten()
}

/// Safely classify a candidate against the accepted id formats.
fn classify_id_safely(candidate: &str) -> Option<IdShape> {
    std::panic::catch_unwind(|| {
        Some(IdShape {
            length: candidate.len(),
            hex: is_hex_object_id(candidate),
            uuid: is_uuid(candidate),
            ulid: is_ulid(candidate),
        })
    })
    .ok()
    .flatten()
}

/// 24-character hex form, case-insensitive.
fn is_hex_object_id(value: &str) -> bool {
    value.len() == 24 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Hyphenated RFC 4122 UUID, versions 1-5, variant nibble 8/9/a/b.
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

    matches!(bytes[14], b'1'..=b'5')
        && matches!(bytes[19].to_ascii_lowercase(), b'8' | b'9' | b'a' | b'b')
}

/// 26-character uppercase Crockford base32 ULID starting with `0`-`7`.
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

/// Shape of a candidate measured against the accepted formats.
///
/// The formats have pairwise distinct lengths, so at most one of the
/// flags can be set for any candidate.
#[derive(Default, Debug)]
struct IdShape {
    length: usize,
    hex: bool,
    uuid: bool,
    ulid: bool,
}
