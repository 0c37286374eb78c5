//! Device identity derived from the radio's hardware address
//!
//! The station MAC is factory-programmed and stable across reboots, which
//! makes it the natural per-device identifier for readings.

/// Format a 6-byte hardware address as the device id
///
/// Output is six colon-separated lowercase hex byte pairs, e.g.
/// `aa:bb:cc:dd:ee:ff`.
pub fn device_id(addr: [u8; 6]) -> String {
    use std::fmt::Write;

    let mut id = String::with_capacity(17);
    for (i, byte) in addr.iter().enumerate() {
        if i > 0 {
            id.push(':');
        }
        // Writing into a String cannot fail.
        let _ = write!(id, "{:02x}", byte);
    }
    id
}
