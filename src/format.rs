//! Human-readable rendering of sizes and addresses.

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Formats a byte count using 1024-based units with two decimals.
///
/// The unit is the largest one for which the value is at least 1.
/// Zero is rendered as `0B`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2}{}", value, UNITS[unit])
}

/// Formats an address as lowercase hex with a `0x` prefix.
pub fn format_address(addr: u64) -> String {
    format!("{:#x}", addr)
}
