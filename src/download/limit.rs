//! Byte-size ceilings for candidate transfers.

use std::fmt;

const MIB: u64 = 1024 * 1024;

/// Maximum permitted size of one transferred file.
///
/// Always positive. Applies to each candidate independently, never
/// cumulatively across attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SizeLimit {
    bytes: u64,
}

impl SizeLimit {
    /// 50 MiB, the upload ceiling of common chat bot APIs.
    pub const DEFAULT: Self = Self { bytes: 50 * MIB };

    /// Creates a limit of `bytes`; `None` for zero.
    #[must_use]
    pub fn new(bytes: u64) -> Option<Self> {
        (bytes > 0).then_some(Self { bytes })
    }

    /// Creates a limit of `megabytes` MiB; `None` for zero or on overflow.
    #[must_use]
    pub fn from_megabytes(megabytes: u64) -> Option<Self> {
        megabytes.checked_mul(MIB).and_then(Self::new)
    }

    /// The ceiling in bytes.
    #[must_use]
    pub fn bytes(self) -> u64 {
        self.bytes
    }

    /// Returns true if `size` bytes fit within the ceiling.
    #[must_use]
    pub fn allows(self, size: u64) -> bool {
        size <= self.bytes
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&human_bytes(self.bytes))
    }
}

/// Formats a byte count as a short human-readable string (`"1.5 MB"`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
