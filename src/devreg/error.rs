/// The request FIFO was full; the request was not admitted.
///
/// This is ordinary backpressure, not a fault. Nothing was written to the
/// peripheral and the caller decides whether and when to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoFull;

impl core::fmt::Display for FifoFull {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "request fifo full")
    }
}

/// Errors from descriptor-typed register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// The request FIFO was full.
    FifoFull,
    /// Value has bits set above the descriptor's data width.
    ValueTooWide,
}

impl From<FifoFull> for RequestError {
    fn from(_: FifoFull) -> Self {
        RequestError::FifoFull
    }
}

impl core::fmt::Display for RequestError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RequestError::FifoFull => write!(f, "request fifo full"),
            RequestError::ValueTooWide => write!(f, "value exceeds register data width"),
        }
    }
}

/// Errors found while validating a descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// Two descriptors share an index.
    DuplicateIndex(u32),
    /// Index does not fit the shadow window.
    IndexOutOfWindow(u32),
    /// Descriptor is both auto-read and auto-write.
    AutoReadAndWrite(u32),
    /// Command or data byte count above 4.
    InvalidWidth(u32),
}

impl core::fmt::Display for TableError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TableError::DuplicateIndex(i) => write!(f, "index {i:#x} used more than once"),
            TableError::IndexOutOfWindow(i) => write!(f, "index {i:#x} outside shadow window"),
            TableError::AutoReadAndWrite(i) => {
                write!(f, "index {i:#x} is both auto-read and auto-write")
            }
            TableError::InvalidWidth(i) => write!(f, "index {i:#x} has more than 4 bytes"),
        }
    }
}
