//! Shared error vocabulary for the guest kernel compatibility layer
//!
//! The emulated kernel descends from a BSD lineage, so the internal failure
//! model is POSIX-style: every operation reports either success or a single
//! errno-class failure. This crate defines that vocabulary once so the core
//! primitives and the guest-facing adapters agree on numbering.
//!
//! # Error Categories
//!
//! - `InvalidArgument` - null handle, zero/out-of-range capacity,
//!   unsupported configuration value
//! - `NoSuchEntity` - operation on a destroyed or never-valid object
//! - `Busy` - lifecycle conflict (active waiters, in-flight destroy)
//! - `NotSupported` - feature the guest kernel itself rejects

use thiserror::Error;

/// POSIX-style failure reported by the core primitives.
///
/// The numeric values follow the guest kernel's BSD-derived errno table,
/// which is what the guest-facing translation layer consumes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PosixError {
    /// Argument failed validation before any lock was taken
    ///
    /// **When returned:** null handle cell, capacity of 0 or above the
    /// guest's signed 32-bit ceiling, or an unsupported attribute value
    #[error("invalid argument (EINVAL)")]
    InvalidArgument,

    /// Target object was destroyed or never initialized
    ///
    /// **When returned:** the handle dereferences to an object whose
    /// validity tag reads `Dead`; detected under the object's lock
    #[error("no such entity (ESRCH)")]
    NoSuchEntity,

    /// Lifecycle conflict that is rejected rather than queued
    ///
    /// **When returned:** destroying a barrier while parties are still
    /// rendezvousing, or while another destroy is in flight. Retrying is
    /// caller policy.
    #[error("device or resource busy (EBUSY)")]
    Busy,

    /// Configuration the guest kernel does not implement
    ///
    /// **When returned:** a process-shared barrier was requested
    #[error("function not implemented (ENOSYS)")]
    NotSupported,
}

impl PosixError {
    /// Numeric errno in the guest kernel's BSD-derived numbering.
    pub fn errno(self) -> i32 {
        match self {
            PosixError::NoSuchEntity => 3,
            PosixError::Busy => 16,
            PosixError::InvalidArgument => 22,
            PosixError::NotSupported => 78,
        }
    }

    /// Check whether retrying the operation can ever succeed.
    ///
    /// Only `Busy` is transient; the other classes indicate a usage bug or
    /// an unsupported request that will fail identically every time.
    pub fn is_transient(self) -> bool {
        matches!(self, PosixError::Busy)
    }
}

/// Result type alias for core primitive operations
pub type PosixResult<T> = std::result::Result<T, PosixError>;
