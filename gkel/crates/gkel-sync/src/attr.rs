//! Barrier Attribute Object
//!
//! A barrier attribute is an independently allocated configuration record
//! read exactly once, at barrier creation. It carries a single flag:
//! whether the barrier is usable across process boundaries. The guest
//! kernel only implements process-private barriers, so the flag can never
//! actually be set; the setter rejects the shared value instead of
//! storing it and misbehaving later.
//!
//! Attributes have no relationship to the barrier they configure beyond
//! that single read: the attribute may be mutated or dropped while the
//! barrier lives on.

use gkel_errno::{PosixError, PosixResult};

/// Configuration record consumed by [`crate::BarrierHandle::create`].
///
/// # Examples
///
/// ```rust
/// use gkel_sync::BarrierAttr;
///
/// let mut attr = BarrierAttr::new();
/// assert!(!attr.shared());
///
/// // Process-shared barriers are rejected by the guest kernel.
/// assert!(attr.set_shared(true).is_err());
/// assert!(!attr.shared());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarrierAttr {
    shared: bool,
}

impl BarrierAttr {
    /// Create an attribute object with the process-private default.
    ///
    /// Never fails.
    pub fn new() -> Self {
        Self { shared: false }
    }

    /// Build an attribute with an explicit shared flag.
    ///
    /// `true` is a representable value but an unsupported configuration:
    /// every barrier create consuming it fails. The guest-facing setter
    /// never stores `true`; this constructor covers guests that
    /// synthesize the attribute record wholesale instead of going
    /// through the setter.
    pub fn with_shared(shared: bool) -> Self {
        Self { shared }
    }

    /// Whether a process-shared barrier is requested.
    pub fn shared(&self) -> bool {
        self.shared
    }

    /// Set the process-shared flag.
    ///
    /// **When it fails:** `true` is a valid value of the flag but an
    /// unsupported configuration; the call returns `InvalidArgument` and
    /// leaves the stored value unchanged, matching the guest kernel.
    pub fn set_shared(&mut self, shared: bool) -> PosixResult<()> {
        if shared {
            return Err(PosixError::InvalidArgument);
        }
        self.shared = shared;
        Ok(())
    }
}
