//! Guest kernel result-code space
//!
//! The guest kernel reports results as signed 32-bit codes: `0` is
//! success and failures carry a facility tag in the high half-word, so
//! every error reinterprets as a negative value. The translation from
//! the internal POSIX-style errno model is a fixed mapping with no
//! per-call logic.

/// Signed 32-bit result code as the guest sees it.
pub type GuestResult = i32;

/// Success.
pub const GUEST_OK: GuestResult = 0;

/// Leader outcome of a barrier wait on the guest surface.
///
/// The POSIX surface reports the leader with a negative sentinel, which
/// the generic errno mapper would misread as a failure. The guest
/// surface therefore hard-codes this positive value at the wrapper
/// boundary instead of routing it through [`to_guest_error`].
pub const GUEST_BARRIER_SERIAL: GuestResult = 1;

/// Facility tag occupying the high half-word of every guest error code.
const GUEST_ERROR_BASE: u32 = 0x8002_0000;

/// Map a positive errno into the guest error space.
///
/// # Examples
///
/// ```rust
/// use gkel_guest::codes::to_guest_error;
///
/// // EINVAL (22) lands at 0x80020016, a negative i32.
/// let code = to_guest_error(22);
/// assert_eq!(code as u32, 0x8002_0016);
/// assert!(code < 0);
/// ```
pub fn to_guest_error(errno: i32) -> GuestResult {
    debug_assert!(errno > 0, "errno {errno} is not a failure");
    (GUEST_ERROR_BASE | errno as u32) as i32
}

/// Translate a POSIX-surface return code, treating any nonzero value as
/// an errno. The barrier-wait leader sentinel must be remapped before
/// reaching this function.
pub fn map_posix(code: i32) -> GuestResult {
    if code == 0 {
        GUEST_OK
    } else {
        to_guest_error(code)
    }
}
