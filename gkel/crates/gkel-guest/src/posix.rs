//! POSIX-surface barrier routines
//!
//! The guest links two call surfaces to the same primitive; this is the
//! POSIX-named one. Return values follow the pthread convention: `0` on
//! success, a positive errno on failure, and the negative
//! [`PTHREAD_BARRIER_SERIAL_THREAD`] sentinel for the rendezvous leader.
//!
//! Guest handle cells are modeled as `Option` slots: `None` stands for
//! the null pointer the guest would pass, and destroy empties the slot
//! the way the guest kernel nulls the caller's pointer. All real work
//! happens in `gkel-sync`; these routines only validate the cell and
//! translate the typed result.

use gkel_errno::PosixError;
use gkel_sync::{BarrierAttr, BarrierHandle, WaitOutcome};

/// Returned to exactly one participant per completed rendezvous.
pub const PTHREAD_BARRIER_SERIAL_THREAD: i32 = -1;

/// Barrier usable only within the creating process (the default).
pub const PTHREAD_PROCESS_PRIVATE: i32 = 0;
/// Barrier shared across processes. Valid constant, unsupported feature.
pub const PTHREAD_PROCESS_SHARED: i32 = 1;

/// Guest-visible slot holding a barrier attribute object.
pub type AttrCell = Option<BarrierAttr>;
/// Guest-visible slot holding a barrier handle.
pub type BarrierCell = Option<BarrierHandle>;

const OK: i32 = 0;

/// Allocate a defaulted (process-private) attribute object into the cell.
pub fn barrierattr_init(cell: &mut AttrCell) -> i32 {
    *cell = Some(BarrierAttr::new());
    OK
}

/// Release the attribute object and empty the cell.
pub fn barrierattr_destroy(cell: &mut AttrCell) -> i32 {
    match cell.take() {
        Some(_) => OK,
        None => PosixError::InvalidArgument.errno(),
    }
}

/// Read the process-shared flag into `pshared`.
pub fn barrierattr_getpshared(cell: &AttrCell, pshared: &mut i32) -> i32 {
    match cell {
        Some(attr) => {
            *pshared = if attr.shared() {
                PTHREAD_PROCESS_SHARED
            } else {
                PTHREAD_PROCESS_PRIVATE
            };
            OK
        }
        None => PosixError::InvalidArgument.errno(),
    }
}

/// Store the process-shared flag.
///
/// Any nonzero value asks for a process-shared barrier, which the setter
/// rejects without changing the stored flag.
pub fn barrierattr_setpshared(cell: &mut AttrCell, pshared: i32) -> i32 {
    let Some(attr) = cell.as_mut() else {
        return PosixError::InvalidArgument.errno();
    };
    match attr.set_shared(pshared != PTHREAD_PROCESS_PRIVATE) {
        Ok(()) => OK,
        Err(err) => err.errno(),
    }
}

/// Create a barrier for `capacity` participants into the cell.
///
/// On failure the cell is left untouched.
pub fn barrier_init(cell: &mut BarrierCell, attr: Option<&BarrierAttr>, capacity: u32) -> i32 {
    match BarrierHandle::create(capacity, attr) {
        Ok(handle) => {
            *cell = Some(handle);
            OK
        }
        Err(err) => err.errno(),
    }
}

/// Destroy the barrier and, on success, empty the cell.
pub fn barrier_destroy(cell: &mut BarrierCell) -> i32 {
    let Some(handle) = cell.as_ref() else {
        return PosixError::InvalidArgument.errno();
    };
    match handle.destroy() {
        Ok(()) => {
            *cell = None;
            OK
        }
        Err(err) => err.errno(),
    }
}

/// Rendezvous with the other participants.
///
/// The leader receives [`PTHREAD_BARRIER_SERIAL_THREAD`]; every other
/// released participant receives `0`.
pub fn barrier_wait(cell: &BarrierCell) -> i32 {
    let Some(handle) = cell.as_ref() else {
        return PosixError::InvalidArgument.errno();
    };
    match handle.wait() {
        Ok(WaitOutcome::ReleasedAsLeader) => PTHREAD_BARRIER_SERIAL_THREAD,
        Ok(WaitOutcome::Released) => OK,
        Err(err) => err.errno(),
    }
}

/// Replace the barrier's diagnostic name; a null name is a no-op.
pub fn barrier_setname(cell: &BarrierCell, name: Option<&str>) -> i32 {
    let Some(handle) = cell.as_ref() else {
        return PosixError::InvalidArgument.errno();
    };
    match handle.set_name(name) {
        Ok(()) => OK,
        Err(err) => err.errno(),
    }
}
