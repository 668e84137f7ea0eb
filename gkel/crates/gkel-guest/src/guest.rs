//! Guest-surface barrier routines
//!
//! Thin 1:1 call-throughs over the POSIX surface that re-express every
//! return value in the guest kernel's result-code space. Two things are
//! special here and nowhere else:
//!
//! - the barrier-wait leader sentinel is remapped to the positive
//!   [`GUEST_BARRIER_SERIAL`] constant before the generic errno mapper
//!   runs, because that mapper treats any nonzero value as a failure
//! - the guest create variant accepts an optional human-readable name,
//!   applied after the underlying create succeeds

use crate::codes::{map_posix, to_guest_error, GuestResult, GUEST_BARRIER_SERIAL, GUEST_OK};
use crate::posix::{self, AttrCell, BarrierCell, PTHREAD_BARRIER_SERIAL_THREAD};
use gkel_sync::BarrierAttr;

/// Guest surface of [`posix::barrierattr_init`].
pub fn barrierattr_init(cell: &mut AttrCell) -> GuestResult {
    map_posix(posix::barrierattr_init(cell))
}

/// Guest surface of [`posix::barrierattr_destroy`].
pub fn barrierattr_destroy(cell: &mut AttrCell) -> GuestResult {
    map_posix(posix::barrierattr_destroy(cell))
}

/// Guest surface of [`posix::barrierattr_getpshared`].
pub fn barrierattr_getpshared(cell: &AttrCell, pshared: &mut i32) -> GuestResult {
    map_posix(posix::barrierattr_getpshared(cell, pshared))
}

/// Guest surface of [`posix::barrierattr_setpshared`].
pub fn barrierattr_setpshared(cell: &mut AttrCell, pshared: i32) -> GuestResult {
    map_posix(posix::barrierattr_setpshared(cell, pshared))
}

/// Create a barrier, optionally naming it in the same call.
///
/// The name is applied only after the underlying create succeeds, so a
/// failed create never leaves a half-configured object behind.
pub fn barrier_init(
    cell: &mut BarrierCell,
    attr: Option<&BarrierAttr>,
    capacity: u32,
    name: Option<&str>,
) -> GuestResult {
    let result = posix::barrier_init(cell, attr, capacity);
    if result == 0 {
        if let (Some(name), Some(handle)) = (name, cell.as_ref()) {
            if let Err(err) = handle.set_name(Some(name)) {
                return to_guest_error(err.errno());
            }
        }
    }
    log::info!(
        "barrier_init: name={} capacity={} result={}",
        name.unwrap_or(""),
        capacity,
        result
    );
    map_posix(result)
}

/// Guest surface of [`posix::barrier_destroy`].
pub fn barrier_destroy(cell: &mut BarrierCell) -> GuestResult {
    map_posix(posix::barrier_destroy(cell))
}

/// Guest surface of [`posix::barrier_wait`].
///
/// The leader's sentinel is a valid success value and must not reach
/// the errno mapper; it becomes [`GUEST_BARRIER_SERIAL`] here.
pub fn barrier_wait(cell: &BarrierCell) -> GuestResult {
    match posix::barrier_wait(cell) {
        PTHREAD_BARRIER_SERIAL_THREAD => GUEST_BARRIER_SERIAL,
        0 => GUEST_OK,
        errno => to_guest_error(errno),
    }
}

/// Guest surface of [`posix::barrier_setname`].
pub fn barrier_setname(cell: &BarrierCell, name: Option<&str>) -> GuestResult {
    map_posix(posix::barrier_setname(cell, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const GUEST_EINVAL: u32 = 0x8002_0016;
    const GUEST_ESRCH: u32 = 0x8002_0003;
    const GUEST_EBUSY: u32 = 0x8002_0010;
    const GUEST_ENOSYS: u32 = 0x8002_004e;

    #[test]
    fn test_attr_surface_translates_codes() {
        let mut cell: AttrCell = None;
        assert_eq!(barrierattr_destroy(&mut cell) as u32, GUEST_EINVAL);

        assert_eq!(barrierattr_init(&mut cell), GUEST_OK);
        assert_eq!(barrierattr_setpshared(&mut cell, 1) as u32, GUEST_EINVAL);

        let mut pshared = -1;
        assert_eq!(barrierattr_getpshared(&cell, &mut pshared), GUEST_OK);
        assert_eq!(pshared, 0);

        assert_eq!(barrierattr_destroy(&mut cell), GUEST_OK);
    }

    #[test]
    fn test_init_named_applies_name_after_create() {
        let mut cell: BarrierCell = None;
        assert_eq!(barrier_init(&mut cell, None, 2, Some("vblank")), GUEST_OK);
        let handle = cell.as_ref().unwrap();
        assert_eq!(handle.name().unwrap().as_deref(), Some("vblank"));
    }

    #[test]
    fn test_init_failures_map_into_guest_space() {
        let mut cell: BarrierCell = None;
        assert_eq!(barrier_init(&mut cell, None, 0, None) as u32, GUEST_EINVAL);

        let shared = BarrierAttr::with_shared(true);
        assert_eq!(
            barrier_init(&mut cell, Some(&shared), 2, Some("never")) as u32,
            GUEST_ENOSYS
        );
        assert!(cell.is_none());
    }

    #[test]
    fn test_wait_leader_sentinel_is_remapped_positive() {
        let mut cell: BarrierCell = None;
        barrier_init(&mut cell, None, 1, None);
        assert_eq!(barrier_wait(&cell), GUEST_BARRIER_SERIAL);
        assert!(GUEST_BARRIER_SERIAL > 0);
    }

    #[test]
    fn test_wait_follower_and_leader_split() {
        let mut cell: BarrierCell = None;
        barrier_init(&mut cell, None, 2, None);
        let other = cell.clone();

        let follower = thread::spawn(move || barrier_wait(&other));
        let mine = barrier_wait(&cell);
        let theirs = follower.join().unwrap();

        let mut outcomes = [mine, theirs];
        outcomes.sort_unstable();
        assert_eq!(outcomes, [GUEST_OK, GUEST_BARRIER_SERIAL]);
    }

    #[test]
    fn test_destroy_clears_cell_and_stale_codes() {
        let mut cell: BarrierCell = None;
        barrier_init(&mut cell, None, 1, None);
        let stale = cell.clone();

        assert_eq!(barrier_destroy(&mut cell), GUEST_OK);
        assert!(cell.is_none());
        assert_eq!(barrier_wait(&cell) as u32, GUEST_EINVAL);

        assert_eq!(barrier_wait(&stale) as u32, GUEST_ESRCH);
        let mut stale_cell = stale;
        assert_eq!(barrier_destroy(&mut stale_cell) as u32, GUEST_ESRCH);
    }

    #[test]
    fn test_destroy_busy_while_waiters_blocked() {
        let mut cell: BarrierCell = None;
        barrier_init(&mut cell, None, 2, None);
        let other = cell.clone();

        let follower = thread::spawn(move || barrier_wait(&other));

        // Wait until the follower is actually blocked inside the barrier.
        let handle = cell.as_ref().unwrap().clone();
        while handle.waiters().unwrap() == 0 {
            thread::yield_now();
        }

        assert_eq!(barrier_destroy(&mut cell) as u32, GUEST_EBUSY);
        assert!(cell.is_some());

        // Still usable: complete the rendezvous, then destroy for real.
        assert_eq!(barrier_wait(&cell), GUEST_BARRIER_SERIAL);
        assert_eq!(follower.join().unwrap(), GUEST_OK);
        assert_eq!(barrier_destroy(&mut cell), GUEST_OK);
    }
}
