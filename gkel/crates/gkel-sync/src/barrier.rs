//! Barrier Object - rendezvous state machine and lifecycle
//!
//! The barrier releases a fixed number of participants together. Release
//! is tracked by a generation counter, bumped exactly once per completed
//! rendezvous by the arrival that fills the barrier (the leader). A
//! blocked follower proceeds only when the generation it arrived in has
//! ended, which makes the wait immune to spurious wakeups: the check is a
//! single integer comparison, not a wake count.
//!
//! ## Lifecycle
//!
//! ```text
//!  create ──► Live ──────────────► Dead
//!              │  ▲                 (every later operation: ESRCH)
//!         wait │  │ generation bump
//!              ▼  │
//!          followers blocked
//! ```
//!
//! Destroy is rejected with `Busy` while parties are actively
//! rendezvousing (`waiting > 0`) or while another destroy is in flight.
//! It does, however, wait for *released* followers that have not yet
//! finished their bookkeeping (`in_wait_refcount > 0`) before flipping
//! the object to `Dead`, so no thread can observe freed state.
//!
//! All fields are mutated under the object's own mutex; handles are the
//! only cross-thread-shared value and validity is re-checked under the
//! lock on every entry.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use gkel_errno::{PosixError, PosixResult};

/// Largest accepted participant count (the guest's signed 32-bit ceiling).
pub const MAX_CAPACITY: u32 = i32::MAX as u32;

/// Validity tag guarding against stale-handle use.
///
/// Replaces the magic bit patterns a manually-managed implementation
/// would stamp into freed memory: the tag lives inside the lock-guarded
/// state, so a handle that outlives `destroy` observes `Dead` instead of
/// reused memory that accidentally "works".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Validity {
    Live,
    Dead,
}

/// Outcome of a successful [`BarrierHandle::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Released together with the rest of the rendezvous.
    Released,
    /// This arrival completed the rendezvous and released the others.
    ///
    /// Exactly one participant per generation receives this outcome. The
    /// guest contract uses it to designate one thread for
    /// post-rendezvous cleanup without extra coordination.
    ReleasedAsLeader,
}

impl WaitOutcome {
    /// Whether this participant was the rendezvous leader.
    pub fn is_leader(self) -> bool {
        matches!(self, WaitOutcome::ReleasedAsLeader)
    }
}

/// Lock-guarded barrier state.
///
/// Invariants at every point where the lock is free:
/// - `0 <= waiting <= capacity`, and `waiting == capacity` never
///   persists (reset to 0 in the same critical section as the
///   generation bump)
/// - every released follower decrements `in_wait_refcount` exactly once
/// - once `validity` is `Dead`, `waiting` and `in_wait_refcount` are
///   never mutated again
#[derive(Debug)]
struct BarrierState {
    validity: Validity,
    /// Participants required to release one generation. Fixed at create.
    capacity: u32,
    /// Completed rendezvous count; the release signal followers block on.
    generation: u64,
    /// Threads blocked in the current generation.
    waiting: u32,
    /// Released followers that have not yet finished bookkeeping.
    in_wait_refcount: u32,
    /// A destroy attempt is in progress.
    tearing_down: bool,
    /// Diagnostic only; no effect on behavior.
    name: Option<String>,
}

/// The barrier object proper: one mutex + condvar pair per barrier.
///
/// The condvar doubles as the release signal for followers and as the
/// drain signal for a destroyer, which is safe because both waits
/// re-check their own predicate under the mutex.
#[derive(Debug)]
struct Barrier {
    state: Mutex<BarrierState>,
    cond: Condvar,
}

/// Opaque, cloneable reference to a barrier object.
///
/// Cloning a handle is the moral equivalent of the guest copying a
/// pointer: all clones refer to the same object. The object's memory is
/// released once it is destroyed and the last handle is dropped, so a
/// stale handle can never dangle; operations through it report
/// `NoSuchEntity` instead.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use gkel_sync::BarrierHandle;
///
/// let barrier = BarrierHandle::create(2, None).unwrap();
/// let partner = barrier.clone();
///
/// let follower = thread::spawn(move || partner.wait().unwrap());
/// let mine = barrier.wait().unwrap();
///
/// // Exactly one of the two participants is the leader.
/// let theirs = follower.join().unwrap();
/// assert_ne!(mine.is_leader(), theirs.is_leader());
/// ```
#[derive(Debug, Clone)]
pub struct BarrierHandle {
    inner: Arc<Barrier>,
}

impl BarrierHandle {
    /// Create a barrier for `capacity` participants.
    ///
    /// `attr` may be absent, in which case the process-private default
    /// applies; if present, its flag is copied here and never read again.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` - `capacity` is 0 or exceeds [`MAX_CAPACITY`]
    /// - `NotSupported` - `attr` requests a process-shared barrier,
    ///   which the guest kernel rejects rather than implements
    pub fn create(capacity: u32, attr: Option<&crate::BarrierAttr>) -> PosixResult<Self> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(PosixError::InvalidArgument);
        }
        if let Some(attr) = attr {
            if attr.shared() {
                log::error!("process-shared barriers are not supported");
                return Err(PosixError::NotSupported);
            }
        }

        Ok(Self {
            inner: Arc::new(Barrier {
                state: Mutex::new(BarrierState {
                    validity: Validity::Live,
                    capacity,
                    generation: 0,
                    waiting: 0,
                    in_wait_refcount: 0,
                    tearing_down: false,
                    name: None,
                }),
                cond: Condvar::new(),
            }),
        })
    }

    /// Block until `capacity` participants have arrived.
    ///
    /// The arrival that fills the barrier becomes the leader: it resets
    /// the waiter count, bumps the generation, wakes every follower, and
    /// returns [`WaitOutcome::ReleasedAsLeader`] without ever blocking.
    /// Every other participant blocks until the generation it arrived in
    /// has ended and returns [`WaitOutcome::Released`].
    ///
    /// There is no timeout and no cancellation; a rendezvous that never
    /// fills blocks its followers forever, per the guest contract.
    ///
    /// # Errors
    ///
    /// - `NoSuchEntity` - the handle refers to a destroyed barrier
    pub fn wait(&self) -> PosixResult<WaitOutcome> {
        let mut state = self.inner.state.lock();
        if state.validity != Validity::Live {
            return Err(PosixError::NoSuchEntity);
        }

        state.waiting += 1;
        if state.waiting == state.capacity {
            // Leader path: publish the release while still holding the
            // lock, so no follower can observe the new generation before
            // the waiter count is reset.
            state.waiting = 0;
            state.generation += 1;
            self.inner.cond.notify_all();
            return Ok(WaitOutcome::ReleasedAsLeader);
        }

        // Follower path: only a change of the generation we arrived in
        // counts as release; a spurious wake re-enters the wait.
        let arrived_in = state.generation;
        state.in_wait_refcount += 1;
        while state.generation == arrived_in {
            self.inner.cond.wait(&mut state);
        }

        state.in_wait_refcount -= 1;
        if state.in_wait_refcount == 0 && state.tearing_down {
            // Last released follower out; a destroyer is waiting on the
            // same condvar for exactly this.
            self.inner.cond.notify_all();
        }
        Ok(WaitOutcome::Released)
    }

    /// Tear down the barrier.
    ///
    /// Succeeds only on a quiescent barrier. Parties still rendezvousing
    /// are a caller bug the guest kernel reports rather than queues:
    /// destroy fails with `Busy` and the barrier stays fully usable.
    /// Released followers still inside their bookkeeping are waited for,
    /// so once this returns `Ok` no thread can touch the object again;
    /// the allocation is freed when the last handle drops.
    ///
    /// # Errors
    ///
    /// - `NoSuchEntity` - already destroyed
    /// - `Busy` - threads are blocked in [`wait`](Self::wait), or a
    ///   concurrent destroy is in flight
    pub fn destroy(&self) -> PosixResult<()> {
        let mut state = self.inner.state.lock();
        if state.validity != Validity::Live {
            return Err(PosixError::NoSuchEntity);
        }
        if state.tearing_down {
            return Err(PosixError::Busy);
        }

        state.tearing_down = true;
        loop {
            if state.waiting > 0 {
                state.tearing_down = false;
                return Err(PosixError::Busy);
            }
            if state.in_wait_refcount == 0 {
                break;
            }
            // Quiescence wait: released followers are still between
            // wakeup and their refcount decrement. The flag and the
            // count live under the same mutex, so the drain notify
            // cannot be missed.
            log::debug!(
                "barrier destroy draining {} released waiter(s)",
                state.in_wait_refcount
            );
            self.inner.cond.wait(&mut state);
        }

        state.validity = Validity::Dead;
        state.tearing_down = false;
        Ok(())
    }

    /// Replace the diagnostic name.
    ///
    /// `None` is a no-op rather than an error, matching the guest
    /// kernel's treatment of a null name argument.
    ///
    /// # Errors
    ///
    /// - `NoSuchEntity` - the handle refers to a destroyed barrier
    pub fn set_name(&self, name: Option<&str>) -> PosixResult<()> {
        let mut state = self.inner.state.lock();
        if state.validity != Validity::Live {
            return Err(PosixError::NoSuchEntity);
        }
        if let Some(name) = name {
            state.name = Some(name.to_owned());
        }
        Ok(())
    }

    /// Current diagnostic name, if one was ever set.
    pub fn name(&self) -> PosixResult<Option<String>> {
        let state = self.inner.state.lock();
        if state.validity != Validity::Live {
            return Err(PosixError::NoSuchEntity);
        }
        Ok(state.name.clone())
    }

    /// Participant count fixed at creation.
    pub fn capacity(&self) -> PosixResult<u32> {
        let state = self.inner.state.lock();
        if state.validity != Validity::Live {
            return Err(PosixError::NoSuchEntity);
        }
        Ok(state.capacity)
    }

    /// Completed rendezvous count.
    pub fn generation(&self) -> PosixResult<u64> {
        let state = self.inner.state.lock();
        if state.validity != Validity::Live {
            return Err(PosixError::NoSuchEntity);
        }
        Ok(state.generation)
    }

    /// Threads currently blocked in the present generation.
    pub fn waiters(&self) -> PosixResult<u32> {
        let state = self.inner.state.lock();
        if state.validity != Validity::Live {
            return Err(PosixError::NoSuchEntity);
        }
        Ok(state.waiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BarrierAttr;

    #[test]
    fn test_create_rejects_zero_capacity() {
        assert_eq!(
            BarrierHandle::create(0, None).unwrap_err(),
            PosixError::InvalidArgument
        );
    }

    #[test]
    fn test_create_rejects_capacity_above_int_max() {
        assert_eq!(
            BarrierHandle::create(MAX_CAPACITY + 1, None).unwrap_err(),
            PosixError::InvalidArgument
        );
        // The ceiling itself is accepted.
        assert!(BarrierHandle::create(MAX_CAPACITY, None).is_ok());
    }

    #[test]
    fn test_create_rejects_shared_attribute() {
        let shared = BarrierAttr::with_shared(true);
        assert_eq!(
            BarrierHandle::create(4, Some(&shared)).unwrap_err(),
            PosixError::NotSupported
        );

        // A private attribute is fine, present or absent.
        let private = BarrierAttr::new();
        assert!(BarrierHandle::create(4, Some(&private)).is_ok());
        assert!(BarrierHandle::create(4, None).is_ok());
    }

    #[test]
    fn test_single_capacity_wait_is_always_leader() {
        let barrier = BarrierHandle::create(1, None).unwrap();
        for generation in 1..=100 {
            assert_eq!(barrier.wait().unwrap(), WaitOutcome::ReleasedAsLeader);
            assert_eq!(barrier.generation().unwrap(), generation);
        }
    }

    #[test]
    fn test_fresh_barrier_counters() {
        let barrier = BarrierHandle::create(8, None).unwrap();
        assert_eq!(barrier.capacity().unwrap(), 8);
        assert_eq!(barrier.generation().unwrap(), 0);
        assert_eq!(barrier.waiters().unwrap(), 0);
        assert_eq!(barrier.name().unwrap(), None);
    }

    #[test]
    fn test_set_name_roundtrip_and_null_noop() {
        let barrier = BarrierHandle::create(2, None).unwrap();

        barrier.set_name(Some("frame-sync")).unwrap();
        assert_eq!(barrier.name().unwrap().as_deref(), Some("frame-sync"));

        // A null name leaves the stored name untouched.
        barrier.set_name(None).unwrap();
        assert_eq!(barrier.name().unwrap().as_deref(), Some("frame-sync"));

        barrier.set_name(Some("reload")).unwrap();
        assert_eq!(barrier.name().unwrap().as_deref(), Some("reload"));
    }

    #[test]
    fn test_destroy_marks_every_operation_stale() {
        let barrier = BarrierHandle::create(1, None).unwrap();
        let stale = barrier.clone();
        barrier.destroy().unwrap();

        assert_eq!(stale.wait().unwrap_err(), PosixError::NoSuchEntity);
        assert_eq!(stale.destroy().unwrap_err(), PosixError::NoSuchEntity);
        assert_eq!(
            stale.set_name(Some("late")).unwrap_err(),
            PosixError::NoSuchEntity
        );
        assert_eq!(stale.name().unwrap_err(), PosixError::NoSuchEntity);
        assert_eq!(stale.capacity().unwrap_err(), PosixError::NoSuchEntity);
        assert_eq!(stale.generation().unwrap_err(), PosixError::NoSuchEntity);
        assert_eq!(stale.waiters().unwrap_err(), PosixError::NoSuchEntity);
    }

    #[test]
    fn test_destroy_of_unused_barrier_succeeds() {
        let barrier = BarrierHandle::create(16, None).unwrap();
        assert_eq!(barrier.destroy(), Ok(()));
        assert_eq!(barrier.destroy().unwrap_err(), PosixError::NoSuchEntity);
    }
}
