//! # GKEL Sync - Guest Kernel Threading Primitives
//!
//! Host-side reimplementation of the emulated kernel's threading
//! primitives. Guest binaries call these primitives through the adapter
//! crate (`gkel-guest`); this crate holds the actual state machines and
//! reproduces the guest kernel's observable semantics: return codes,
//! blocking behavior, and lifecycle rules.
//!
//! The primitive implemented here is the barrier: a fixed number of
//! participants block until all have arrived, then are released together,
//! with exactly one of them designated the leader of that rendezvous.
//!
//! ## Quick Start
//!
//! ```rust
//! use gkel_sync::{BarrierHandle, WaitOutcome};
//!
//! fn main() -> Result<(), gkel_sync::PosixError> {
//!     // A single-participant barrier releases its caller immediately,
//!     // and that caller is the leader of the rendezvous.
//!     let barrier = BarrierHandle::create(1, None)?;
//!     assert_eq!(barrier.wait()?, WaitOutcome::ReleasedAsLeader);
//!
//!     barrier.destroy()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency model
//!
//! Each barrier owns its own `parking_lot` mutex and condvar; unrelated
//! barriers never contend and no global registry exists. The only
//! suspension points are the follower path of [`BarrierHandle::wait`]
//! (blocked on a generation change) and [`BarrierHandle::destroy`]
//! (blocked on released waiters draining). Both release the lock while
//! blocked, per monitor discipline.
//!
//! There is deliberately no timeout or cancellation on `wait`: the guest
//! kernel's contract has none, and a barrier whose capacity is never
//! reached blocks its followers forever. That is expected guest-level
//! behavior, not a defect of this layer.
//!
//! ## Modules
//!
//! - [`attr`]: barrier attribute object (process-private configuration)
//! - [`barrier`]: the barrier state machine and lifecycle

pub mod attr;
pub mod barrier;

pub use attr::BarrierAttr;
pub use barrier::{BarrierHandle, WaitOutcome, MAX_CAPACITY};

// Re-export the shared error vocabulary so callers need only this crate.
pub use gkel_errno::{PosixError, PosixResult};

/// Crate version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
