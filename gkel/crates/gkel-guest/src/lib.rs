//! # GKEL Guest - Guest-Facing Barrier Surfaces
//!
//! Adapter between the core primitives in `gkel-sync` and the two call
//! surfaces the guest actually links: a POSIX-named surface using the
//! pthread return convention, and the guest kernel's own surface using
//! its signed result-code space. Both are thin translations over the
//! same implementation; neither holds state of its own.
//!
//! Guest pointer arguments are modeled as `Option` cells: `None` is the
//! guest's null pointer, and destroy empties the caller's cell the way
//! the guest kernel nulls the caller's handle.
//!
//! ## Quick Start
//!
//! ```rust
//! use gkel_guest::{codes::GUEST_BARRIER_SERIAL, guest, posix::BarrierCell};
//!
//! let mut cell: BarrierCell = None;
//! assert_eq!(guest::barrier_init(&mut cell, None, 1, Some("solo")), 0);
//!
//! // A single-participant rendezvous completes immediately and the
//! // caller is its leader.
//! assert_eq!(guest::barrier_wait(&cell), GUEST_BARRIER_SERIAL);
//!
//! assert_eq!(guest::barrier_destroy(&mut cell), 0);
//! assert!(cell.is_none());
//! ```
//!
//! ## Modules
//!
//! - [`codes`]: guest result-code space and the errno translation
//! - [`posix`]: POSIX-surface routines (errno convention)
//! - [`guest`]: guest-surface routines (guest-code convention)

pub mod codes;
pub mod guest;
pub mod posix;

pub use codes::{GuestResult, GUEST_BARRIER_SERIAL, GUEST_OK};
pub use posix::{AttrCell, BarrierCell};
