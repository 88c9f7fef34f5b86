//! Adapter utilities for the `lanescroll` crate.
//!
//! The `lanescroll` crate is UI-agnostic and only does the math and state. This crate adds
//! the small, framework-neutral pieces an adapter needs around it:
//!
//! - a [`Controller`] that runs gesture input, motion, layout and scroll bar sync inside one
//!   synchronous frame
//! - a [`FrameScheduler`] tracking which nodes asked for another frame
//! - scroll anchoring for lane lists across data changes (e.g. prepend in chat/timelines)
//!
//! No UI toolkit bindings live here.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod anchor;
mod controller;
mod frame;

#[cfg(test)]
mod tests;

pub use anchor::{ScrollAnchor, apply_anchor, capture_first_visible_anchor};
pub use controller::Controller;
pub use frame::{FrameScheduler, FrameTick};
