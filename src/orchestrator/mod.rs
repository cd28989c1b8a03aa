//! Application-level orchestration.
//!
//! This module owns the lookup state machine, the controller loop that drives it
//! (issuing fetches and publishing snapshots), and post-lookup processing such
//! as exports. UI/CLI layers call into this module to keep responsibilities separated.

mod controller;
mod post_process;
mod session;

pub(crate) use controller::{lookup_once, run_controller, ControllerOptions, UiCommand};
pub(crate) use post_process::process_lookup_completion;
pub use session::SessionController;
