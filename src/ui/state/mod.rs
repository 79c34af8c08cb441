// SPDX-License-Identifier: MPL-2.0
//! Plain state containers for the viewer UI. Kept free of widget code so
//! the interaction rules can be unit-tested directly.

pub mod modal;
pub mod progress;
pub mod transition;

pub use modal::ModalView;
pub use progress::ProgressSim;
pub use transition::{fit_size, Crossfade, Slot};
