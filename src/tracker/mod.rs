//! Task tracking helpers
//!
//! Deadline countdowns and the local record of which tasks the user has
//! marked as done. Neither talks to the backend.

pub mod assignments;
pub mod countdown;

pub use assignments::{Assignment, AssignmentBook, AssignmentFile};
pub use countdown::{Countdown, parse_deadline};
