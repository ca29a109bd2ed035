//! Membership synchronization between the roster and the directory.

pub mod membership;
