//! Version resolvers for both sides of the check
//!
//! The two resolvers are independent and share no state, so the check runs
//! them concurrently.

mod base;
mod candidate;

pub use base::BaseVersionResolver;
pub use candidate::CandidateVersionResolver;
