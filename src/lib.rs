//! Pull request check requiring the version file to carry a strictly greater
//! semantic version than the target branch.
//!
//! The version on the target branch and the version in the pull request are
//! resolved concurrently through a [`hosting::HostingApi`], then compared by
//! [`version::checker::run_check`].

pub mod action;
pub mod config;
pub mod hosting;
pub mod logging;
pub mod version;
