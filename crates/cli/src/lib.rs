pub mod cli;
pub mod commands;
pub mod error;
pub mod menu;
pub mod render;
pub mod signals;

pub use error::Error;

use nix::unistd::{User, getuid};

/// Login name of the invoking user.
pub fn current_user() -> Option<String> {
    User::from_uid(getuid()).ok().flatten().map(|user| user.name)
}
