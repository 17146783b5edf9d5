//! Users referenced as owners of directories and files and as creators of versions.

mod user;

pub use user::User;
