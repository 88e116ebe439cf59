//! Database models split into domain-specific modules.

pub mod appointment;
pub mod lab_result;
pub mod patient;
pub mod staff;
pub mod treatment;
pub mod user;

pub use appointment::*;
pub use lab_result::*;
pub use patient::*;
pub use staff::*;
pub use treatment::*;
pub use user::*;
