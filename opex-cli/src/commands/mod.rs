pub mod alerts;
pub mod check;
pub mod config;
pub mod fridays;
pub mod list;
pub mod next;
pub mod validate;
