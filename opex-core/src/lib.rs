//! Core types for OPEX alerts.
//!
//! This crate holds everything needed to decide which options-expiration
//! events deserve a notification:
//! - `CalendarStore` with dated, categorized events loaded from a JSON calendar
//! - `Tier` definitions controlling alert verbosity
//! - `AlertSelector`, a pure mapping from (today, alert kind, tier) to events
//!
//! Rendering and delivery are left to the caller.

pub mod business_day;
pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod opex_date;
pub mod selector;
pub mod snapshot;
pub mod source;
pub mod tier;

pub use calendar::CalendarStore;
pub use error::{OpexError, OpexResult};
pub use event::{Category, Event};
pub use selector::{AlertKind, AlertRequest, AlertResult, AlertSelector, DateWindow, WeeklyBoundary};
pub use tier::{Tier, TierDefinitions, TierOverrides};
