//! Film club ranking and notification grouping.
//!
//! `workflows::ranking` turns a club's candidate films and ballots into an ordered ranking,
//! `workflows::notifications` groups stored events into inbox messages and resolves their
//! links. Both read club records through [`workflows::club::ClubRecords`].

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
