pub mod club;
pub mod notifications;
pub mod ranking;
