//! # services
//!
//! The rules of the forum core, as pure value transitions, plus thin async
//! services that load snapshots through the ports, apply one transition and
//! persist the result.
//!
//! No function here reads a clock: every time-dependent operation takes
//! `now` from its caller.

pub mod content;
pub mod rate_limit;
pub mod reputation;
pub mod token_auth;
pub mod topic_bump;
pub mod voting;

pub mod maintenance_service;
pub mod posting_service;
pub mod token_service;
pub mod vote_service;

pub use maintenance_service::MaintenanceService;
pub use posting_service::PostingService;
pub use token_service::TokenService;
pub use vote_service::{VoteKind, VoteService};
pub use voting::VoteOutcome;
