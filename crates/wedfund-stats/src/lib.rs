//! Derived fund figures. Every function is a single pass over the records it
//! is given; nothing is cached between calls.

pub mod fund;
pub mod team;

use thiserror::Error;

pub use fund::{
    FundSummary, UserSummary, fund_summary, has_user_paid_this_month, progress_percent,
    total_collected, total_disbursed, total_fund_balance, total_paid_out, total_spent,
    user_summary, user_total_contributed,
};
pub use team::{
    MemberContribution, RankedTeam, TeamDetail, TeamRollup, rank_teams, team, team_detail,
    team_rollup, teams,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("no responsible member with id {0}")]
    TeamNotFound(String),
}
