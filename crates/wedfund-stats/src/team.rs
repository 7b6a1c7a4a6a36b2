use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use wedfund_types::models::{Payment, Role, Team, User};

use crate::StatsError;
use crate::fund::{
    has_user_paid_this_month, progress_percent, sum_amounts, user_total_contributed,
};

/// Every responsible member with their assigned members, leaders ordered by id.
pub fn teams(users: &[User]) -> Vec<Team> {
    let mut leaders: Vec<&User> = users
        .iter()
        .filter(|u| u.role == Role::ResponsibleMember)
        .collect();
    leaders.sort_by(|a, b| a.id.cmp(&b.id));

    leaders
        .into_iter()
        .map(|leader| assemble(users, leader))
        .collect()
}

pub fn team(users: &[User], leader_id: &str) -> Result<Team, StatsError> {
    let leader = users
        .iter()
        .find(|u| u.id == leader_id && u.role == Role::ResponsibleMember)
        .ok_or_else(|| StatsError::TeamNotFound(leader_id.to_string()))?;
    Ok(assemble(users, leader))
}

fn assemble(users: &[User], leader: &User) -> Team {
    Team {
        leader: leader.clone(),
        members: users
            .iter()
            .filter(|u| u.is_member_of(&leader.id))
            .cloned()
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRollup {
    pub leader_id: String,
    pub leader_name: String,
    pub member_count: usize,
    pub total_paid: i64,
    pub target: i64,
    pub progress: f64,
}

/// Leader plus members' contributions against `(members + 1) * target_per_person`.
pub fn team_rollup(team: &Team, payments: &[Payment], target_per_person: i64) -> TeamRollup {
    let total_paid = sum_amounts(team.people().map(|u| user_total_contributed(payments, &u.id)));
    let target = (team.headcount() as i64).saturating_mul(target_per_person);
    TeamRollup {
        leader_id: team.leader.id.clone(),
        leader_name: team.leader.name.clone(),
        member_count: team.members.len(),
        total_paid,
        target,
        progress: progress_percent(total_paid, target),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTeam {
    pub rank: usize,
    #[serde(flatten)]
    pub rollup: TeamRollup,
}

/// Highest total first; equal totals fall back to ascending leader id so the
/// order never depends on input order.
pub fn rank_teams(users: &[User], payments: &[Payment], target_per_person: i64) -> Vec<RankedTeam> {
    let mut rollups: Vec<TeamRollup> = teams(users)
        .iter()
        .map(|t| team_rollup(t, payments, target_per_person))
        .collect();
    rollups.sort_by(ranking_order);

    rollups
        .into_iter()
        .enumerate()
        .map(|(i, rollup)| RankedTeam { rank: i + 1, rollup })
        .collect()
}

fn ranking_order(a: &TeamRollup, b: &TeamRollup) -> Ordering {
    b.total_paid
        .cmp(&a.total_paid)
        .then_with(|| a.leader_id.cmp(&b.leader_id))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberContribution {
    pub user: User,
    pub contributed: i64,
    pub paid_this_month: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamDetail {
    pub rollup: TeamRollup,
    pub leader: MemberContribution,
    pub members: Vec<MemberContribution>,
}

pub fn team_detail(
    team: &Team,
    payments: &[Payment],
    today: NaiveDate,
    target_per_person: i64,
) -> TeamDetail {
    let contribution = |user: &User| MemberContribution {
        user: user.clone(),
        contributed: user_total_contributed(payments, &user.id),
        paid_this_month: has_user_paid_this_month(payments, &user.id, today),
    };
    TeamDetail {
        rollup: team_rollup(team, payments, target_per_person),
        leader: contribution(&team.leader),
        members: team.members.iter().map(contribution).collect(),
    }
}
