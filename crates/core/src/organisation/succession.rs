use std::collections::BTreeMap;

use tracing::info;

use crate::domain::person::{Employee, EmployeeId, ManagerSlot, Record, Role};
use crate::domain::team::Team;
use crate::errors::DomainError;
use crate::organisation::{reassign_rank_and_file, rejected, Organisation};

impl Organisation {
    /// Moves `id` from `old_team` to `new_team` and hands `old_team` to its
    /// longest-tenured remaining rank-and-file member. Returns the successor.
    ///
    /// The successor is chosen before anything changes; when there is none the
    /// move is refused with [`DomainError::NoEligibleSuccessor`].
    pub fn move_team(
        &mut self,
        old_team: &str,
        new_team: &str,
        id: EmployeeId,
    ) -> Result<EmployeeId, DomainError> {
        match self.try_move_team(old_team, new_team, id) {
            Ok(successor) => {
                info!(
                    event_name = "org.team.member_moved",
                    employee_id = %id,
                    from_team = old_team,
                    to_team = new_team,
                    successor = %successor,
                    "team member moved and successor installed"
                );
                Ok(successor)
            }
            Err(error) => Err(rejected("move_team", error)),
        }
    }

    fn try_move_team(
        &mut self,
        old_team: &str,
        new_team: &str,
        id: EmployeeId,
    ) -> Result<EmployeeId, DomainError> {
        let old = self
            .teams
            .get(old_team)
            .ok_or_else(|| DomainError::TeamNotFound { name: old_team.to_string() })?;
        let new_lead = self
            .teams
            .get(new_team)
            .map(|team| team.current_manager)
            .ok_or_else(|| DomainError::TeamNotFound { name: new_team.to_string() })?;
        if !old.is_member(id) {
            return Err(DomainError::EmployeeNotInOldTeam { id, team: old_team.to_string() });
        }
        let successor = select_successor(old, id, &self.records)
            .map(|employee| employee.id)
            .ok_or_else(|| DomainError::NoEligibleSuccessor { team: old_team.to_string() })?;

        if let Some(team) = self.teams.get_mut(new_team) {
            team.add_member(id);
        }
        if let Some(team) = self.teams.get_mut(old_team) {
            team.manager = ManagerSlot::Vacant;
            team.remove_member(id);
        }
        if let Some(Record::Employee(employee)) = self.records.get_mut(&id) {
            employee.profile.manager = new_lead;
        }

        self.install_successor(old_team, successor);
        Ok(successor)
    }

    /// Promotes `successor` to the entry rung and puts them in charge of `team_name`.
    fn install_successor(&mut self, team_name: &str, successor: EmployeeId) {
        self.convert_to_manager(successor, Role::Manager, ManagerSlot::Vacant);

        if let Some(team) = self.teams.get_mut(team_name) {
            team.manager = ManagerSlot::Filled(successor);
            team.current_manager = ManagerSlot::Filled(successor);
            reassign_rank_and_file(&mut self.records, &team.members, team.current_manager);
        }
        info!(
            event_name = "org.team.successor_installed",
            team = team_name,
            successor = %successor,
            "successor installed"
        );
    }
}

/// Longest-tenured rank-and-file member of `team`, ignoring `leaving`.
/// Contractors are never candidates since they cannot hold a manager record.
///
/// Earliest start date wins; equal start dates fall back to the lowest id so the
/// outcome never depends on iteration order.
pub(crate) fn select_successor<'a>(
    team: &Team,
    leaving: EmployeeId,
    records: &'a BTreeMap<EmployeeId, Record>,
) -> Option<&'a Employee> {
    team.members
        .iter()
        .filter(|id| **id != leaving)
        .filter_map(|id| records.get(id).and_then(Record::as_employee))
        .filter(|employee| !employee.profile.is_contractor)
        .min_by_key(|employee| (employee.profile.start_date, employee.id))
}
