use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::person::{EmployeeId, ManagerSlot, Record, RecordKind, Role};
use crate::domain::team::Team;
use crate::errors::DomainError;
use crate::organisation::{rejected, Organisation};

/// Minimum organisational span a manager needs before moving up a rung.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionGate {
    pub min_subordinate_managers: usize,
    pub min_team_members: usize,
}

impl PromotionGate {
    pub fn admits(&self, span: &OrganisationalSpan) -> bool {
        span.subordinate_managers.len() >= self.min_subordinate_managers
            && span.team_members >= self.min_team_members
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionPolicy {
    pub director: PromotionGate,
    pub vice_president: PromotionGate,
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self {
            director: PromotionGate { min_subordinate_managers: 2, min_team_members: 20 },
            vice_president: PromotionGate { min_subordinate_managers: 4, min_team_members: 40 },
        }
    }
}

/// What a manager's current rank allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility<'a> {
    Gated { next: Role, gate: &'a PromotionGate },
    /// No rung a manager record can move up to.
    Capped,
}

impl PromotionPolicy {
    /// Rank-and-file employees are promoted by conversion, not through a gate.
    pub fn eligibility(&self, current: Role) -> Eligibility<'_> {
        let gate = match current {
            Role::Manager => &self.director,
            Role::Director => &self.vice_president,
            Role::Employee | Role::VicePresident | Role::Ceo => return Eligibility::Capped,
        };
        match current.next_rung() {
            Some(next) => Eligibility::Gated { next, gate },
            None => Eligibility::Capped,
        }
    }
}

/// Managers reporting to someone, plus the headcount of the teams they lead.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationalSpan {
    pub subordinate_managers: Vec<EmployeeId>,
    pub team_members: usize,
}

impl Organisation {
    /// Moves `id` to `new_role` reporting to `new_manager`.
    ///
    /// `kind` names the record `id` is expected to be. A rank-and-file
    /// employee is re-tagged as a manager; a manager must first clear the gate
    /// guarding their current rank.
    pub fn promote(
        &mut self,
        id: EmployeeId,
        new_manager: impl Into<ManagerSlot>,
        kind: RecordKind,
        new_role: &str,
    ) -> Result<(), DomainError> {
        let new_manager = new_manager.into();
        match self.try_promote(id, new_manager, kind, new_role) {
            Ok((from, to)) => {
                info!(
                    event_name = "org.promotion.applied",
                    employee_id = %id,
                    from = %from,
                    to = %to,
                    reports_to = %new_manager,
                    "promotion applied"
                );
                Ok(())
            }
            Err(error) => Err(rejected("promote", error)),
        }
    }

    /// Subordinate managers of `id` and the summed size of the teams they lead.
    pub fn span_of(&self, id: EmployeeId) -> OrganisationalSpan {
        let subordinate_managers = self.subordinate_managers(id);
        let team_members = self
            .teams
            .values()
            .filter(|team| team.manager.id().is_some_and(|lead| subordinate_managers.contains(&lead)))
            .map(Team::size)
            .sum();
        OrganisationalSpan { subordinate_managers, team_members }
    }

    fn try_promote(
        &mut self,
        id: EmployeeId,
        new_manager: ManagerSlot,
        kind: RecordKind,
        new_role: &str,
    ) -> Result<(Role, Role), DomainError> {
        let record = self
            .records
            .get(&id)
            .filter(|record| record.kind() == kind)
            .ok_or(DomainError::NotFound { id })?;
        match record {
            Record::Employee(employee) => {
                let role = Role::parse_ladder(new_role)?;
                if employee.profile.is_contractor {
                    return Err(DomainError::ContractorCannotBeManager { id });
                }
                self.convert_to_manager(id, role, new_manager);
                Ok((Role::Employee, role))
            }
            Record::Manager(manager) => {
                let current = manager.role;
                if let Eligibility::Gated { next, gate } = self.promotion.eligibility(current) {
                    if !gate.admits(&self.span_of(id)) {
                        return Err(DomainError::PromotionIneligible { id, from: current, to: next });
                    }
                } else {
                    return Err(DomainError::CannotPromoteTopRole { id, role: current });
                }

                let role = Role::parse_ladder(new_role)?;
                if let Some(Record::Manager(manager)) = self.records.get_mut(&id) {
                    manager.role = role;
                    manager.profile.manager = new_manager;
                }
                Ok((current, role))
            }
        }
    }
}
