use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::person::{EmployeeId, ManagerSlot, Role};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("employee id {id} is already in use")]
    DuplicateId { id: EmployeeId },
    #[error("invalid role `{role}` for this record")]
    InvalidRole { role: String },
    #[error("manager reference `{manager}` does not name an existing manager")]
    InvalidManagerReference { manager: ManagerSlot },
    #[error("contractor {id} cannot be a manager")]
    ContractorCannotBeManager { id: EmployeeId },
    #[error("team name `{name}` is already taken")]
    DuplicateTeamName { name: String },
    #[error("team `{name}` does not exist")]
    TeamNotFound { name: String },
    #[error("employee {id} is not a member of team `{team}`")]
    EmployeeNotInOldTeam { id: EmployeeId, team: String },
    #[error("employee {id} is already on holiday")]
    AlreadyOnHoliday { id: EmployeeId },
    #[error("employee {id} is not on holiday")]
    NotOnHoliday { id: EmployeeId },
    #[error("{role} {id} already holds the top promotable rank")]
    CannotPromoteTopRole { id: EmployeeId, role: Role },
    #[error("{} is not able to be promoted to {}", .from.title(), .to.title())]
    PromotionIneligible { id: EmployeeId, from: Role, to: Role },
    #[error("no record found for employee {id}")]
    NotFound { id: EmployeeId },
    #[error("team `{team}` has no rank-and-file member left to succeed its manager")]
    NoEligibleSuccessor { team: String },
}

impl DomainError {
    /// Stable machine-readable tag for callers that report outcomes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "duplicate_id",
            Self::InvalidRole { .. } => "invalid_role",
            Self::InvalidManagerReference { .. } => "invalid_manager_reference",
            Self::ContractorCannotBeManager { .. } => "contractor_cannot_be_manager",
            Self::DuplicateTeamName { .. } => "duplicate_team_name",
            Self::TeamNotFound { .. } => "team_not_found",
            Self::EmployeeNotInOldTeam { .. } => "employee_not_in_old_team",
            Self::AlreadyOnHoliday { .. } => "already_on_holiday",
            Self::NotOnHoliday { .. } => "not_on_holiday",
            Self::CannotPromoteTopRole { .. } => "cannot_promote_top_role",
            Self::PromotionIneligible { .. } => "promotion_ineligible",
            Self::NotFound { .. } => "not_found",
            Self::NoEligibleSuccessor { .. } => "no_eligible_successor",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(error) => error.code(),
            Self::Configuration(_) => "config_validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConfigError;
    use crate::domain::person::{EmployeeId, Role};
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn promotion_ineligible_reads_like_the_ladder() {
        let error = DomainError::PromotionIneligible {
            id: EmployeeId(3),
            from: Role::Manager,
            to: Role::Director,
        };

        assert_eq!(error.to_string(), "Manager is not able to be promoted to Director");
        assert_eq!(error.code(), "promotion_ineligible");
    }

    #[test]
    fn vice_president_title_is_spelled_out() {
        let error = DomainError::PromotionIneligible {
            id: EmployeeId(4),
            from: Role::Director,
            to: Role::VicePresident,
        };

        assert_eq!(error.to_string(), "Director is not able to be promoted to Vice President");
    }

    #[test]
    fn application_error_keeps_domain_code() {
        let error = ApplicationError::from(DomainError::DuplicateId { id: EmployeeId(1) });

        assert_eq!(error.error_class(), "duplicate_id");
        assert_eq!(error.to_string(), "employee id 1 is already in use");
    }

    #[test]
    fn configuration_failures_are_classified() {
        let error = ApplicationError::from(ConfigError::Validation("bad".to_string()));

        assert_eq!(error.error_class(), "config_validation");
    }
}
