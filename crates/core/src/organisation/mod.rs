//! The organisation aggregate: the only place employee, manager, and team
//! records are mutated. Every operation validates before it writes, so a
//! rejected call leaves the directory exactly as it was.

pub mod holiday;
pub mod promotion;
pub mod succession;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::person::{
    Employee, EmployeeId, Manager, ManagerSlot, Profile, Record, Role, TopExecutive,
};
use crate::domain::team::Team;
use crate::errors::DomainError;
use crate::organisation::promotion::PromotionPolicy;

/// Input for [`Organisation::add_employee`] and [`Organisation::add_manager`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hire {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub is_contractor: bool,
    pub manager: ManagerSlot,
    pub on_holiday: bool,
}

impl Hire {
    pub fn new(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: role.into(),
            start_date,
            is_contractor: false,
            manager: ManagerSlot::Vacant,
            on_holiday: false,
        }
    }

    pub fn reporting_to(mut self, manager: impl Into<ManagerSlot>) -> Self {
        self.manager = manager.into();
        self
    }

    pub fn contractor(mut self, is_contractor: bool) -> Self {
        self.is_contractor = is_contractor;
        self
    }

    pub fn on_holiday(mut self, on_holiday: bool) -> Self {
        self.on_holiday = on_holiday;
        self
    }

    fn into_profile(self) -> Profile {
        Profile {
            first_name: self.first_name,
            last_name: self.last_name,
            start_date: self.start_date,
            is_contractor: self.is_contractor,
            manager: self.manager,
            on_holiday: self.on_holiday,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Organisation {
    top_executive: TopExecutive,
    records: BTreeMap<EmployeeId, Record>,
    teams: BTreeMap<String, Team>,
    promotion: PromotionPolicy,
}

impl Organisation {
    pub fn new(top_executive: TopExecutive) -> Self {
        Self::with_policy(top_executive, PromotionPolicy::default())
    }

    pub fn with_policy(top_executive: TopExecutive, promotion: PromotionPolicy) -> Self {
        info!(
            event_name = "org.directory.created",
            top_executive_id = %top_executive.id(),
            "organisation directory created"
        );
        Self { top_executive, records: BTreeMap::new(), teams: BTreeMap::new(), promotion }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let top = &config.top_executive;
        Self::with_policy(
            TopExecutive::new(
                top.first_name.clone(),
                top.last_name.clone(),
                top.start_date,
                EmployeeId(top.id),
            ),
            config.promotion,
        )
    }

    pub fn add_employee(&mut self, hire: Hire) -> Result<(), DomainError> {
        let id = hire.id;
        let result = self.validate_employee(&hire).map(|()| {
            self.records.insert(id, Record::Employee(Employee { id, profile: hire.into_profile() }));
        });
        match result {
            Ok(()) => {
                info!(event_name = "org.employee.added", employee_id = %id, "employee added");
                Ok(())
            }
            Err(error) => Err(rejected("add_employee", error)),
        }
    }

    pub fn add_manager(&mut self, hire: Hire) -> Result<(), DomainError> {
        let id = hire.id;
        let result = self.validate_manager(&hire).map(|role| {
            self.records
                .insert(id, Record::Manager(Manager { id, role, profile: hire.into_profile() }));
            role
        });
        match result {
            Ok(role) => {
                info!(event_name = "org.manager.added", employee_id = %id, %role, "manager added");
                Ok(())
            }
            Err(error) => Err(rejected("add_manager", error)),
        }
    }

    /// Creates a team led by `manager`. Member ids are stored as given.
    pub fn add_team(
        &mut self,
        name: &str,
        manager: impl Into<ManagerSlot>,
        members: impl IntoIterator<Item = EmployeeId>,
    ) -> Result<(), DomainError> {
        if self.teams.contains_key(name) {
            return Err(rejected(
                "add_team",
                DomainError::DuplicateTeamName { name: name.to_string() },
            ));
        }

        let team = Team::new(name, manager.into(), members);
        info!(
            event_name = "org.team.added",
            team = name,
            manager = %team.manager,
            members = team.size(),
            "team added"
        );
        self.teams.insert(name.to_string(), team);
        Ok(())
    }

    pub fn top_executive(&self) -> &TopExecutive {
        &self.top_executive
    }

    pub fn record(&self, id: EmployeeId) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.records.get(&id).and_then(Record::as_employee)
    }

    pub fn manager(&self, id: EmployeeId) -> Option<&Manager> {
        self.records.get(&id).and_then(Record::as_manager)
    }

    /// Profile of any person, the top executive included.
    pub fn profile(&self, id: EmployeeId) -> Option<&Profile> {
        if id == self.top_executive.id() {
            return Some(self.top_executive.profile());
        }
        self.records.get(&id).map(Record::profile)
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.get(name)
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    /// Team whose roster contains `id`; the first by name if several do.
    pub fn team_of(&self, id: EmployeeId) -> Result<&Team, DomainError> {
        self.teams.values().find(|team| team.is_member(id)).ok_or(DomainError::NotFound { id })
    }

    pub fn team_led_by(&self, id: EmployeeId) -> Option<&Team> {
        self.teams.values().find(|team| team.is_led_by(id))
    }

    pub fn subordinate_managers(&self, id: EmployeeId) -> Vec<EmployeeId> {
        self.records
            .values()
            .filter_map(Record::as_manager)
            .filter(|manager| manager.profile.manager.is(id))
            .map(|manager| manager.id)
            .collect()
    }

    /// Members of `name` that are tracked rank-and-file employees.
    pub fn rank_and_file_members(&self, name: &str) -> Result<Vec<EmployeeId>, DomainError> {
        let team =
            self.teams.get(name).ok_or_else(|| DomainError::TeamNotFound { name: name.to_string() })?;
        Ok(team.members.iter().copied().filter(|id| self.employee(*id).is_some()).collect())
    }

    fn id_in_use(&self, id: EmployeeId) -> bool {
        id == self.top_executive.id() || self.records.contains_key(&id)
    }

    fn is_leader(&self, id: EmployeeId) -> bool {
        id == self.top_executive.id() || self.manager(id).is_some()
    }

    fn validate_employee(&self, hire: &Hire) -> Result<(), DomainError> {
        if self.id_in_use(hire.id) {
            return Err(DomainError::DuplicateId { id: hire.id });
        }
        Role::parse_rank_and_file(&hire.role)?;
        match hire.manager.id() {
            Some(manager) if self.is_leader(manager) => Ok(()),
            _ => Err(DomainError::InvalidManagerReference { manager: hire.manager }),
        }
    }

    fn validate_manager(&self, hire: &Hire) -> Result<Role, DomainError> {
        if self.id_in_use(hire.id) {
            return Err(DomainError::DuplicateId { id: hire.id });
        }
        let role = Role::parse_ladder(&hire.role)?;
        if hire.is_contractor {
            return Err(DomainError::ContractorCannotBeManager { id: hire.id });
        }
        Ok(role)
    }

    /// Re-tags a rank-and-file record as a manager under the same id.
    fn convert_to_manager(&mut self, id: EmployeeId, role: Role, manager: ManagerSlot) {
        let converted = match self.records.get(&id) {
            Some(Record::Employee(employee)) => Manager::from_employee(employee.clone(), role, manager),
            _ => return,
        };
        self.records.insert(id, Record::Manager(converted));
    }
}

/// Points every rank-and-file record among `members` at `manager`.
pub(crate) fn reassign_rank_and_file(
    records: &mut BTreeMap<EmployeeId, Record>,
    members: &BTreeSet<EmployeeId>,
    manager: ManagerSlot,
) {
    for id in members {
        if let Some(Record::Employee(employee)) = records.get_mut(id) {
            employee.profile.manager = manager;
        }
    }
}

pub(crate) fn rejected(operation: &'static str, error: DomainError) -> DomainError {
    warn!(
        event_name = "org.operation.rejected",
        operation,
        error_code = error.code(),
        %error,
        "organisation operation rejected"
    );
    error
}
