use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::team::Team;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub u64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to whoever a person (or a team) answers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerSlot {
    #[default]
    Vacant,
    Filled(EmployeeId),
}

impl ManagerSlot {
    pub fn id(self) -> Option<EmployeeId> {
        match self {
            Self::Vacant => None,
            Self::Filled(id) => Some(id),
        }
    }

    pub fn is_vacant(self) -> bool {
        matches!(self, Self::Vacant)
    }

    pub fn is(self, id: EmployeeId) -> bool {
        self == Self::Filled(id)
    }
}

impl From<Option<EmployeeId>> for ManagerSlot {
    fn from(value: Option<EmployeeId>) -> Self {
        value.map_or(Self::Vacant, Self::Filled)
    }
}

impl From<EmployeeId> for ManagerSlot {
    fn from(value: EmployeeId) -> Self {
        Self::Filled(value)
    }
}

impl fmt::Display for ManagerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vacant => f.write_str("vacant"),
            Self::Filled(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Employee,
    Manager,
    Director,
    VicePresident,
    #[serde(rename = "CEO")]
    Ceo,
}

impl Role {
    pub const LADDER: [Role; 3] = [Role::Manager, Role::Director, Role::VicePresident];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Manager => "Manager",
            Self::Director => "Director",
            Self::VicePresident => "VicePresident",
            Self::Ceo => "CEO",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::VicePresident => "Vice President",
            other => other.as_str(),
        }
    }

    /// Rung above this one on the manager ladder.
    pub fn next_rung(self) -> Option<Self> {
        match self {
            Self::Employee => Some(Self::Manager),
            Self::Manager => Some(Self::Director),
            Self::Director => Some(Self::VicePresident),
            Self::VicePresident | Self::Ceo => None,
        }
    }

    /// Ranks a manager record may hold. The top executive rank is excluded.
    pub fn is_ladder(self) -> bool {
        Self::LADDER.contains(&self)
    }

    pub fn parse_rank_and_file(value: &str) -> Result<Self, DomainError> {
        match value.parse::<Self>()? {
            Self::Employee => Ok(Self::Employee),
            _ => Err(DomainError::InvalidRole { role: value.to_string() }),
        }
    }

    pub fn parse_ladder(value: &str) -> Result<Self, DomainError> {
        let role = value.parse::<Self>()?;
        if role.is_ladder() {
            Ok(role)
        } else {
            Err(DomainError::InvalidRole { role: value.to_string() })
        }
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    /// Role tags are matched exactly; "Vice President" or "manager" are rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Employee" => Ok(Self::Employee),
            "Manager" => Ok(Self::Manager),
            "Director" => Ok(Self::Director),
            "VicePresident" => Ok(Self::VicePresident),
            "CEO" => Ok(Self::Ceo),
            other => Err(DomainError::InvalidRole { role: other.to_string() }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes shared by every person in the organisation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub start_date: NaiveDate,
    pub is_contractor: bool,
    pub manager: ManagerSlot,
    pub on_holiday: bool,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub profile: Profile,
}

impl Employee {
    pub fn role(&self) -> Role {
        Role::Employee
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub id: EmployeeId,
    pub role: Role,
    pub profile: Profile,
}

impl Manager {
    /// Converts a rank-and-file record in place; the id and profile carry over.
    pub fn from_employee(employee: Employee, role: Role, manager: ManagerSlot) -> Self {
        let mut profile = employee.profile;
        profile.manager = manager;
        Self { id: employee.id, role, profile }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopExecutive {
    id: EmployeeId,
    profile: Profile,
}

impl TopExecutive {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        start_date: NaiveDate,
        id: EmployeeId,
    ) -> Self {
        Self {
            id,
            profile: Profile {
                first_name: first_name.into(),
                last_name: last_name.into(),
                start_date,
                is_contractor: false,
                manager: ManagerSlot::Vacant,
                on_holiday: false,
            },
        }
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn role(&self) -> Role {
        Role::Ceo
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}

/// Tagged record stored by the organisation, one per employee id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Employee(Employee),
    Manager(Manager),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Employee,
    Manager,
}

impl Record {
    pub fn id(&self) -> EmployeeId {
        match self {
            Self::Employee(employee) => employee.id,
            Self::Manager(manager) => manager.id,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Employee(_) => RecordKind::Employee,
            Self::Manager(_) => RecordKind::Manager,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Employee(employee) => employee.role(),
            Self::Manager(manager) => manager.role,
        }
    }

    pub fn profile(&self) -> &Profile {
        match self {
            Self::Employee(employee) => &employee.profile,
            Self::Manager(manager) => &manager.profile,
        }
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        match self {
            Self::Employee(employee) => &mut employee.profile,
            Self::Manager(manager) => &mut manager.profile,
        }
    }

    pub fn as_employee(&self) -> Option<&Employee> {
        match self {
            Self::Employee(employee) => Some(employee),
            Self::Manager(_) => None,
        }
    }

    pub fn as_manager(&self) -> Option<&Manager> {
        match self {
            Self::Manager(manager) => Some(manager),
            Self::Employee(_) => None,
        }
    }
}

/// Capability held by anyone who can lead a team and hand it over while away.
pub trait Leader {
    fn leader_id(&self) -> EmployeeId;
    fn leader_profile(&self) -> &Profile;
    fn leader_profile_mut(&mut self) -> &mut Profile;

    /// Delegates the team one level up the hierarchy.
    fn going_on_holiday(&mut self, team: &mut Team) {
        team.current_manager = self.leader_profile().manager;
        self.leader_profile_mut().on_holiday = true;
    }

    fn returning_from_holiday(&mut self, team: &mut Team) {
        team.current_manager = ManagerSlot::Filled(self.leader_id());
        self.leader_profile_mut().on_holiday = false;
    }
}

impl Leader for Manager {
    fn leader_id(&self) -> EmployeeId {
        self.id
    }

    fn leader_profile(&self) -> &Profile {
        &self.profile
    }

    fn leader_profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }
}

impl Leader for TopExecutive {
    fn leader_id(&self) -> EmployeeId {
        self.id
    }

    fn leader_profile(&self) -> &Profile {
        &self.profile
    }

    fn leader_profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }
}
