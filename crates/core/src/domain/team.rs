use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::person::{EmployeeId, ManagerSlot};

/// Named roster. `manager` is the designated leader, `current_manager` the one
/// answering for the team right now; they differ only while the leader is away.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub manager: ManagerSlot,
    pub current_manager: ManagerSlot,
    pub members: BTreeSet<EmployeeId>,
}

impl Team {
    pub fn new(
        name: impl Into<String>,
        manager: ManagerSlot,
        members: impl IntoIterator<Item = EmployeeId>,
    ) -> Self {
        Self {
            name: name.into(),
            manager,
            current_manager: manager,
            members: members.into_iter().collect(),
        }
    }

    pub fn is_member(&self, id: EmployeeId) -> bool {
        self.members.contains(&id)
    }

    pub fn add_member(&mut self, id: EmployeeId) -> bool {
        self.members.insert(id)
    }

    pub fn remove_member(&mut self, id: EmployeeId) -> bool {
        self.members.remove(&id)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_led_by(&self, id: EmployeeId) -> bool {
        self.manager.is(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::person::{EmployeeId, ManagerSlot};

    use super::Team;

    #[test]
    fn new_team_starts_with_designated_manager_in_charge() {
        let team = Team::new(
            "teamOne",
            ManagerSlot::Filled(EmployeeId(3)),
            [1, 2, 3, 12].map(EmployeeId),
        );

        assert_eq!(team.current_manager, team.manager);
        assert!(team.is_led_by(EmployeeId(3)));
        assert_eq!(team.size(), 4);
    }

    #[test]
    fn membership_is_a_set() {
        let mut team = Team::new("teamOne", ManagerSlot::Vacant, [EmployeeId(1)]);

        assert!(!team.add_member(EmployeeId(1)));
        assert!(team.add_member(EmployeeId(2)));
        assert!(team.remove_member(EmployeeId(1)));
        assert!(!team.remove_member(EmployeeId(1)));
        assert!(!team.is_member(EmployeeId(1)));
        assert!(team.is_member(EmployeeId(2)));
    }
}
