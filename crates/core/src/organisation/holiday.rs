use std::collections::BTreeMap;

use tracing::info;

use crate::domain::person::{EmployeeId, Leader, ManagerSlot, Profile, Record, TopExecutive};
use crate::errors::DomainError;
use crate::organisation::{reassign_rank_and_file, rejected, Organisation};

impl Organisation {
    /// Marks `id` as away. A leader hands their team to their own manager and
    /// the team's rank-and-file members report there until the leader returns.
    pub fn go_on_holiday(&mut self, id: EmployeeId) -> Result<(), DomainError> {
        match self.set_holiday(id, true) {
            Ok(delegated_to) => {
                info!(
                    event_name = "org.holiday.started",
                    employee_id = %id,
                    delegated_to = ?delegated_to,
                    "holiday started"
                );
                Ok(())
            }
            Err(error) => Err(rejected("go_on_holiday", error)),
        }
    }

    pub fn return_from_holiday(&mut self, id: EmployeeId) -> Result<(), DomainError> {
        match self.set_holiday(id, false) {
            Ok(restored_to) => {
                info!(
                    event_name = "org.holiday.ended",
                    employee_id = %id,
                    restored_to = ?restored_to,
                    "holiday ended"
                );
                Ok(())
            }
            Err(error) => Err(rejected("return_from_holiday", error)),
        }
    }

    /// Returns the team's new current manager when a team changed hands.
    fn set_holiday(&mut self, id: EmployeeId, away: bool) -> Result<Option<ManagerSlot>, DomainError> {
        let profile = self.profile(id).ok_or(DomainError::NotFound { id })?;
        match (profile.on_holiday, away) {
            (true, true) => return Err(DomainError::AlreadyOnHoliday { id }),
            (false, false) => return Err(DomainError::NotOnHoliday { id }),
            _ => {}
        }

        let led_team = if self.is_leader(id) {
            self.team_led_by(id).map(|team| team.name.clone())
        } else {
            None
        };

        let Self { records, top_executive, teams, .. } = self;
        let team = match led_team {
            Some(name) => teams.get_mut(&name),
            None => None,
        };

        if let Some(team) = team {
            if let Some(leader) = leader_mut(records, top_executive, id) {
                if away {
                    leader.going_on_holiday(team);
                } else {
                    leader.returning_from_holiday(team);
                }
            }
            let current = team.current_manager;
            reassign_rank_and_file(records, &team.members, current);
            return Ok(Some(current));
        }

        if let Some(profile) = profile_mut(records, top_executive, id) {
            profile.on_holiday = away;
        }
        Ok(None)
    }
}

fn leader_mut<'a>(
    records: &'a mut BTreeMap<EmployeeId, Record>,
    top_executive: &'a mut TopExecutive,
    id: EmployeeId,
) -> Option<&'a mut dyn Leader> {
    if top_executive.leader_id() == id {
        return Some(top_executive);
    }
    match records.get_mut(&id) {
        Some(Record::Manager(manager)) => Some(manager),
        _ => None,
    }
}

fn profile_mut<'a>(
    records: &'a mut BTreeMap<EmployeeId, Record>,
    top_executive: &'a mut TopExecutive,
    id: EmployeeId,
) -> Option<&'a mut Profile> {
    if top_executive.leader_id() == id {
        return Some(top_executive.leader_profile_mut());
    }
    records.get_mut(&id).map(Record::profile_mut)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::person::{EmployeeId, ManagerSlot, TopExecutive};
    use crate::errors::DomainError;
    use crate::organisation::{Hire, Organisation};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn organisation() -> Organisation {
        let mut org =
            Organisation::new(TopExecutive::new("Elf", "Elrond", date(2001, 1, 1), EmployeeId(100)));
        org.add_manager(
            Hire::new(EmployeeId(4), "Larry", "Clarke", "Director", date(2015, 1, 1))
                .reporting_to(EmployeeId(100)),
        )
        .expect("director");
        org.add_manager(
            Hire::new(EmployeeId(3), "Mike", "Newton", "Manager", date(2018, 1, 1))
                .reporting_to(EmployeeId(4)),
        )
        .expect("manager");
        org.add_employee(
            Hire::new(EmployeeId(1), "Manjooth", "Kler", "Employee", date(2020, 1, 1))
                .reporting_to(EmployeeId(3))
                .on_holiday(true),
        )
        .expect("employee on holiday");
        org.add_employee(
            Hire::new(EmployeeId(12), "Jay", "Bird", "Employee", date(2021, 1, 1))
                .reporting_to(EmployeeId(3)),
        )
        .expect("employee");
        org.add_team("teamOne", EmployeeId(3), [1, 2, 3, 12].map(EmployeeId)).expect("team");
        org
    }

    fn reports_to(org: &Organisation, id: u64) -> ManagerSlot {
        org.profile(EmployeeId(id)).map(|profile| profile.manager).unwrap_or_default()
    }

    #[test]
    fn already_away_is_rejected() {
        let mut org = organisation();
        let error = org.go_on_holiday(EmployeeId(1)).expect_err("already away");

        assert_eq!(error, DomainError::AlreadyOnHoliday { id: EmployeeId(1) });
    }

    #[test]
    fn rank_and_file_holiday_only_flips_the_flag() {
        let mut org = organisation();
        org.go_on_holiday(EmployeeId(12)).expect("employee holiday");

        assert!(org.profile(EmployeeId(12)).is_some_and(|profile| profile.on_holiday));
        assert_eq!(reports_to(&org, 12), ManagerSlot::Filled(EmployeeId(3)));
        assert_eq!(
            org.team("teamOne").map(|team| team.current_manager),
            Some(ManagerSlot::Filled(EmployeeId(3)))
        );
    }

    #[test]
    fn manager_holiday_delegates_team_to_their_manager() {
        let mut org = organisation();
        org.go_on_holiday(EmployeeId(3)).expect("manager holiday");

        let team = org.team("teamOne").expect("team");
        assert_eq!(team.current_manager, ManagerSlot::Filled(EmployeeId(4)));
        assert_eq!(team.manager, ManagerSlot::Filled(EmployeeId(3)));
        assert_eq!(reports_to(&org, 1), ManagerSlot::Filled(EmployeeId(4)));
        assert_eq!(reports_to(&org, 12), ManagerSlot::Filled(EmployeeId(4)));
        assert_eq!(reports_to(&org, 3), ManagerSlot::Filled(EmployeeId(4)));
        assert!(org.profile(EmployeeId(3)).is_some_and(|profile| profile.on_holiday));
    }

    #[test]
    fn holiday_round_trip_restores_reporting_lines() {
        let mut org = organisation();
        org.go_on_holiday(EmployeeId(3)).expect("manager holiday");
        org.return_from_holiday(EmployeeId(3)).expect("manager back");

        assert_eq!(
            org.team("teamOne").map(|team| team.current_manager),
            Some(ManagerSlot::Filled(EmployeeId(3)))
        );
        assert_eq!(reports_to(&org, 1), ManagerSlot::Filled(EmployeeId(3)));
        assert_eq!(reports_to(&org, 12), ManagerSlot::Filled(EmployeeId(3)));
        assert!(org.profile(EmployeeId(3)).is_some_and(|profile| !profile.on_holiday));
    }

    #[test]
    fn returning_requires_being_away() {
        let mut org = organisation();
        let error = org.return_from_holiday(EmployeeId(12)).expect_err("not away");
        assert_eq!(error, DomainError::NotOnHoliday { id: EmployeeId(12) });

        org.return_from_holiday(EmployeeId(1)).expect("employee back");
        assert!(org.profile(EmployeeId(1)).is_some_and(|profile| !profile.on_holiday));
    }

    #[test]
    fn unknown_people_are_not_found() {
        let mut org = organisation();

        assert_eq!(
            org.go_on_holiday(EmployeeId(77)),
            Err(DomainError::NotFound { id: EmployeeId(77) })
        );
        assert_eq!(
            org.return_from_holiday(EmployeeId(77)),
            Err(DomainError::NotFound { id: EmployeeId(77) })
        );
    }

    #[test]
    fn leader_without_a_team_just_goes_away() {
        let mut org = organisation();
        org.go_on_holiday(EmployeeId(4)).expect("director holiday");

        assert!(org.profile(EmployeeId(4)).is_some_and(|profile| profile.on_holiday));
        assert_eq!(reports_to(&org, 3), ManagerSlot::Filled(EmployeeId(4)));
    }

    #[test]
    fn top_executive_holiday_leaves_their_team_uncovered() {
        let mut org = organisation();
        org.add_team("board", EmployeeId(100), [100, 4].map(EmployeeId)).expect("board");
        org.go_on_holiday(EmployeeId(100)).expect("top executive holiday");

        assert_eq!(org.team("board").map(|team| team.current_manager), Some(ManagerSlot::Vacant));
        assert!(org.top_executive().profile().on_holiday);

        org.return_from_holiday(EmployeeId(100)).expect("top executive back");
        assert_eq!(
            org.team("board").map(|team| team.current_manager),
            Some(ManagerSlot::Filled(EmployeeId(100)))
        );
    }
}
