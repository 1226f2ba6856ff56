use chrono::NaiveDate;
use roster_core::{
    DomainError, EmployeeId, Hire, ManagerSlot, Organisation, RecordKind, Role, TopExecutive,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn id(value: u64) -> EmployeeId {
    EmployeeId(value)
}

fn reference_organisation() -> Organisation {
    let mut org = Organisation::new(TopExecutive::new("Elf", "Elrond", date(2001, 1, 1), id(100)));

    org.add_manager(
        Hire::new(id(4), "Larry", "Clarke", "Director", date(2015, 3, 1)).reporting_to(id(100)),
    )
    .expect("director 4");
    org.add_manager(
        Hire::new(id(8), "Sam", "Gamgee", "Manager", date(2017, 6, 1)).reporting_to(id(4)),
    )
    .expect("manager 8");
    org.add_manager(
        Hire::new(id(3), "Mike", "Newton", "Manager", date(2018, 1, 1)).reporting_to(id(4)),
    )
    .expect("manager 3");
    org.add_employee(
        Hire::new(id(1), "Manjooth", "Kler", "Employee", date(2020, 1, 1)).reporting_to(id(3)),
    )
    .expect("employee 1");
    org.add_employee(
        Hire::new(id(12), "Jay", "Bird", "Employee", date(2021, 1, 1)).reporting_to(id(3)),
    )
    .expect("employee 12");

    org.add_team("teamOne", id(3), [1, 2, 3, 12].map(id)).expect("teamOne");
    org
}

#[test]
fn moving_the_team_manager_hands_the_team_to_the_longest_serving_member() {
    let mut org = reference_organisation();
    org.add_team("teamTwo", id(4), [id(4)]).expect("teamTwo");

    let successor = org.move_team("teamOne", "teamTwo", id(3)).expect("move manager 3");

    assert_eq!(successor, id(1));
    let team_one = org.team("teamOne").expect("teamOne");
    assert_eq!(team_one.manager, ManagerSlot::Filled(id(1)));
    assert_eq!(team_one.current_manager, ManagerSlot::Filled(id(1)));
    assert_eq!(org.team_of(id(3)).map(|team| team.name.as_str()), Ok("teamTwo"));
    assert_eq!(org.manager(id(1)).map(|manager| manager.role), Some(Role::Manager));
    assert_eq!(org.rank_and_file_members("teamOne"), Ok(vec![id(12)]));
}

#[test]
fn scenario_rejections_leave_the_directory_untouched() {
    let mut org = reference_organisation();
    let records_before: Vec<_> = org.records().cloned().collect();

    assert_eq!(
        org.add_employee(
            Hire::new(id(1), "Again", "Again", "Employee", date(2022, 1, 1)).reporting_to(id(3))
        ),
        Err(DomainError::DuplicateId { id: id(1) })
    );
    assert_eq!(
        org.add_manager(Hire::new(id(2), "Manjooth", "Kler", "Manager", date(2022, 1, 1)).contractor(true)),
        Err(DomainError::ContractorCannotBeManager { id: id(2) })
    );
    assert_eq!(
        org.add_team("teamOne", id(8), [id(8)]),
        Err(DomainError::DuplicateTeamName { name: "teamOne".to_string() })
    );
    assert_eq!(
        org.move_team("teamAMillion", "teamOne", id(4)),
        Err(DomainError::TeamNotFound { name: "teamAMillion".to_string() })
    );
    assert_eq!(
        org.promote(id(3), id(4), RecordKind::Manager, "Director"),
        Err(DomainError::PromotionIneligible { id: id(3), from: Role::Manager, to: Role::Director })
    );

    let records_after: Vec<_> = org.records().cloned().collect();
    assert_eq!(records_before, records_after);
    assert_eq!(org.teams().count(), 1);
}

#[test]
fn holiday_cover_runs_through_the_directors_office() {
    let mut org = reference_organisation();

    org.go_on_holiday(id(3)).expect("manager 3 away");
    assert_eq!(
        org.team("teamOne").map(|team| team.current_manager),
        Some(ManagerSlot::Filled(id(4)))
    );
    assert_eq!(org.employee(id(12)).map(|e| e.profile.manager), Some(ManagerSlot::Filled(id(4))));
    assert_eq!(org.go_on_holiday(id(3)), Err(DomainError::AlreadyOnHoliday { id: id(3) }));

    org.return_from_holiday(id(3)).expect("manager 3 back");
    assert_eq!(
        org.team("teamOne").map(|team| team.current_manager),
        Some(ManagerSlot::Filled(id(3)))
    );
    assert_eq!(org.employee(id(12)).map(|e| e.profile.manager), Some(ManagerSlot::Filled(id(3))));
}

#[test]
fn vice_president_never_moves_up() {
    let mut org = reference_organisation();
    org.add_manager(
        Hire::new(id(5), "Vera", "Peak", "VicePresident", date(2010, 1, 1)).reporting_to(id(100)),
    )
    .expect("vice president");

    let error = org.promote(id(5), id(100), RecordKind::Manager, "CEO").expect_err("capped");
    assert_eq!(error, DomainError::CannotPromoteTopRole { id: id(5), role: Role::VicePresident });
    assert_eq!(error.code(), "cannot_promote_top_role");
}

#[test]
fn records_serialise_with_their_kind_tag() {
    let org = reference_organisation();
    let record = org.record(id(3)).expect("manager 3");

    let json = serde_json::to_value(record).expect("serialise record");
    assert_eq!(json["kind"], "manager");
    assert_eq!(json["role"], "Manager");
    assert_eq!(json["id"], 3);
}
