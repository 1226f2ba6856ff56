use chrono::NaiveDate;
use roster_core::config::AppConfig;
use roster_core::{ApplicationError, DomainError, EmployeeId, Hire, Organisation, Team};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct DemoReport<'a> {
    command: &'static str,
    status: &'static str,
    successor: EmployeeId,
    mover_team: &'a str,
    teams: Vec<&'a Team>,
}

/// Director 4 leads managers 3 and 8; manager 3 leads `teamOne` until moving
/// to `teamTwo`, at which point employee 1 inherits the team.
pub fn run(config: &AppConfig) -> CommandResult {
    let mut organisation = Organisation::from_config(config);
    let successor = match reference_scenario(&mut organisation) {
        Ok(successor) => successor,
        Err(error) => return scenario_failure(error),
    };
    let mover_team = match organisation.team_of(EmployeeId(3)) {
        Ok(team) => team.name.as_str(),
        Err(error) => return scenario_failure(error),
    };

    CommandResult::report(&DemoReport {
        command: "demo",
        status: "ok",
        successor,
        mover_team,
        teams: organisation.teams().collect(),
    })
}

pub fn reference_scenario(organisation: &mut Organisation) -> Result<EmployeeId, DomainError> {
    let top = organisation.top_executive().id();

    organisation.add_manager(
        Hire::new(EmployeeId(4), "Larry", "Clarke", "Director", date(2015, 3, 1)).reporting_to(top),
    )?;
    for (id, first_name, start) in [(8, "Sam", date(2017, 6, 1)), (3, "Mike", date(2018, 1, 1))] {
        organisation.add_manager(
            Hire::new(EmployeeId(id), first_name, "Newton", "Manager", start)
                .reporting_to(EmployeeId(4)),
        )?;
    }
    for (id, first_name, start) in [(1, "Manjooth", date(2020, 1, 1)), (12, "Jay", date(2021, 1, 1))]
    {
        organisation.add_employee(
            Hire::new(EmployeeId(id), first_name, "Kler", "Employee", start)
                .reporting_to(EmployeeId(3)),
        )?;
    }

    organisation.add_team("teamOne", EmployeeId(3), [1, 2, 3, 12].map(EmployeeId))?;
    organisation.add_team("teamTwo", EmployeeId(4), [EmployeeId(4)])?;
    organisation.move_team("teamOne", "teamTwo", EmployeeId(3))
}

fn scenario_failure(error: DomainError) -> CommandResult {
    let error = ApplicationError::from(error);
    CommandResult::failure("demo", error.error_class(), error.to_string(), 1)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
