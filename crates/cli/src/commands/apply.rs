use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use roster_core::config::AppConfig;
use roster_core::{DomainError, EmployeeId, Hire, ManagerSlot, Organisation, RecordKind, Team};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::commands::{CommandResult, EXIT_SCRIPT};

/// A script is an ordered list of `[[operation]]` tables, each tagged by `op`.
///
/// Dates are quoted ISO strings (`start_date = "2020-01-01"`).
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default, rename = "operation")]
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddEmployee(HireSpec),
    AddManager(HireSpec),
    AddTeam {
        name: String,
        manager: Option<u64>,
        #[serde(default)]
        members: Vec<u64>,
    },
    MoveTeam {
        old_team: String,
        new_team: String,
        id: u64,
    },
    GoOnHoliday {
        id: u64,
    },
    ReturnFromHoliday {
        id: u64,
    },
    Promote {
        id: u64,
        new_manager: Option<u64>,
        kind: RecordKind,
        new_role: String,
    },
    TeamOf {
        id: u64,
    },
    Manager {
        id: u64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct HireSpec {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub manager: Option<u64>,
    #[serde(default)]
    pub contractor: bool,
    #[serde(default)]
    pub on_holiday: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    pub index: usize,
    pub operation: &'static str,
    pub status: &'static str,
    pub error_code: Option<&'static str>,
    pub detail: String,
}

#[derive(Debug, Serialize)]
struct ApplyReport<'a> {
    command: &'static str,
    status: &'static str,
    applied: usize,
    rejected: usize,
    operations: &'a [OperationOutcome],
    teams: Vec<&'a Team>,
}

pub fn run(config: &AppConfig, path: &Path, json: bool) -> CommandResult {
    let script = match load_script(path) {
        Ok(script) => script,
        Err(error) => {
            return CommandResult::failure("apply", "script", format!("{error:#}"), EXIT_SCRIPT);
        }
    };

    let mut organisation = Organisation::from_config(config);
    let outcomes = apply(&mut organisation, &script.operations);
    let rejected = outcomes.iter().filter(|outcome| outcome.error_code.is_some()).count();
    info!(
        event_name = "cli.apply.completed",
        script = %path.display(),
        applied = outcomes.len() - rejected,
        rejected,
        "operation script applied"
    );

    if json {
        return CommandResult::report(&ApplyReport {
            command: "apply",
            status: "ok",
            applied: outcomes.len() - rejected,
            rejected,
            operations: &outcomes,
            teams: organisation.teams().collect(),
        });
    }

    let mut lines: Vec<String> = outcomes.iter().map(render_outcome).collect();
    lines.push(format!(
        "{} applied, {} rejected, {} team(s)",
        outcomes.len() - rejected,
        rejected,
        organisation.teams().count()
    ));
    CommandResult::text(lines.join("\n"))
}

pub fn load_script(path: &Path) -> anyhow::Result<Script> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read script `{}`", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("could not parse script `{}`", path.display()))
}

/// Runs every operation in order. A rejected operation is recorded and the
/// run carries on with the next one.
pub fn apply(organisation: &mut Organisation, operations: &[Operation]) -> Vec<OperationOutcome> {
    operations
        .iter()
        .enumerate()
        .map(|(index, operation)| {
            let name = operation.name();
            match execute(organisation, operation) {
                Ok(detail) => OperationOutcome {
                    index: index + 1,
                    operation: name,
                    status: "ok",
                    error_code: None,
                    detail,
                },
                Err(error) => OperationOutcome {
                    index: index + 1,
                    operation: name,
                    status: "error",
                    error_code: Some(error.code()),
                    detail: error.to_string(),
                },
            }
        })
        .collect()
}

fn execute(organisation: &mut Organisation, operation: &Operation) -> Result<String, DomainError> {
    match operation {
        Operation::AddEmployee(hire) => {
            organisation.add_employee(hire.to_hire())?;
            Ok(format!("employee {} added", hire.id))
        }
        Operation::AddManager(hire) => {
            organisation.add_manager(hire.to_hire())?;
            Ok(format!("{} {} added", hire.role, hire.id))
        }
        Operation::AddTeam { name, manager, members } => {
            organisation.add_team(name, slot(*manager), members.iter().copied().map(EmployeeId))?;
            Ok(format!("team `{name}` added with {} member(s)", members.len()))
        }
        Operation::MoveTeam { old_team, new_team, id } => {
            let successor = organisation.move_team(old_team, new_team, EmployeeId(*id))?;
            Ok(format!("{id} moved to `{new_team}`; {successor} now leads `{old_team}`"))
        }
        Operation::GoOnHoliday { id } => {
            organisation.go_on_holiday(EmployeeId(*id))?;
            Ok(format!("{id} is on holiday"))
        }
        Operation::ReturnFromHoliday { id } => {
            organisation.return_from_holiday(EmployeeId(*id))?;
            Ok(format!("{id} is back from holiday"))
        }
        Operation::Promote { id, new_manager, kind, new_role } => {
            organisation.promote(EmployeeId(*id), slot(*new_manager), *kind, new_role)?;
            Ok(format!("{id} promoted to {new_role}"))
        }
        Operation::TeamOf { id } => {
            let team = organisation.team_of(EmployeeId(*id))?;
            Ok(format!("{id} is in team `{}`", team.name))
        }
        Operation::Manager { id } => Ok(match organisation.manager(EmployeeId(*id)) {
            Some(manager) => format!(
                "{id} ({}) is a {} reporting to {}",
                manager.profile.full_name(),
                manager.role.title(),
                manager.profile.manager
            ),
            None => format!("{id} is not a manager"),
        }),
    }
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddEmployee(_) => "add_employee",
            Self::AddManager(_) => "add_manager",
            Self::AddTeam { .. } => "add_team",
            Self::MoveTeam { .. } => "move_team",
            Self::GoOnHoliday { .. } => "go_on_holiday",
            Self::ReturnFromHoliday { .. } => "return_from_holiday",
            Self::Promote { .. } => "promote",
            Self::TeamOf { .. } => "team_of",
            Self::Manager { .. } => "manager",
        }
    }
}

impl HireSpec {
    fn to_hire(&self) -> Hire {
        Hire::new(
            EmployeeId(self.id),
            self.first_name.clone(),
            self.last_name.clone(),
            self.role.clone(),
            self.start_date,
        )
        .reporting_to(slot(self.manager))
        .contractor(self.contractor)
        .on_holiday(self.on_holiday)
    }
}

fn slot(id: Option<u64>) -> ManagerSlot {
    id.map(EmployeeId).into()
}

fn render_outcome(outcome: &OperationOutcome) -> String {
    match outcome.error_code {
        None => format!("{}. {}: ok ({})", outcome.index, outcome.operation, outcome.detail),
        Some(code) => {
            format!("{}. {}: error [{code}] {}", outcome.index, outcome.operation, outcome.detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use roster_core::{EmployeeId, Organisation, TopExecutive};

    use super::{apply, Operation, Script};

    fn organisation() -> Organisation {
        let start = NaiveDate::from_ymd_opt(2001, 1, 1).expect("valid date");
        Organisation::new(TopExecutive::new("Elf", "Elrond", start, EmployeeId(100)))
    }

    #[test]
    fn script_tables_parse_into_tagged_operations() {
        let script: Script = toml::from_str(
            r#"
            [[operation]]
            op = "add_manager"
            id = 4
            first_name = "Larry"
            last_name = "Clarke"
            role = "Director"
            start_date = "2015-03-01"
            manager = 100

            [[operation]]
            op = "add_team"
            name = "teamTwo"
            manager = 4
            members = [4]

            [[operation]]
            op = "promote"
            id = 4
            kind = "manager"
            new_role = "VicePresident"
            "#,
        )
        .expect("script parses");

        let names: Vec<_> = script.operations.iter().map(Operation::name).collect();
        assert_eq!(names, ["add_manager", "add_team", "promote"]);
    }

    #[test]
    fn rejected_operations_do_not_stop_the_run() {
        let script: Script = toml::from_str(
            r#"
            [[operation]]
            op = "add_team"
            name = "teamOne"
            manager = 100

            [[operation]]
            op = "add_team"
            name = "teamOne"
            manager = 100

            [[operation]]
            op = "team_of"
            id = 100
            "#,
        )
        .expect("script parses");

        let mut org = organisation();
        let outcomes = apply(&mut org, &script.operations);

        let statuses: Vec<_> = outcomes.iter().map(|outcome| outcome.status).collect();
        assert_eq!(statuses, ["ok", "error", "error"]);
        assert_eq!(outcomes[1].error_code, Some("duplicate_team_name"));
        assert_eq!(outcomes[2].error_code, Some("not_found"));
        assert_eq!(outcomes[2].index, 3);
    }

    #[test]
    fn manager_lookup_reports_absence_without_failing() {
        let mut org = organisation();
        let outcomes = apply(&mut org, &[Operation::Manager { id: 42 }]);

        assert_eq!(outcomes[0].status, "ok");
        assert_eq!(outcomes[0].detail, "42 is not a manager");
    }

    #[test]
    fn manager_lookup_names_the_manager() {
        let script: Script = toml::from_str(
            r#"
            [[operation]]
            op = "add_manager"
            id = 5
            first_name = "Vera"
            last_name = "Peak"
            role = "VicePresident"
            start_date = "2010-01-01"
            manager = 100

            [[operation]]
            op = "manager"
            id = 5
            "#,
        )
        .expect("script parses");

        let mut org = organisation();
        let outcomes = apply(&mut org, &script.operations);

        assert_eq!(outcomes[1].detail, "5 (Vera Peak) is a Vice President reporting to 100");
    }
}
