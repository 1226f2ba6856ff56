pub mod config;
pub mod domain;
pub mod errors;
pub mod organisation;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::person::{
    Employee, EmployeeId, Leader, Manager, ManagerSlot, Profile, Record, RecordKind, Role,
    TopExecutive,
};
pub use domain::team::Team;
pub use errors::{ApplicationError, DomainError};
pub use organisation::promotion::{
    Eligibility, OrganisationalSpan, PromotionGate, PromotionPolicy,
};
pub use organisation::{Hire, Organisation};
