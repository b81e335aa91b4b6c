// Crew client: config file, setup wizard and server API client

pub mod config;
pub mod http;
pub mod wizard;

pub use config::{ConfigError, CrewConfig};
pub use http::{ClientError, CrewClient};
pub use wizard::{Wizard, WizardState};
