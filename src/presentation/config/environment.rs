use std::fmt;
use std::str::FromStr;

use config::ConfigError;

/// Deployment environment. Selects which `appsettings.*` file is layered
/// under the `APP_` variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Local,
    Test,
    Prod,
}

impl Environment {
    pub const VARIABLE: &'static str = "APP_ENVIRONMENT";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Test => "test",
            Self::Prod => "prod",
        }
    }

    /// Base name of the optional settings file, without extension.
    pub fn settings_file(&self) -> String {
        format!("appsettings.{}", self.as_str())
    }

    /// Reads `APP_ENVIRONMENT`, defaulting to local when unset.
    pub fn from_process_env() -> Result<Self, ConfigError> {
        match std::env::var(Self::VARIABLE) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "test" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(ConfigError::Message(format!(
                "unknown {} '{other}', expected local, test or prod",
                Self::VARIABLE
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
