use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// The driver categories a trip can be assigned to. The shared van and the ride-hailing service
/// are fixed categories, every other value names an individual driver.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Driver {
    SharedVan,
    RideHailing,
    Named(String),
}

impl Driver {
    pub fn as_str(&self) -> &str {
        match self {
            Driver::SharedVan => "Van",
            Driver::RideHailing => "Uber",
            Driver::Named(name) => name.as_str(),
        }
    }
}

impl Display for Driver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Driver {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Van" => Driver::SharedVan,
            "Uber" => Driver::RideHailing,
            other => Driver::Named(other.to_string()),
        }
    }
}

impl From<String> for Driver {
    fn from(value: String) -> Self {
        Driver::from(value.as_str())
    }
}

impl From<Driver> for String {
    fn from(value: Driver) -> Self {
        match value {
            Driver::Named(name) => name,
            fixed => fixed.as_str().to_string(),
        }
    }
}
