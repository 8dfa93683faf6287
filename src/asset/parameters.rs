//! Asset parameter files.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::migration::DatabaseParameterSet;

/// Typed content of an asset's parameter file.
pub trait AssetParameters: DeserializeOwned {
    fn validate(&self) -> Result<(), ValidationError>;

    /// Deserialize and validate raw parameters.
    fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        let parameters: Self =
            serde_json::from_value(value).map_err(|e| ValidationError::Malformed {
                message: e.to_string(),
            })?;
        parameters.validate()?;
        Ok(parameters)
    }
}

fn require(name: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingParameter {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Parameters of the local backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendParameters {
    /// Program started by the webserver host.
    pub webserver_exec: String,
    pub database: DatabaseParameterSet,
}

impl AssetParameters for BackendParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        require("webserverExec", &self.webserver_exec)?;
        self.database.validate()
    }
}

/// Parameters of the web application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebAppParameters {
    pub webserver_exec: String,
}

impl AssetParameters for WebAppParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        require("webserverExec", &self.webserver_exec)
    }
}

/// Parameters of the console tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleParameters {
    pub executable: String,
    /// Display name of the file type the console opens.
    pub file_type_name: String,
    pub file_type_extension: String,
}

impl AssetParameters for ConsoleParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        require("executable", &self.executable)?;
        require("fileTypeName", &self.file_type_name)?;
        require("fileTypeExtension", &self.file_type_extension)
    }
}
