//! Connection command implementation.
//!
//! `engine-admin connection` shows and stores the connection settings the
//! assets are discovered with.

use std::time::Duration;

use crate::cli::args::{ConnectionCommand as Subcommand, HostPreset, SetApiKeyArgs, SetDatabaseArgs, SetWebserverArgs};
use crate::cli::context::AdminContext;
use crate::connection::{DatabaseConnection, DatabaseHost, WebserverConnection, MASK};
use crate::error::{AdminError, Result};
use crate::ui::{Prompt, Table, UserInterface};

use super::dispatcher::{Command, CommandResult, EXIT_FAILURE};

const NOT_SET: &str = "(not set)";

/// Which stored webserver connection to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebserverTarget {
    Api,
    WebApp,
}

impl WebserverTarget {
    fn label(self) -> &'static str {
        match self {
            Self::Api => "API",
            Self::WebApp => "web app",
        }
    }
}

/// The connection command implementation.
pub struct ConnectionCommand<'a> {
    context: &'a AdminContext,
    command: Subcommand,
}

impl<'a> ConnectionCommand<'a> {
    pub fn new(context: &'a AdminContext, command: Subcommand) -> Self {
        Self { context, command }
    }

    fn show(&self, ui: &mut dyn UserInterface, reveal: bool) -> Result<CommandResult> {
        let settings = self.context.settings();
        let mask = !reveal;
        let webserver = |connection: Option<WebserverConnection>| {
            connection
                .and_then(|c| c.to_connection_string(mask))
                .unwrap_or_else(|| NOT_SET.to_string())
        };

        let database = settings.database_connection()?;
        let api_key = match settings.api_key()? {
            Some(_) if mask => MASK.to_string(),
            Some(key) => key,
            None => NOT_SET.to_string(),
        };

        let mut table = Table::new(&["Connection", "Value"]);
        table.add_row([
            "Database".to_string(),
            if database.is_empty() {
                NOT_SET.to_string()
            } else {
                database.to_connection_string(mask)
            },
        ]);
        table.add_row(["API".to_string(), webserver(settings.api_connection()?)]);
        table.add_row(["API key".to_string(), api_key]);
        table.add_row(["Web app".to_string(), webserver(settings.webapp_connection()?)]);
        ui.show_table(&table);
        Ok(CommandResult::success())
    }

    fn set_database(&self, ui: &mut dyn UserInterface, args: &SetDatabaseArgs) -> Result<CommandResult> {
        let mut connection = match (&args.connection_string, args.preset) {
            (Some(text), _) => DatabaseConnection::parse(text).ok_or_else(|| {
                AdminError::InvalidArgument {
                    message: "connection string is blank".to_string(),
                }
            })?,
            (None, Some(preset)) => {
                let mut connection = DatabaseConnection::default();
                connection.initialize(match preset {
                    HostPreset::Local => DatabaseHost::Local,
                    HostPreset::Remote => DatabaseHost::Remote,
                });
                connection
            }
            (None, None) => self.context.settings().database_connection()?,
        };

        if let Some(server) = &args.server {
            connection.server = Some(server.clone());
        }
        if let Some(database) = &args.database {
            connection.database = Some(database.clone());
        }
        if let Some(user) = &args.user {
            connection.user_id = Some(user.clone());
        }
        if let Some(password) = &args.password {
            connection.password = Some(password.clone());
        }
        if let Some(timeout) = args.timeout.filter(|t| *t > 0) {
            connection.timeout = timeout;
        }
        if args.trusted {
            connection.integrated_security = true;
        }

        if !connection.has_required_values() {
            ui.error("Database connection is incomplete");
            ui.message("It needs a server, a database and either credentials or --trusted");
            return Ok(CommandResult::failure(EXIT_FAILURE));
        }

        self.context.settings().set_database_connection(&connection)?;
        ui.success(&format!("Stored database connection {}", connection));
        ui.message(&connection.to_connection_string(true));
        Ok(CommandResult::success())
    }

    fn set_webserver(
        &self,
        ui: &mut dyn UserInterface,
        target: WebserverTarget,
        args: &SetWebserverArgs,
    ) -> Result<CommandResult> {
        let settings = self.context.settings();
        let mut connection = match &args.connection_string {
            Some(text) => WebserverConnection::parse(text).ok_or_else(|| AdminError::InvalidArgument {
                message: "connection string is blank".to_string(),
            })?,
            None => match target {
                WebserverTarget::Api => settings.api_connection()?,
                WebserverTarget::WebApp => settings.webapp_connection()?,
            }
            .unwrap_or_default(),
        };

        if let Some(url) = &args.url {
            connection.base_url = Some(url.clone());
        }
        if let Some(port) = args.port {
            connection.port = port;
        }
        if let Some(timeout) = args.timeout {
            connection.timeout = Some(Duration::from_secs(timeout));
        }

        if !connection.has_required_values() {
            ui.error(&format!("The {} connection needs a base URL", target.label()));
            return Ok(CommandResult::failure(EXIT_FAILURE));
        }

        match target {
            WebserverTarget::Api => settings.set_api_connection(&connection)?,
            WebserverTarget::WebApp => settings.set_webapp_connection(&connection)?,
        }
        ui.success(&format!("Stored {} connection {}", target.label(), connection));
        Ok(CommandResult::success())
    }

    fn set_api_key(&self, ui: &mut dyn UserInterface, args: &SetApiKeyArgs) -> Result<CommandResult> {
        let key = match &args.key {
            Some(key) => key.clone(),
            None if ui.is_interactive() => ui.prompt(&Prompt::secret("api_key", "API key"))?.as_string(),
            None => {
                ui.error("No API key given");
                return Ok(CommandResult::failure(EXIT_FAILURE));
            }
        };
        self.context.settings().set_api_key(key.trim())?;
        ui.success("Stored API key");
        Ok(CommandResult::success())
    }
}

impl Command for ConnectionCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.command {
            Subcommand::Show(args) => self.show(ui, args.reveal),
            Subcommand::SetDatabase(args) => self.set_database(ui, args),
            Subcommand::SetApi(args) => self.set_webserver(ui, WebserverTarget::Api, args),
            Subcommand::SetWebapp(args) => self.set_webserver(ui, WebserverTarget::WebApp, args),
            Subcommand::SetApiKey(args) => self.set_api_key(ui, args),
        }
    }
}
