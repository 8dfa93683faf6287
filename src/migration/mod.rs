//! Database migration chains.
//!
//! A backend asset declares the scripts that create its schema at a minimum
//! version and the steps that carry it to the current version. This module
//! validates that those steps form one unbroken chain and selects the steps
//! a given installed version still needs.
//!
//! # Example
//!
//! ```
//! use engine_admin::database::DatabaseVersion;
//! use engine_admin::migration::{DatabaseParameterSet, MigrationScript};
//!
//! let v = |minor| DatabaseVersion::new(1, minor, 0);
//! let params = DatabaseParameterSet {
//!     min_version: v(0),
//!     current_version: v(2),
//!     init_scripts: vec!["Create.sql".into()],
//!     migrations: vec![
//!         MigrationScript::new(v(0), v(1), ["a.sql"]),
//!         MigrationScript::new(v(1), v(2), ["b.sql"]),
//!     ],
//! };
//! params.validate().unwrap();
//! assert_eq!(params.scripts_from(&v(1)), vec!["b.sql"]);
//! ```

pub mod chain;
pub mod script;
mod selector;

pub use chain::DatabaseParameterSet;
pub use script::MigrationScript;
