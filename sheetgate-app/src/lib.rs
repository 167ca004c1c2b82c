//! Authorization-gated operation surface for sheetgate.
//!
//! [`App`] owns the property store, the workbook store and the current
//! spreadsheet binding, and exposes every operation a host needs: setup,
//! role resolution, user management, spreadsheet configuration, and record
//! CRUD, listing and export.
//!
//! Opening an [`App`] does not install a tracing subscriber; hosts call
//! [`init_tracing`] once at startup.
//!
//! ```no_run
//! use sheetgate_app::{init_tracing, App, AppConfig};
//!
//! let config = AppConfig::with_database_path("/var/lib/sheetgate/app");
//! init_tracing(&config.log_filter);
//! let app = App::open(config)?;
//! let status = app.auth_status("someone@example.com")?;
//! # Ok::<(), sheetgate_app::AppError>(())
//! ```

mod app;
mod config;
mod error;
mod logging;
mod outcome;

pub use app::App;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use logging::init_tracing;
pub use outcome::Outcome;

pub use sheetgate_auth::{
    AuthStatus, ContentVisibility, Role, ScriptPropertiesView, SetupRequest, UserEntry,
    UserListing, Visibility,
};
pub use sheetgate_workbook::{CsvExport, DataRecord, RecordFilter, RecordInput, RecordList};
