//! The application context and its operations.
//!
//! Every operation takes the caller's email as supplied by the host and
//! re-resolves their role on each call. Admin-only and authenticated-only
//! operations fail with [`AppError::Unauthorized`] before touching any store.
//!
//! Mutations return [`Outcome`](crate::Outcome), with validation and
//! not-found failures reported as `success: false`. Queries raise every
//! failure.

mod binding;
mod identity;
mod records;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use sheetgate_auth::{AuthStatus, IdentityResolver, UserDirectory};
use sheetgate_properties::{Properties, PropertyStore};
use sheetgate_workbook::{RecordEngine, SheetBinding, WorkbookError, WorkbookStore};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

/// User scope that owns the sheet ID, kept apart from the application-scope
/// configuration so a reset leaves the binding in place.
const BINDING_OWNER: &str = "owner";

pub struct App {
    config: AppConfig,
    properties: PropertyStore,
    workbooks: WorkbookStore,
    binding: RwLock<Option<SheetBinding>>,
}

impl App {
    /// Open both stores and bind the configured spreadsheet.
    ///
    /// A spreadsheet that cannot be opened leaves the application unbound:
    /// setup and configuration still work, record operations fail until a
    /// later bind succeeds.
    pub fn open(config: AppConfig) -> AppResult<Self> {
        config.validate()?;

        let properties = match config.properties_path() {
            Some(path) => {
                info!(path = %path.display(), "Opening property store");
                PropertyStore::open(&path)?
            }
            None => PropertyStore::open_in_memory()?,
        };
        let workbooks = match config.workbook_path() {
            Some(path) => {
                info!(path = %path.display(), "Opening workbook store");
                WorkbookStore::open(&path)?
            }
            None => WorkbookStore::open_in_memory()?,
        };

        let app = Self {
            config,
            properties,
            workbooks,
            binding: RwLock::new(None),
        };
        app.refresh_binding()?;
        Ok(app)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn workbooks(&self) -> &WorkbookStore {
        &self.workbooks
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    /// Re-open the configured spreadsheet. Returns whether the application
    /// is now bound.
    pub fn refresh_binding(&self) -> AppResult<bool> {
        let bound = match SheetBinding::bind(
            &self.binding_properties(),
            &self.workbooks,
            &self.config.default_sheet_id,
        ) {
            Ok(binding) => Some(binding),
            Err(WorkbookError::CannotAccess(detail)) => {
                warn!(%detail, "Spreadsheet unavailable, record operations disabled");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let is_bound = bound.is_some();
        *self.write_binding() = bound;
        Ok(is_bound)
    }

    pub fn is_bound(&self) -> bool {
        self.read_binding().is_some()
    }

    fn script(&self) -> Properties {
        self.properties.script()
    }

    fn binding_properties(&self) -> Properties {
        self.properties.user(BINDING_OWNER)
    }

    fn resolver(&self) -> IdentityResolver {
        IdentityResolver::new(self.script())
    }

    fn directory(&self) -> UserDirectory {
        UserDirectory::new(self.script())
    }

    fn require_admin(&self, caller_email: &str) -> AppResult<AuthStatus> {
        let status = self.resolver().resolve(caller_email)?;
        if !status.is_admin {
            warn!(caller = caller_email, "Admin access denied");
            return Err(AppError::admin_required());
        }
        Ok(status)
    }

    fn require_authenticated(&self, caller_email: &str, action: &str) -> AppResult<AuthStatus> {
        let status = self.resolver().resolve(caller_email)?;
        if !status.is_authenticated {
            warn!(caller = caller_email, action, "Access denied");
            return Err(AppError::login_required(action));
        }
        Ok(status)
    }

    /// Record engine over the bound spreadsheet.
    fn engine(&self) -> AppResult<RecordEngine> {
        let binding = self.read_binding();
        let binding = binding.as_ref().ok_or_else(|| {
            AppError::from(WorkbookError::CannotAccess(
                "no spreadsheet bound".to_string(),
            ))
        })?;
        Ok(RecordEngine::with_sheet_name(
            binding.spreadsheet().clone(),
            self.config.data_sheet_name.as_str(),
        ))
    }

    fn read_binding(&self) -> RwLockReadGuard<'_, Option<SheetBinding>> {
        self.binding.read().unwrap_or_else(|poisoned| {
            warn!("[App] recovering from poisoned binding lock");
            poisoned.into_inner()
        })
    }

    fn write_binding(&self) -> RwLockWriteGuard<'_, Option<SheetBinding>> {
        self.binding.write().unwrap_or_else(|poisoned| {
            warn!("[App] recovering from poisoned binding lock");
            poisoned.into_inner()
        })
    }
}
