//! Spreadsheet binding operations.

use super::App;
use crate::error::AppResult;
use sheetgate_workbook::SheetBinding;

impl App {
    /// The configured sheet ID. A missing or malformed stored ID is replaced
    /// by the default.
    pub fn sheet_link(&self) -> AppResult<String> {
        Ok(SheetBinding::configured_sheet_id(
            &self.binding_properties(),
            &self.config.default_sheet_id,
        )?)
    }

    /// Point the application at another spreadsheet. Admin only.
    ///
    /// Raises on invalid input and on a spreadsheet that cannot be opened;
    /// the previous binding stays in place in both cases.
    pub fn set_sheet_link(&self, caller_email: &str, user_input: &str) -> AppResult<String> {
        self.require_admin(caller_email)?;

        let binding =
            SheetBinding::rebind(&self.binding_properties(), &self.workbooks, user_input)?;
        let message = format!("Spreadsheet ID updated to: {}", binding.sheet_id());
        *self.write_binding() = Some(binding);
        Ok(message)
    }

    pub fn spreadsheet_title(&self) -> String {
        self.read_binding()
            .as_ref()
            .map(|b| b.title().to_string())
            .unwrap_or_else(|| "Spreadsheet title not available".to_string())
    }

    pub fn spreadsheet_url(&self) -> Option<String> {
        self.read_binding().as_ref().map(SheetBinding::url)
    }

    /// Bind the spreadsheet named by a setup link.
    pub(super) fn bind_setup_link(&self, link: &str) -> AppResult<()> {
        let binding = SheetBinding::rebind(&self.binding_properties(), &self.workbooks, link)?;
        *self.write_binding() = Some(binding);
        Ok(())
    }
}
