//! Course service configuration loaded via OrthoConfig.
//!
//! Values are layered from defaults, configuration files, `COURSES_*`
//! environment variables and command-line flags.

use ortho_config::OrthoConfig;
use pagination::{PageSize, PaginationError};
use serde::Deserialize;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration values for the course service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COURSES")]
pub struct CourseSettings {
    /// Courses per listing page.
    pub page_size: Option<u32>,
}

impl CourseSettings {
    /// Return the validated page size, falling back to the default.
    ///
    /// A configured size of zero is rejected.
    pub fn page_size(&self) -> Result<PageSize, PaginationError> {
        PageSize::new(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}
