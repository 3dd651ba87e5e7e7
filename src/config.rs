//! Settings for rendering a budget report.

use time::Date;

/// The number of operations listed in the "Recent operations" table by default.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// The report title used when none is given.
pub const DEFAULT_TITLE: &str = "Household budget";

/// Settings for [crate::report::render_report].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// The title shown at the top of the report and in the browser tab.
    pub title: String,
    /// The date the report treats as today. Decides the "current month".
    pub today: Date,
    /// How many of the most recent operations to list.
    pub recent_limit: usize,
}

impl ReportConfig {
    /// Create a config with the default title and recent-operation limit.
    pub fn new(today: Date) -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            today,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    /// Set the report title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    /// Set how many recent operations to list.
    pub fn recent_limit(mut self, recent_limit: usize) -> Self {
        self.recent_limit = recent_limit;
        self
    }
}
