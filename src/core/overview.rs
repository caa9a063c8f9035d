use crate::api::client::ApiResult;
use crate::api::types::{ProjectSummary, SessionStats};

/// Dashboard landing tab: aggregate counters plus one row per project.
#[derive(Debug, Default)]
pub struct Overview {
    pub stats: Option<SessionStats>,
    pub projects: Vec<ProjectSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Overview {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Both halves are fetched together; whichever succeeded is kept and the
    /// first failure is reported.
    pub fn apply(
        &mut self,
        stats: ApiResult<SessionStats>,
        projects: ApiResult<Vec<ProjectSummary>>,
    ) {
        self.loading = false;
        self.error = None;
        match stats {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => self.error = Some(e.to_string()),
        }
        match projects {
            Ok(projects) => self.projects = projects,
            Err(e) => {
                self.error.get_or_insert_with(|| e.to_string());
            }
        }
    }
}
