use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use super::ServiceError;
use crate::metrics::PROBLEM_REPORTS_TOTAL;
use crate::models::report::{CreateReportRequest, ProblemReport, ReportStatus};
use crate::models::LearnerId;
use crate::storage::{ProblemStore, ReportStore};
use crate::utils::ids::generate_report_id;

pub struct ReportService {
    problems: Arc<dyn ProblemStore>,
    reports: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(problems: Arc<dyn ProblemStore>, reports: Arc<dyn ReportStore>) -> Self {
        Self { problems, reports }
    }

    pub async fn submit(
        &self,
        learner: &LearnerId,
        problem_id: &str,
        req: &CreateReportRequest,
    ) -> Result<ProblemReport, ServiceError> {
        req.validate()
            .map_err(|e| ServiceError::Invalid(format!("Validation error: {}", e)))?;

        if self.problems.find_problem(problem_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Problem {} not found",
                problem_id
            )));
        }

        let report = ProblemReport {
            report_id: generate_report_id(),
            user_id: learner.as_str().to_string(),
            problem_id: problem_id.to_string(),
            report_type: req.report_type,
            report_content: req.content.trim().to_string(),
            report_status: ReportStatus::Open,
            created_at: Utc::now(),
        };

        self.reports.insert_report(&report).await?;
        PROBLEM_REPORTS_TOTAL
            .with_label_values(&[report.report_type.as_str()])
            .inc();

        tracing::info!(
            "Problem report {} filed: learner={}, problem={}, type={}",
            report.report_id,
            learner,
            problem_id,
            report.report_type.label()
        );

        Ok(report)
    }
}
