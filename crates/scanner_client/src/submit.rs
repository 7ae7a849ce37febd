use scanner_logging::scanner_info;

use crate::{AnalysisService, AnalyzeRequest, FailureKind, JobHandle, ServiceError};

/// Sends one creation request. Blank domain text is rejected locally, before
/// any request; everything else about the text is left to the service.
pub async fn submit_analysis(
    service: &dyn AnalysisService,
    request: &AnalyzeRequest,
) -> Result<JobHandle, ServiceError> {
    if request.domains.trim().is_empty() {
        return Err(ServiceError::new(
            FailureKind::Validation,
            "at least one domain is required",
        ));
    }

    let handle = service.analyze(request).await?;
    scanner_info!(
        "Job {} accepted: {} domain(s), {} recipient(s)",
        handle.job_id,
        handle.domains_count,
        handle.recipients_count
    );
    Ok(handle)
}
