// Application state for HTTP handlers
use crate::application::analysis_service::CycleAnalysisService;
use crate::application::streaming_service::StreamingCycleService;

#[derive(Clone)]
pub struct AppState {
    pub analysis_service: CycleAnalysisService,
    pub streaming_service: StreamingCycleService,
}
