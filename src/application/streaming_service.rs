// Streaming service - Progressive delivery of cycle summaries
use crate::application::analysis_service::CycleAnalysisService;
use crate::domain::cycle::AggregatedCycle;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Header {
        log_id: String,
        cycle_count: usize,
        started_at: DateTime<Utc>,
    },
    Cycle {
        record: AggregatedCycle,
    },
    Error {
        message: String,
    },
    Complete {
        cycle_count: usize,
        duration_ms: i64,
    },
}

#[derive(Clone)]
pub struct StreamingCycleService {
    analysis: CycleAnalysisService,
    channel_capacity: usize,
}

impl StreamingCycleService {
    pub fn new(analysis: CycleAnalysisService, channel_capacity: usize) -> Self {
        Self {
            analysis,
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Aggregate the whole log, then emit a header, one message per cycle and a completion event.
    pub fn stream_log(&self, log_id: &str) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let analysis = self.analysis.clone();
        let log_id = log_id.to_string();

        tokio::spawn(async move {
            let started_at = Utc::now();
            let start_time = Instant::now();

            let cycles = match analysis.analyze_log(&log_id).await {
                Ok(cycles) => cycles,
                Err(e) => {
                    tracing::warn!("Streaming log {} failed: {}", log_id, e);
                    let _ = tx
                        .send(StreamMessage::Error {
                            message: e.to_string(),
                        })
                        .await;
                    return;
                }
            };

            let cycle_count = cycles.len();
            let header = StreamMessage::Header {
                log_id: log_id.clone(),
                cycle_count,
                started_at,
            };
            if tx.send(header).await.is_err() {
                return;
            }

            for record in cycles {
                if tx.send(StreamMessage::Cycle { record }).await.is_err() {
                    tracing::debug!("Client dropped stream for log {}", log_id);
                    return;
                }
            }

            let duration_ms = start_time.elapsed().as_millis() as i64;
            let _ = tx
                .send(StreamMessage::Complete {
                    cycle_count,
                    duration_ms,
                })
                .await;
        });

        rx
    }
}
