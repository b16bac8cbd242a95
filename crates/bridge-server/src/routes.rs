//! HTTP surface: signal polling and health check

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use bridge_core::{BridgeError, BridgeResult};
use bridge_simulation::PacketAssembler;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, Level};

pub const SIGNAL_PATH: &str = "/api/v1/signal";
pub const HEALTH_PATH: &str = "/health";

/// Build the router over a shared assembler
pub fn router(assembler: Arc<PacketAssembler>) -> Router {
    Router::new()
        .route(SIGNAL_PATH, get(signal_handler))
        .route(HEALTH_PATH, get(health_handler))
        .with_state(assembler)
}

/// Serve one packet; 204 when the bridge has no channels
async fn signal_handler(State(assembler): State<Arc<PacketAssembler>>) -> Response {
    let Some(packet) = assembler.assemble() else {
        debug!("Bridge offline, answering with no content");
        return (
            StatusCode::NO_CONTENT,
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        )
            .into_response();
    };

    let response = json_response(&packet);
    if response.status() == StatusCode::OK {
        info!(
            channels = packet.channel_count(),
            points = packet.points_per_channel(),
            "Served {} channel data packets ({} points each)",
            packet.channel_count(),
            packet.points_per_channel()
        );

        if tracing::enabled!(Level::DEBUG) {
            for (channel, stats) in assembler.channel_ids().into_iter().zip(packet.channel_stats()) {
                debug!(
                    channel,
                    mean = stats.mean,
                    peak_to_peak = stats.peak_to_peak,
                    "Channel stats"
                );
            }
        }
    }
    response
}

async fn health_handler() -> &'static str {
    "OK"
}

fn encode<T: Serialize>(value: &T) -> BridgeResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(BridgeError::from)
}

/// JSON body with permissive CORS, or a 500 carrying the encoder's message
fn json_response<T: Serialize>(value: &T) -> Response {
    match encode(value) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Error encoding JSON");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
                format!("Failed to encode JSON response: {}", e),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use bridge_core::{Packet, Sample};
    use bridge_simulation::{ChannelSynthesizer, SimulatedClock, SimulationConfig};
    use tower::ServiceExt;
    use tracing_test::traced_test;

    const ANCHOR: i64 = 1_700_000_000_000;

    fn assembler(config: SimulationConfig) -> Arc<PacketAssembler> {
        let assembler = PacketAssembler::with_parts(
            &config,
            SimulatedClock::with_anchor(ANCHOR),
            ChannelSynthesizer::silent(),
        )
        .unwrap();
        Arc::new(assembler)
    }

    async fn get_path(app: Router, path: &str) -> Response {
        app.oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(assembler(SimulationConfig::default()));
        let response = get_path(app, HEALTH_PATH).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");
    }

    #[tokio::test]
    async fn test_multi_channel_signal() {
        let app = router(assembler(SimulationConfig::default()));
        let response = get_path(app, SIGNAL_PATH).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let packet: Packet = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let Packet::Multi(series) = packet else {
            panic!("expected multi-channel packet");
        };
        assert_eq!(series.len(), 8);
        assert_eq!(series[0].channel_id, "Fp1");
        assert_eq!(series[7].channel_id, "M1");
        assert!(series.iter().all(|s| s.points.len() == 50));
        assert_eq!(series[0].points[0].timestamp, ANCHOR);
        assert_eq!(series[0].points[49].timestamp, ANCHOR + 196);
    }

    #[tokio::test]
    async fn test_raw_json_field_names() {
        let app = router(assembler(SimulationConfig::default()));
        let body = body_bytes(get_path(app, SIGNAL_PATH).await).await;
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let first = &value[0];
        assert_eq!(first["channelId"], "Fp1");
        assert!(first["points"][0]["t"].is_i64());
        assert!(first["points"][0]["v"].is_f64());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_signal_logs_channel_stats() {
        let app = router(assembler(SimulationConfig::default()));
        let response = get_path(app, SIGNAL_PATH).await;
        assert_eq!(response.status(), StatusCode::OK);

        assert!(logs_contain("Served 8 channel data packets (50 points each)"));
        assert!(logs_contain("Channel stats"));
        assert!(logs_contain("peak_to_peak="));
        assert!(logs_contain("Fp1"));
        assert!(logs_contain("M1"));
    }

    #[tokio::test]
    async fn test_single_channel_signal() {
        let app = router(assembler(SimulationConfig::single_channel()));
        let body = body_bytes(get_path(app, SIGNAL_PATH).await).await;

        let packet: Packet = serde_json::from_slice(&body).unwrap();
        assert!(matches!(packet, Packet::Single(ref points) if points.len() == 50));
    }

    #[tokio::test]
    async fn test_polls_are_contiguous() {
        let app = router(assembler(SimulationConfig::default()));

        let mut last = None;
        for _ in 0..5 {
            let body = body_bytes(get_path(app.clone(), SIGNAL_PATH).await).await;
            let packet: Packet = serde_json::from_slice(&body).unwrap();
            if let Some(previous) = last {
                assert_eq!(packet.first_timestamp(), Some(previous + 4));
            }
            last = packet.last_timestamp();
        }
    }

    #[tokio::test]
    async fn test_offline_answers_no_content() {
        let app = router(assembler(SimulationConfig::offline()));

        for _ in 0..3 {
            let response = get_path(app.clone(), SIGNAL_PATH).await;
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
            assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
            assert!(body_bytes(response).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_concurrent_polls_disjoint() {
        let app = router(assembler(SimulationConfig::default()));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move {
                    let body = body_bytes(get_path(app, SIGNAL_PATH).await).await;
                    let packet: Packet = serde_json::from_slice(&body).unwrap();
                    (packet.first_timestamp().unwrap(), packet.last_timestamp().unwrap())
                })
            })
            .collect();

        let mut ranges = Vec::new();
        for task in tasks {
            ranges.push(task.await.unwrap());
        }
        ranges.sort();

        for pair in ranges.windows(2) {
            assert!(pair[1].0 > pair[0].1);
        }
    }

    #[tokio::test]
    async fn test_unknown_path_not_found() {
        let app = router(assembler(SimulationConfig::default()));
        let response = get_path(app, "/api/v2/signal").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("channel buffer corrupted"))
        }
    }

    #[tokio::test]
    async fn test_encoding_failure_is_internal_error() {
        let response = json_response(&Unencodable);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(body.starts_with("Failed to encode JSON response"));
        assert!(body.contains("channel buffer corrupted"));
    }

    #[tokio::test]
    async fn test_non_finite_voltage_is_internal_error() {
        let packet = Packet::Single(vec![Sample::new(ANCHOR, 1.0), Sample::new(ANCHOR + 4, f64::INFINITY)]);
        let response = json_response(&packet);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(body.starts_with("Failed to encode JSON response"));
        assert!(!body.contains("null"));
    }
}
