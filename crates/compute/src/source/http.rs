//! Live telemetry over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use ecu_core::Reading;

use super::{DataSource, ReadingQuery, SourceError};

/// Standard response envelope of the telemetry API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl<T> ApiResponse<T> {
    /// Payload of a successful envelope, or the API's error message.
    pub fn into_result(self) -> Result<Option<T>, SourceError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(SourceError::Api(
                self.error.unwrap_or_else(|| "request unsuccessful".to_string()),
            ))
        }
    }
}

/// GETs `{base}{endpoint}?device=&from=&to=&limit=`.
pub struct HttpDataSource {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl HttpDataSource {
    pub fn new(base_url: &str, endpoint: &str, timeout: Duration) -> Result<Self, SourceError> {
        let url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), endpoint))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            timeout,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn request_url(&self, query: &ReadingQuery) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("device", &query.device_id)
            .append_pair("from", &query.from.timestamp_millis().to_string())
            .append_pair("to", &query.to.timestamp_millis().to_string())
            .append_pair("limit", &query.limit.to_string());
        url
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, query: &ReadingQuery) -> Result<Vec<Reading>, SourceError> {
        let url = self.request_url(query);
        debug!(url = %url, "fetching readings");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout)
            } else {
                SourceError::Http(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Api(format!("status {}: {}", status.as_u16(), body)));
        }

        let mut readings = decode_readings(&body)?;
        if readings.len() > query.limit {
            readings.drain(..readings.len() - query.limit);
        }
        Ok(readings)
    }
}

/// Decode an envelope of flat records into readings, oldest first.
///
/// Each record carries a `timestamp` (epoch millis or RFC 3339) and one
/// numeric field per metric. Non-numeric fields are ignored; records without
/// a usable timestamp are dropped.
pub(crate) fn decode_readings(body: &str) -> Result<Vec<Reading>, SourceError> {
    let envelope: ApiResponse<Vec<Map<String, Value>>> =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;
    let records = envelope.into_result()?.unwrap_or_default();

    let mut readings: Vec<Reading> = records
        .into_iter()
        .filter_map(|record| {
            let ts = record.get("timestamp").and_then(parse_timestamp);
            if ts.is_none() {
                debug!("dropping record without a usable timestamp");
            }
            let ts = ts?;
            let reading = record
                .iter()
                .filter(|(k, _)| k.as_str() != "timestamp")
                .filter_map(|(k, v)| v.as_f64().map(|n| (k, n)))
                .fold(Reading::new(ts), |r, (k, n)| r.with(k.as_str(), n));
            Some(reading)
        })
        .collect();

    readings.sort_by_key(|r| r.timestamp);
    Ok(readings)
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    const BODY: &str = r#"{
        "success": true,
        "timestamp": 1700000120000,
        "data": [
            {"timestamp": 1700000060000, "time": "00:01", "rightTempPV": 57.5, "hepaEfficiency": 93.0},
            {"timestamp": 1700000000000, "time": "00:00", "rightTempPV": 55.1, "hepaEfficiency": null},
            {"time": "no stamp", "rightTempPV": 99.0},
            {"timestamp": "2023-11-14T22:15:00Z", "rightTempPV": 56.0}
        ]
    }"#;

    #[test]
    fn decodes_flat_records_in_time_order() {
        let readings = decode_readings(BODY).unwrap();

        assert_eq!(readings.len(), 3);
        assert!(readings.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        let first = &readings[0];
        assert_eq!(first.timestamp.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(first.values.get("rightTempPV"), Some(&55.1));
        assert!(!first.values.contains_key("hepaEfficiency"));
        assert!(!first.values.contains_key("time"));
    }

    #[test]
    fn unsuccessful_envelope_is_api_error() {
        let err = decode_readings(r#"{"success": false, "error": "device offline"}"#).unwrap_err();
        match err {
            SourceError::Api(msg) => assert_eq!(msg, "device offline"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(
            decode_readings("<html>").unwrap_err(),
            SourceError::Decode(_)
        ));
    }

    #[test]
    fn missing_data_is_empty() {
        assert!(decode_readings(r#"{"success": true}"#).unwrap().is_empty());
    }

    #[test]
    fn request_url_carries_query() {
        let src =
            HttpDataSource::new("http://plant.local/", "/api/ecu/data", Duration::from_secs(1))
                .unwrap();
        let to = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let url = src.request_url(&ReadingQuery::window("3", to, 60));
        assert_eq!(url.path(), "/api/ecu/data");
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("device".into(), "3".into())));
        assert!(pairs.contains(&("to".into(), "1700000000000".into())));
        assert!(pairs.contains(&("limit".into(), "60".into())));
    }

    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let response = format!(
                "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            sock.write_all(response.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn fetch_against_local_server() {
        let base = serve_once("HTTP/1.1 200 OK", BODY).await;
        let src = HttpDataSource::new(&base, "/api/ecu/data", Duration::from_secs(5)).unwrap();
        let to = Utc.timestamp_millis_opt(1_700_000_120_000).unwrap();

        let readings = src.fetch(&ReadingQuery::window("3", to, 2)).await.unwrap();

        // limit keeps the most recent
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].timestamp.timestamp_millis(), 1_700_000_060_000);
        assert_eq!(readings[1].timestamp.timestamp_millis(), 1_700_000_100_000);
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let base = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;
        let src = HttpDataSource::new(&base, "/api/ecu/data", Duration::from_secs(5)).unwrap();
        let err = src
            .fetch(&ReadingQuery::window("3", Utc::now(), 10))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Api(_)));
    }
}
