/// USGS NWIS Instantaneous Values API client.
///
/// Retrieves the current discharge reading for a single gauge from the
/// waterservices.usgs.gov IV endpoint and extracts the most recent value.
///
/// API Documentation: https://waterservices.usgs.gov/rest/IV-Service.html
///
/// The transport step (`Fetcher::fetch`) and the parse step
/// (`parse_iv_response`) are separate so the parser can be tested against
/// canned documents without a network.

use chrono::DateTime;
use serde::Deserialize;

use crate::config::MonitorConfig;
use crate::model::{FetchError, Reading, PARAM_DISCHARGE};

const NWIS_BASE_URL: &str = "https://waterservices.usgs.gov";

// ============================================================================
// NWIS IV API Response Structures
// ============================================================================
//
// The IV service wraps each reading in four layers of nesting:
//   { value: { timeSeries: [ { values: [ { value: [ {value, dateTime} ] } ] } ] } }
// Only the terminal {value, dateTime} pairs matter here. Numeric readings
// arrive as JSON strings ("45.2"), not numbers.

#[derive(Debug, Deserialize)]
struct IvResponse {
    value: IvPayload,
}

#[derive(Debug, Deserialize)]
struct IvPayload {
    #[serde(rename = "timeSeries")]
    time_series: Vec<IvTimeSeries>,
}

#[derive(Debug, Deserialize)]
struct IvTimeSeries {
    values: Vec<IvValueSet>,
}

#[derive(Debug, Deserialize)]
struct IvValueSet {
    value: Vec<IvPoint>,
}

#[derive(Debug, Deserialize)]
struct IvPoint {
    value: String,
    #[serde(rename = "dateTime")]
    date_time: String,
}

// ============================================================================
// URL construction
// ============================================================================

/// Builds the IV request URL for one site's discharge series.
pub fn build_iv_url(gauge_id: &str) -> String {
    format!(
        "{}/nwis/iv/?format=json&sites={}&parameterCd={}&siteStatus=all",
        NWIS_BASE_URL, gauge_id, PARAM_DISCHARGE
    )
}

// ============================================================================
// Response parsing
// ============================================================================

/// Parses an IV response body into the most recent reading.
///
/// The innermost array is time-ordered ascending by the feed's contract, so
/// the last element is the most recent reading; no explicit sort or
/// max-by-timestamp comparison is performed.
///
/// Errors:
/// - `SchemaError` — malformed JSON, missing key, absent `timeSeries[0]` /
///   `values[0]` index, or an unparseable numeric value or timestamp.
/// - `EmptyData` — the structure is intact but the innermost array is empty.
pub fn parse_iv_response(body: &str) -> Result<Reading, FetchError> {
    let response: IvResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::SchemaError(e.to_string()))?;

    let series = response
        .value
        .time_series
        .first()
        .ok_or_else(|| FetchError::SchemaError("no timeSeries entries in response".to_string()))?;

    let value_set = series
        .values
        .first()
        .ok_or_else(|| FetchError::SchemaError("no value sets in timeSeries".to_string()))?;

    let point = value_set.value.last().ok_or(FetchError::EmptyData)?;

    let flow_cfs: f64 = point.value.parse().map_err(|_| {
        FetchError::SchemaError(format!("non-numeric reading value: {:?}", point.value))
    })?;

    let timestamp = DateTime::parse_from_rfc3339(&point.date_time).map_err(|_| {
        FetchError::SchemaError(format!("unparseable dateTime: {:?}", point.date_time))
    })?;

    Ok(Reading { flow_cfs, timestamp })
}

// ============================================================================
// Fetcher
// ============================================================================

/// Blocking HTTP client for the gauge's IV endpoint.
///
/// Holds the reqwest client (User-Agent, gzip, timeout baked in at
/// construction) and the request URL. One fetch per refresh cycle; retries
/// are a caller decision.
pub struct Fetcher {
    client: reqwest::blocking::Client,
    url: String,
    gauge_id: String,
}

impl Fetcher {
    /// Builds a fetcher from explicit configuration.
    pub fn new(config: &MonitorConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.fetch_timeout())
            .gzip(true)
            .build()?;

        Ok(Fetcher {
            client,
            url: build_iv_url(&config.gauge_id),
            gauge_id: config.gauge_id.clone(),
        })
    }

    pub fn gauge_id(&self) -> &str {
        &self.gauge_id
    }

    /// Issues one GET and extracts the most recent reading.
    ///
    /// Non-2xx status → `ServerError`; transport failure (DNS, reset,
    /// timeout) → `NetworkError`; everything else is delegated to
    /// `parse_iv_response`.
    pub fn fetch(&self) -> Result<Reading, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        parse_iv_response(&body)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Minimal well-formed IV document with the given terminal points.
    fn iv_body(points: &str) -> String {
        format!(
            r#"{{"value": {{"timeSeries": [{{"values": [{{"value": [{}]}}]}}]}}}}"#,
            points
        )
    }

    #[test]
    fn test_build_iv_url_embeds_gauge_and_discharge_param() {
        let url = build_iv_url("12048000");
        assert_eq!(
            url,
            "https://waterservices.usgs.gov/nwis/iv/?format=json&sites=12048000&parameterCd=00060&siteStatus=all"
        );
    }

    #[test]
    fn test_parse_single_reading() {
        let body = iv_body(r#"{"value": "45.2", "dateTime": "2026-01-19T08:15:00.000-08:00"}"#);
        let reading = parse_iv_response(&body).expect("well-formed document");
        assert_eq!(reading.flow_cfs, 45.2);
        assert_eq!(reading.timestamp_display(), "2026-01-19 08:15 AM");
    }

    #[test]
    fn test_parse_takes_last_element_as_most_recent() {
        let body = iv_body(
            r#"{"value": "100.0", "dateTime": "2026-01-19T07:45:00.000-08:00"},
               {"value": "110.0", "dateTime": "2026-01-19T08:00:00.000-08:00"},
               {"value": "120.0", "dateTime": "2026-01-19T08:15:00.000-08:00"}"#,
        );
        let reading = parse_iv_response(&body).expect("well-formed document");
        assert_eq!(reading.flow_cfs, 120.0);
    }

    #[test]
    fn test_empty_innermost_array_is_empty_data() {
        let body = iv_body("");
        assert_eq!(parse_iv_response(&body), Err(FetchError::EmptyData));
    }

    #[test]
    fn test_missing_value_key_is_schema_error() {
        let body = r#"{"declaredType": "something-else"}"#;
        match parse_iv_response(body) {
            Err(FetchError::SchemaError(_)) => {}
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_time_series_key_is_schema_error() {
        let body = r#"{"value": {}}"#;
        match parse_iv_response(body) {
            Err(FetchError::SchemaError(_)) => {}
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_time_series_array_is_schema_error() {
        // An absent timeSeries[0] index is schema drift, not an empty feed:
        // the feed signals "no readings" with an empty innermost array.
        let body = r#"{"value": {"timeSeries": []}}"#;
        match parse_iv_response(body) {
            Err(FetchError::SchemaError(msg)) => {
                assert!(msg.contains("timeSeries"), "message was: {}", msg)
            }
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_values_key_is_schema_error() {
        let body = r#"{"value": {"timeSeries": [{}]}}"#;
        match parse_iv_response(body) {
            Err(FetchError::SchemaError(_)) => {}
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_innermost_value_key_is_schema_error() {
        let body = r#"{"value": {"timeSeries": [{"values": [{}]}]}}"#;
        match parse_iv_response(body) {
            Err(FetchError::SchemaError(_)) => {}
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_reading_is_schema_error() {
        let body = iv_body(r#"{"value": "ice", "dateTime": "2026-01-19T08:15:00.000-08:00"}"#);
        match parse_iv_response(&body) {
            Err(FetchError::SchemaError(msg)) => assert!(msg.contains("ice")),
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_timestamp_is_schema_error() {
        let body = iv_body(r#"{"value": "45.2", "dateTime": "yesterday"}"#);
        match parse_iv_response(&body) {
            Err(FetchError::SchemaError(msg)) => assert!(msg.contains("dateTime")),
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_schema_error() {
        match parse_iv_response("not json at all") {
            Err(FetchError::SchemaError(_)) => {}
            other => panic!("expected SchemaError, got {:?}", other),
        }
    }

    // --- Transport-level error mapping --------------------------------------
    //
    // fetch() against a local one-shot HTTP server, so the status and
    // transport branches run without reaching USGS.

    /// Serves exactly one connection with the given raw response bytes,
    /// then closes. An empty response drops the connection after accept.
    fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                if !response.is_empty() {
                    let _ = stream.write_all(&response);
                }
            }
        });
        format!("http://{}/", addr)
    }

    /// A fetcher pointed at a test server instead of the NWIS endpoint.
    fn fetcher_at(url: String) -> Fetcher {
        let config = MonitorConfig {
            fetch_timeout_secs: 5,
            ..MonitorConfig::default()
        };
        Fetcher {
            client: reqwest::blocking::Client::builder()
                .user_agent(config.user_agent.clone())
                .timeout(config.fetch_timeout())
                .gzip(true)
                .build()
                .expect("client builds"),
            url,
            gauge_id: config.gauge_id,
        }
    }

    #[test]
    fn test_fetch_maps_503_to_server_error() {
        let url = serve_once(
            b"HTTP/1.1 503 Service Unavailable\r\n\
              Content-Length: 0\r\n\
              Connection: close\r\n\r\n"
                .to_vec(),
        );
        let result = fetcher_at(url).fetch();
        assert_eq!(result, Err(FetchError::ServerError(503)));
    }

    #[test]
    fn test_fetch_maps_404_to_server_error() {
        let url = serve_once(
            b"HTTP/1.1 404 Not Found\r\n\
              Content-Length: 0\r\n\
              Connection: close\r\n\r\n"
                .to_vec(),
        );
        let result = fetcher_at(url).fetch();
        assert_eq!(result, Err(FetchError::ServerError(404)));
    }

    #[test]
    fn test_fetch_maps_dropped_connection_to_network_error() {
        // Server accepts, then closes without writing a response.
        let url = serve_once(Vec::new());
        match fetcher_at(url).fetch() {
            Err(FetchError::NetworkError(_)) => {}
            other => panic!("expected NetworkError, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_parses_body_from_successful_response() {
        let body = iv_body(r#"{"value": "45.2", "dateTime": "2026-01-19T08:15:00.000-08:00"}"#);
        let response = format!(
            "HTTP/1.1 200 OK\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let url = serve_once(response.into_bytes());
        let reading = fetcher_at(url).fetch().expect("successful response parses");
        assert_eq!(reading.flow_cfs, 45.2);
        assert_eq!(reading.timestamp_display(), "2026-01-19 08:15 AM");
    }

    #[test]
    fn test_parse_realistic_nwis_document() {
        // Trimmed from a live response: NWIS includes qualifier and
        // method metadata alongside the fields we consume.
        let body = r#"{
            "name": "ns1:timeSeriesResponseType",
            "value": {
                "queryInfo": {"queryURL": "http://waterservices.usgs.gov/nwis/iv/"},
                "timeSeries": [{
                    "sourceInfo": {"siteName": "DUNGENESS RIVER NEAR SEQUIM, WA"},
                    "variable": {"variableCode": [{"value": "00060"}]},
                    "values": [{
                        "value": [
                            {"value": "168", "qualifiers": ["P"], "dateTime": "2026-01-19T07:45:00.000-08:00"},
                            {"value": "171", "qualifiers": ["P"], "dateTime": "2026-01-19T08:00:00.000-08:00"}
                        ],
                        "method": [{"methodID": 123}]
                    }]
                }]
            }
        }"#;
        let reading = parse_iv_response(body).expect("realistic document should parse");
        assert_eq!(reading.flow_cfs, 171.0);
        assert_eq!(reading.timestamp_display(), "2026-01-19 08:00 AM");
    }
}
