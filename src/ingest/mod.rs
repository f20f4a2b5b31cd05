/// Data ingestion for the flow monitor.
///
/// Submodules:
/// - `usgs` — USGS NWIS instantaneous-values API client (the Fetcher).

pub mod usgs;
