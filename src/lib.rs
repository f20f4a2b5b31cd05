/// Dungeness River flow monitor.
///
/// Polls the USGS NWIS instantaneous-values API for the Dungeness River
/// gauge (site 12048000), classifies the current discharge into one of
/// eight severity bands, and renders a color-coded status panel on a fixed
/// refresh cadence.
///
/// Module layout:
/// - `model` — shared domain types and the fetch error taxonomy.
/// - `status` — the severity band table and classifier.
/// - `config` — TOML-backed configuration with compiled-in defaults.
/// - `ingest::usgs` — the NWIS IV API client.
/// - `render` — pure panel and gauge-bar rendering.
/// - `refresh` — the timer/manual-trigger refresh loop.
/// - `logging` — leveled logging with fetch-failure classification.

pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod refresh;
pub mod render;
pub mod status;
