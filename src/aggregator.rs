//! Concurrent fan-out to the coordinate keyed providers and barrier join of their outcomes

use std::time::Instant;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, instrument};

use crate::config::UpstreamConfig;
use crate::models::{AggregateResult, Coordinate, ProviderKind, ProviderOutcome};
use crate::providers::{self, ProviderSet};

/// Fans a coordinate out to the required providers and joins every outcome
pub struct Aggregator {
    client: Client,
    providers: ProviderSet,
}

impl Aggregator {
    /// Build the shared HTTP client and the provider set from configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self::with_client(client, ProviderSet::from(config)))
    }

    #[must_use]
    pub fn with_client(client: Client, providers: ProviderSet) -> Self {
        Self { client, providers }
    }

    /// Shared upstream HTTP client
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Query every required provider concurrently and wait for all of them
    ///
    /// Never fails: provider errors are carried inside the returned slots. Each required
    /// provider gets exactly one slot, filled by identity rather than completion order.
    #[instrument(skip(self, coordinate), fields(coordinate = %coordinate.format_coordinates()))]
    pub async fn aggregate(&self, coordinate: &Coordinate, required: &[ProviderKind]) -> AggregateResult {
        let start_time = Instant::now();

        let (location, forecast, air_quality) = futures::join!(
            self.fetch_if_required(ProviderKind::ReverseGeocode, coordinate, required),
            self.fetch_if_required(ProviderKind::Forecast, coordinate, required),
            self.fetch_if_required(ProviderKind::AirQuality, coordinate, required),
        );

        let result = AggregateResult {
            location,
            forecast,
            air_quality,
        };

        let succeeded = ProviderKind::ALL
            .iter()
            .filter(|kind| result.is_success(**kind))
            .count();
        info!(
            "Joined {} provider(s), {} succeeded, in {:.3}s",
            required.len(),
            succeeded,
            start_time.elapsed().as_secs_f64()
        );

        result
    }

    async fn fetch_if_required(
        &self,
        kind: ProviderKind,
        coordinate: &Coordinate,
        required: &[ProviderKind],
    ) -> Option<ProviderOutcome> {
        if !required.contains(&kind) {
            return None;
        }
        Some(providers::fetch(&self.client, self.providers.get(kind), coordinate).await)
    }
}
