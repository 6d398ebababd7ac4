//! Booking API client — catalog fetchers and the availability aggregator.

use reqwest::Client;
use tracing::{debug, warn};

use clinicbot_core::config::{AvailabilityStrategy, BookingConfig};
use serde::de::DeserializeOwned;

use crate::error::BookingError;
use crate::model::{
    flatten_days, AvailabilityQuery, AvailabilityRequest, AvailabilitySlot, DayRecord, Envelope,
    Provider, Service,
};

// ─────────────────────────────────────────────
// BookingClient
// ─────────────────────────────────────────────

/// HTTP client for the clinic booking API.
///
/// One shared connection-pooled `reqwest::Client` with an explicit request
/// timeout; every method is an independent, stateless call.
pub struct BookingClient {
    http: Client,
    api_base: String,
    store: String,
    strategy: AvailabilityStrategy,
}

impl std::fmt::Debug for BookingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingClient")
            .field("api_base", &self.api_base)
            .field("store", &self.store)
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl BookingClient {
    /// Create a client from booking config.
    pub fn new(config: &BookingConfig) -> Self {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        BookingClient {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            store: config.store.clone(),
            strategy: config.availability_strategy,
        }
    }

    /// Endpoint URL: `{base}/booking-page/{store}/stores/{store}/{resource}`.
    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/booking-page/{}/stores/{}/{}",
            self.api_base, self.store, self.store, resource
        )
    }

    // ────────────── Catalog ──────────────

    /// List the bookable services, in the catalog's order.
    pub async fn services(&self) -> Result<Vec<Service>, BookingError> {
        let url = self.endpoint("services");
        debug!(url = %url, "fetching services catalog");

        let response = self.http.get(&url).send().await?;
        let envelope: Envelope<Service> = decode(response).await?;
        Ok(envelope.data)
    }

    /// List the providers who perform one service.
    pub async fn providers(&self, service_id: i64) -> Result<Vec<Provider>, BookingError> {
        let url = self.endpoint("providers");
        debug!(url = %url, service_id = service_id, "fetching providers");

        let response = self
            .http
            .get(&url)
            .query(&[("serviceId", service_id)])
            .send()
            .await?;
        let envelope: Envelope<Provider> = decode(response).await?;
        Ok(envelope.data)
    }

    // ────────────── Availability ──────────────

    /// Free slots for a date range and non-empty service/provider id sets.
    ///
    /// Dispatches on the configured strategy:
    /// - `Batch` — one POST with all ids; the remote returns the full
    ///   cross-product of matches.
    /// - `PerPair` — one POST per (service, provider) pair, sequential,
    ///   services outer and providers inner. Fail-fast: the first failing
    ///   pair aborts the whole aggregation, discarding collected slots.
    pub async fn availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<AvailabilitySlot>, BookingError> {
        query.validate()?;

        match self.strategy {
            AvailabilityStrategy::Batch => self.availability_batch(query).await,
            AvailabilityStrategy::PerPair => self.availability_per_pair(query).await,
        }
    }

    async fn availability_batch(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<AvailabilitySlot>, BookingError> {
        let days = self
            .post_availability(query, &query.services, &query.providers)
            .await?;
        flatten_days(days)
    }

    async fn availability_per_pair(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<AvailabilitySlot>, BookingError> {
        let mut slots = Vec::new();
        for &service in &query.services {
            for &provider in &query.providers {
                let days = self
                    .post_availability(query, &[service], &[provider])
                    .await
                    .map_err(|e| {
                        warn!(
                            service = service,
                            provider = provider,
                            error = %e,
                            "availability pair failed, aborting aggregation"
                        );
                        e
                    })?;
                slots.extend(flatten_days(days)?);
            }
        }
        Ok(slots)
    }

    /// One availability POST with the given id subsets.
    async fn post_availability(
        &self,
        query: &AvailabilityQuery,
        services: &[i64],
        providers: &[i64],
    ) -> Result<Vec<DayRecord>, BookingError> {
        let url = self.endpoint("availability");
        let body = AvailabilityRequest {
            date_init: &query.date_init,
            date_end: &query.date_end,
            services,
            providers,
        };

        debug!(
            url = %url,
            services = services.len(),
            providers = providers.len(),
            "querying availability"
        );

        let response = self.http.post(&url).json(&body).send().await?;
        let envelope: Envelope<DayRecord> = decode(response).await?;
        Ok(envelope.data)
    }
}

/// Check the status and decode the JSON body into the expected shape.
///
/// Non-200 → `RemoteStatus` (with the body text for diagnostics);
/// undecodable body → `MalformedResponse`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BookingError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, "booking API error response");
        return Err(BookingError::RemoteStatus {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| BookingError::MalformedResponse(e.to_string()))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer, strategy: AvailabilityStrategy) -> BookingClient {
        BookingClient::new(&BookingConfig {
            api_base: server.uri(),
            store: "doc".to_string(),
            timeout_secs: 5,
            availability_strategy: strategy,
        })
    }

    fn query(services: Vec<i64>, providers: Vec<i64>) -> AvailabilityQuery {
        AvailabilityQuery {
            date_init: "2025-09-01T00:00:00Z".to_string(),
            date_end: "2025-09-30T23:59:59Z".to_string(),
            services,
            providers,
        }
    }

    // ── Catalog ──

    #[tokio::test]
    async fn test_services_projection_and_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/booking-page/doc/stores/doc/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": 18, "name": "Dental cleaning", "price": 45.0},
                    {"id": 19, "name": "Checkup", "duration": 20}
                ]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::Batch);
        let services = client.services().await.unwrap();

        assert_eq!(
            services,
            vec![
                Service { id: 18, name: "Dental cleaning".to_string() },
                Service { id: 19, name: "Checkup".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_services_empty_catalog_is_ok() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/booking-page/doc/stores/doc/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::Batch);
        let services = client.services().await.unwrap();
        assert!(services.is_empty());
    }

    #[tokio::test]
    async fn test_services_remote_500_is_an_error_not_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/booking-page/doc/stores/doc/services"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::Batch);
        let err = client.services().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_services_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/booking-page/doc/stores/doc/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::Batch);
        let err = client.services().await.unwrap_err();
        assert!(matches!(err, BookingError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_providers_sends_service_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/booking-page/doc/stores/doc/providers"))
            .and(query_param("serviceId", "18"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 14, "name": "Dr. Reis", "role": "dentist"}]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::Batch);
        let providers = client.providers(18).await.unwrap();

        assert_eq!(
            providers,
            vec![Provider { id: 14, name: "Dr. Reis".to_string() }]
        );
    }

    #[tokio::test]
    async fn test_providers_remote_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/booking-page/doc/stores/doc/providers"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such store"))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::Batch);
        let err = client.providers(18).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    // ── Availability: batch ──

    /// The worked example: one day, one window, one aligned triple.
    #[tokio::test]
    async fn test_availability_batch_single_slot() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/booking-page/doc/stores/doc/availability"))
            .and(body_json(json!({
                "dateInit": "2025-09-01T00:00:00Z",
                "dateEnd": "2025-09-30T23:59:59Z",
                "services": [18, 19],
                "providers": [14, 15]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "day": "2025-09-05",
                    "hours": [{
                        "start": "09:00",
                        "end": "12:00",
                        "providers": [14],
                        "services": [18],
                        "durations": [30]
                    }]
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::Batch);
        let slots = client
            .availability(&query(vec![18, 19], vec![14, 15]))
            .await
            .unwrap();

        assert_eq!(
            slots,
            vec![AvailabilitySlot {
                service_id: 18,
                provider_id: 14,
                day: "2025-09-05".to_string(),
                start_time: "09:00".to_string(),
                end_time: "12:00".to_string(),
                duration: 30,
            }]
        );
    }

    #[tokio::test]
    async fn test_availability_batch_slot_count() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/booking-page/doc/stores/doc/availability"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "day": "2025-09-05",
                        "hours": [
                            {
                                "start": "09:00", "end": "12:00",
                                "providers": [14, 15], "services": [18, 18],
                                "durations": [30, 30]
                            },
                            {
                                "start": "14:00", "end": "17:00",
                                "providers": [14], "services": [19],
                                "durations": [45]
                            }
                        ]
                    },
                    {
                        "day": "2025-09-06",
                        "hours": [{
                            "start": "10:00", "end": "11:00",
                            "providers": [15], "services": [18],
                            "durations": [30]
                        }]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::Batch);
        let slots = client
            .availability(&query(vec![18, 19], vec![14, 15]))
            .await
            .unwrap();

        // Sum of aligned-array lengths: 2 + 1 + 1
        assert_eq!(slots.len(), 4);
        // Day → window → index order
        assert_eq!(slots[0].provider_id, 14);
        assert_eq!(slots[1].provider_id, 15);
        assert_eq!(slots[2].start_time, "14:00");
        assert_eq!(slots[3].day, "2025-09-06");
    }

    #[tokio::test]
    async fn test_availability_batch_remote_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/booking-page/doc/stores/doc/availability"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::Batch);
        let err = client
            .availability(&query(vec![18], vec![14]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_availability_batch_misaligned_arrays() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/booking-page/doc/stores/doc/availability"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "day": "2025-09-05",
                    "hours": [{
                        "start": "09:00", "end": "12:00",
                        "providers": [14, 15], "services": [18],
                        "durations": [30]
                    }]
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::Batch);
        let err = client
            .availability(&query(vec![18], vec![14, 15]))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::MalformedResponse(_)));
    }

    // ── Availability: per-pair ──

    #[tokio::test]
    async fn test_availability_per_pair_concatenates_in_pair_order() {
        let server = MockServer::start().await;

        // Pair (18, 14)
        Mock::given(method("POST"))
            .and(path("/booking-page/doc/stores/doc/availability"))
            .and(body_json(json!({
                "dateInit": "2025-09-01T00:00:00Z",
                "dateEnd": "2025-09-30T23:59:59Z",
                "services": [18],
                "providers": [14]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "day": "2025-09-05",
                    "hours": [{
                        "start": "09:00", "end": "12:00",
                        "providers": [14], "services": [18], "durations": [30]
                    }]
                }]
            })))
            .mount(&server)
            .await;

        // Pair (18, 15)
        Mock::given(method("POST"))
            .and(path("/booking-page/doc/stores/doc/availability"))
            .and(body_json(json!({
                "dateInit": "2025-09-01T00:00:00Z",
                "dateEnd": "2025-09-30T23:59:59Z",
                "services": [18],
                "providers": [15]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "day": "2025-09-04",
                    "hours": [{
                        "start": "10:00", "end": "11:00",
                        "providers": [15], "services": [18], "durations": [45]
                    }]
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::PerPair);
        let slots = client
            .availability(&query(vec![18], vec![14, 15]))
            .await
            .unwrap();

        // Pair order wins over day order: (18,14) slots come first
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].provider_id, 14);
        assert_eq!(slots[0].day, "2025-09-05");
        assert_eq!(slots[1].provider_id, 15);
        assert_eq!(slots[1].day, "2025-09-04");
    }

    /// Fail-fast: a failing pair discards slots already collected.
    #[tokio::test]
    async fn test_availability_per_pair_fail_fast_discards_partial() {
        let server = MockServer::start().await;

        // Pair (18, 14) succeeds with 3 slots
        Mock::given(method("POST"))
            .and(path("/booking-page/doc/stores/doc/availability"))
            .and(body_json(json!({
                "dateInit": "2025-09-01T00:00:00Z",
                "dateEnd": "2025-09-30T23:59:59Z",
                "services": [18],
                "providers": [14]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "day": "2025-09-05",
                    "hours": [{
                        "start": "09:00", "end": "12:00",
                        "providers": [14, 14, 14],
                        "services": [18, 18, 18],
                        "durations": [30, 30, 30]
                    }]
                }]
            })))
            .mount(&server)
            .await;

        // Pair (18, 15) fails
        Mock::given(method("POST"))
            .and(path("/booking-page/doc/stores/doc/availability"))
            .and(body_json(json!({
                "dateInit": "2025-09-01T00:00:00Z",
                "dateEnd": "2025-09-30T23:59:59Z",
                "services": [18],
                "providers": [15]
            })))
            .respond_with(ResponseTemplate::new(500).set_body_string("pair down"))
            .mount(&server)
            .await;

        let client = make_client(&server, AvailabilityStrategy::PerPair);
        let result = client.availability(&query(vec![18], vec![14, 15])).await;

        // Not the 3 slots from the first pair — the whole call errors
        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    // ── Query validation ──

    #[tokio::test]
    async fn test_availability_empty_ids_no_request() {
        // No mocks mounted: a request would 404 and surface as RemoteStatus.
        let server = MockServer::start().await;
        let client = make_client(&server, AvailabilityStrategy::Batch);

        let err = client
            .availability(&query(vec![], vec![14]))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidQuery(_)));

        let err = client
            .availability(&query(vec![18], vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidQuery(_)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = BookingClient::new(&BookingConfig {
            api_base: "https://api.doc.pt/".to_string(),
            ..BookingConfig::default()
        });
        assert_eq!(
            client.endpoint("services"),
            "https://api.doc.pt/booking-page/doc/stores/doc/services"
        );
    }
}
