//! Sea-routing oracles.
//!
//! - [`SearouteClient`] asks a searoute-style HTTP service for the shortest
//!   navigable path and memoises legs in memory with a TTL and stale fallbacks.
//! - [`GreatCircleOracle`] works offline from coordinates alone.

use std::{
    collections::HashMap,
    f64::consts::PI,
    sync::Arc,
    time::{Duration, SystemTime},
};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::domain::{DistanceUnits, LonLat, OracleError, SeaRouteOracle};
use crate::util::version::user_agent;

const DEFAULT_BASE_URL: &str = "http://localhost:8700/";
const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One sailing path as reported by the routing service.
#[derive(Clone, Debug, PartialEq)]
pub struct SeaRoute {
    pub length: f64,
    pub units: DistanceUnits,
    pub coordinates: Vec<LonLat>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

/// Coordinates compared bit-for-bit so identical legs share an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct LegKey {
    origin: (u64, u64),
    destination: (u64, u64),
    units: DistanceUnits,
}

impl LegKey {
    fn new(origin: LonLat, destination: LonLat, units: DistanceUnits) -> Self {
        Self {
            origin: (origin.lon.to_bits(), origin.lat.to_bits()),
            destination: (destination.lon.to_bits(), destination.lat.to_bits()),
            units,
        }
    }
}

#[derive(Clone)]
pub struct SearouteClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<HashMap<LegKey, Cached<SeaRoute>>>>,
    ttl: Duration,
}

impl SearouteClient {
    pub fn new() -> Result<Self, OracleError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> Result<Self, OracleError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            cache: Arc::new(Mutex::new(HashMap::new())),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn get_route(
        &self,
        origin: LonLat,
        destination: LonLat,
        units: DistanceUnits,
    ) -> Result<CachedPayload<SeaRoute>, OracleError> {
        check_coordinate(origin)?;
        check_coordinate(destination)?;

        let key = LegKey::new(origin, destination, units);
        if let Some(payload) = self.cached_route(&key).await {
            tracing::debug!(%origin, %destination, "Serving cached sea route");
            return Ok(payload);
        }

        match self.fetch_route(origin, destination, units).await {
            Ok(route) => Ok(self.store_route(key, route).await),
            Err(error) => {
                if let Some(stale) = self.cached_route_stale(&key).await {
                    tracing::warn!(%origin, %destination, %error, "Routing failed; using stale leg");
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn fetch_route(
        &self,
        origin: LonLat,
        destination: LonLat,
        units: DistanceUnits,
    ) -> Result<SeaRoute, OracleError> {
        let url = self.route_url(origin, destination, units)?;
        tracing::debug!(%url, "Requesting sea route");

        let response = self.http.get(url).send().await?.error_for_status()?;
        let feature: RouteFeatureDto = response.json().await?;
        SeaRoute::try_from(feature).map(|route| SeaRoute { units, ..route })
    }

    fn route_url(
        &self,
        origin: LonLat,
        destination: LonLat,
        units: DistanceUnits,
    ) -> Result<Url, OracleError> {
        let mut url = self.base_url.join("route")?;
        url.query_pairs_mut()
            .append_pair("origin", &format!("{},{}", origin.lon, origin.lat))
            .append_pair("destination", &format!("{},{}", destination.lon, destination.lat))
            .append_pair("units", units.code());
        Ok(url)
    }

    async fn cached_route(&self, key: &LegKey) -> Option<CachedPayload<SeaRoute>> {
        let cache = self.cache.lock().await;
        cache
            .get(key)
            .filter(|entry| entry.within(self.ttl))
            .map(|entry| entry.payload(CacheStatus::Cached))
    }

    async fn cached_route_stale(&self, key: &LegKey) -> Option<CachedPayload<SeaRoute>> {
        let cache = self.cache.lock().await;
        cache.get(key).map(|entry| entry.payload(CacheStatus::Stale))
    }

    async fn store_route(&self, key: LegKey, route: SeaRoute) -> CachedPayload<SeaRoute> {
        let entry = Cached {
            value: route,
            fetched_at: SystemTime::now(),
        };
        let payload = entry.payload(CacheStatus::Fresh);
        self.cache.lock().await.insert(key, entry);
        payload
    }
}

#[async_trait]
impl SeaRouteOracle for SearouteClient {
    async fn distance(
        &self,
        origin: LonLat,
        destination: LonLat,
        units: DistanceUnits,
    ) -> Result<f64, OracleError> {
        Ok(self.get_route(origin, destination, units).await?.data.length)
    }

    async fn route(&self, origin: LonLat, destination: LonLat) -> Result<Vec<LonLat>, OracleError> {
        Ok(self
            .get_route(origin, destination, DistanceUnits::default())
            .await?
            .data
            .coordinates)
    }
}

/// A stored leg and when it was fetched.
struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn within(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed().is_ok_and(|age| age <= ttl)
    }

    fn payload(&self, status: CacheStatus) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, status)
    }
}

/// GeoJSON `Feature` with a `LineString` geometry and the path length.
#[derive(Debug, Deserialize)]
struct RouteFeatureDto {
    properties: RoutePropertiesDto,
    geometry: LineStringDto,
}

#[derive(Debug, Deserialize)]
struct RoutePropertiesDto {
    length: f64,
}

#[derive(Debug, Deserialize)]
struct LineStringDto {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

impl TryFrom<RouteFeatureDto> for SeaRoute {
    type Error = OracleError;

    fn try_from(dto: RouteFeatureDto) -> Result<Self, Self::Error> {
        let length = dto.properties.length;
        if !length.is_finite() || length < 0.0 {
            return Err(OracleError::Api(format!("invalid route length {length}")));
        }
        Ok(Self {
            length,
            units: DistanceUnits::default(),
            coordinates: dto
                .geometry
                .coordinates
                .into_iter()
                .map(|[lon, lat]| LonLat::new(lon, lat))
                .collect(),
        })
    }
}

fn check_coordinate(point: LonLat) -> Result<(), OracleError> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(OracleError::InvalidCoordinate(point.to_string()))
    }
}

/// Offline oracle: great-circle distance and track, ignoring land masses.
#[derive(Clone, Debug)]
pub struct GreatCircleOracle {
    /// Number of segments the waypoint track is split into.
    pub segments: usize,
}

impl Default for GreatCircleOracle {
    fn default() -> Self {
        Self { segments: 32 }
    }
}

impl GreatCircleOracle {
    pub fn central_angle(origin: LonLat, destination: LonLat) -> f64 {
        let (lat1, lat2) = (to_radians(origin.lat), to_radians(destination.lat));
        let d_lat = lat2 - lat1;
        let d_lon = to_radians(destination.lon - origin.lon);
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * a.sqrt().atan2((1.0 - a).sqrt())
    }

    pub fn track(&self, origin: LonLat, destination: LonLat) -> Vec<LonLat> {
        let delta = Self::central_angle(origin, destination);
        if delta == 0.0 || self.segments < 2 {
            return if delta == 0.0 {
                vec![origin]
            } else {
                vec![origin, destination]
            };
        }

        let (lat1, lon1) = (to_radians(origin.lat), to_radians(origin.lon));
        let (lat2, lon2) = (to_radians(destination.lat), to_radians(destination.lon));
        let sin_delta = delta.sin();

        let mut points = Vec::with_capacity(self.segments + 1);
        points.push(origin);
        for step in 1..self.segments {
            let fraction = step as f64 / self.segments as f64;
            let a = ((1.0 - fraction) * delta).sin() / sin_delta;
            let b = (fraction * delta).sin() / sin_delta;
            let x = a * lat1.cos() * lon1.cos() + b * lat2.cos() * lon2.cos();
            let y = a * lat1.cos() * lon1.sin() + b * lat2.cos() * lon2.sin();
            let z = a * lat1.sin() + b * lat2.sin();
            let lat = z.atan2((x * x + y * y).sqrt());
            let lon = y.atan2(x);
            points.push(LonLat::new(to_degrees(lon), to_degrees(lat)));
        }
        points.push(destination);
        points
    }
}

#[async_trait]
impl SeaRouteOracle for GreatCircleOracle {
    async fn distance(
        &self,
        origin: LonLat,
        destination: LonLat,
        units: DistanceUnits,
    ) -> Result<f64, OracleError> {
        check_coordinate(origin)?;
        check_coordinate(destination)?;
        Ok(Self::central_angle(origin, destination) * units.earth_radius())
    }

    async fn route(&self, origin: LonLat, destination: LonLat) -> Result<Vec<LonLat>, OracleError> {
        check_coordinate(origin)?;
        check_coordinate(destination)?;
        Ok(self.track(origin, destination))
    }
}

fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on the discard port, so requests fail fast.
    const UNREACHABLE: &str = "http://127.0.0.1:9/";

    #[tokio::test]
    async fn one_degree_of_equator() {
        let oracle = GreatCircleOracle::default();
        let origin = LonLat::new(0.0, 0.0);
        let destination = LonLat::new(1.0, 0.0);

        let miles = oracle
            .distance(origin, destination, DistanceUnits::Miles)
            .await
            .unwrap();
        assert!((miles - 69.093).abs() < 0.01, "{miles}");

        let nautical = oracle
            .distance(origin, destination, DistanceUnits::NauticalMiles)
            .await
            .unwrap();
        assert!((nautical - 60.04).abs() < 0.01, "{nautical}");
    }

    #[tokio::test]
    async fn rejects_out_of_range_coordinates() {
        let oracle = GreatCircleOracle::default();
        let result = oracle
            .distance(LonLat::new(0.0, 95.0), LonLat::new(1.0, 0.0), DistanceUnits::Miles)
            .await;
        assert!(matches!(result, Err(OracleError::InvalidCoordinate(_))));
    }

    #[test]
    fn track_runs_between_endpoints() {
        let oracle = GreatCircleOracle { segments: 4 };
        let origin = LonLat::new(0.0, 0.0);
        let destination = LonLat::new(40.0, 0.0);
        let track = oracle.track(origin, destination);

        assert_eq!(track.len(), 5);
        assert_eq!(track.first(), Some(&origin));
        assert_eq!(track.last(), Some(&destination));
        assert!((track[2].lon - 20.0).abs() < 1e-9);
        assert!(track[2].lat.abs() < 1e-9);
        assert_eq!(oracle.track(origin, origin), vec![origin]);
    }

    #[test]
    fn parses_route_feature() {
        let json = r#"{
            "type": "Feature",
            "properties": { "length": 523.4, "units": "mi" },
            "geometry": { "type": "LineString", "coordinates": [[4.0, 51.9], [9.9, 53.5]] }
        }"#;
        let dto: RouteFeatureDto = serde_json::from_str(json).unwrap();
        let route = SeaRoute::try_from(dto).unwrap();
        assert_eq!(route.length, 523.4);
        assert_eq!(
            route.coordinates,
            vec![LonLat::new(4.0, 51.9), LonLat::new(9.9, 53.5)]
        );
    }

    #[test]
    fn negative_length_is_an_api_error() {
        let json = r#"{ "properties": { "length": -1.0 }, "geometry": { "coordinates": [] } }"#;
        let dto: RouteFeatureDto = serde_json::from_str(json).unwrap();
        assert!(matches!(SeaRoute::try_from(dto), Err(OracleError::Api(_))));
    }

    #[test]
    fn route_url_carries_lon_lat_and_units() {
        let client = SearouteClient::with_base_url("http://routing.local/api/").unwrap();
        let url = client
            .route_url(
                LonLat::new(4.5, 51.9),
                LonLat::new(-74.0, 40.7),
                DistanceUnits::NauticalMiles,
            )
            .unwrap();
        assert_eq!(url.path(), "/api/route");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("origin".to_string(), "4.5,51.9".to_string()),
                ("destination".to_string(), "-74,40.7".to_string()),
                ("units".to_string(), "nm".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn serves_fresh_legs_from_memory() {
        let client = SearouteClient::with_base_url(UNREACHABLE).unwrap();
        let (origin, destination) = (LonLat::new(1.0, 1.0), LonLat::new(2.0, 2.0));
        let key = LegKey::new(origin, destination, DistanceUnits::Miles);
        client
            .store_route(
                key,
                SeaRoute {
                    length: 97.0,
                    units: DistanceUnits::Miles,
                    coordinates: vec![origin, destination],
                },
            )
            .await;

        let payload = client
            .get_route(origin, destination, DistanceUnits::Miles)
            .await
            .unwrap();
        assert_eq!(payload.status, CacheStatus::Cached);
        assert_eq!(
            client
                .distance(origin, destination, DistanceUnits::Miles)
                .await
                .unwrap(),
            97.0
        );
    }

    #[tokio::test]
    async fn falls_back_to_stale_leg_when_service_is_down() {
        let client = SearouteClient::with_base_url(UNREACHABLE)
            .unwrap()
            .with_ttl(Duration::ZERO);
        let (origin, destination) = (LonLat::new(1.0, 1.0), LonLat::new(2.0, 2.0));
        let key = LegKey::new(origin, destination, DistanceUnits::Miles);
        client
            .store_route(
                key,
                SeaRoute {
                    length: 97.0,
                    units: DistanceUnits::Miles,
                    coordinates: vec![],
                },
            )
            .await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let payload = client
            .get_route(origin, destination, DistanceUnits::Miles)
            .await
            .unwrap();
        assert_eq!(payload.status, CacheStatus::Stale);
        assert_eq!(payload.data.length, 97.0);

        client.clear_cache().await;
        assert!(client
            .get_route(origin, destination, DistanceUnits::Miles)
            .await
            .is_err());
    }

    const ROUTE_BODY: &str = r#"{
        "type": "Feature",
        "properties": { "length": 282.6 },
        "geometry": {
            "type": "LineString",
            "coordinates": [[4.0, 51.9], [6.5, 53.8], [9.9, 53.5]]
        }
    }"#;

    #[tokio::test]
    async fn fetched_route_is_stored_and_then_served_from_memory() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/route")
                    .query_param("origin", "4,51.9")
                    .query_param("destination", "9.9,53.5")
                    .query_param("units", "nm");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(ROUTE_BODY);
            })
            .await;

        let client = SearouteClient::with_base_url(&server.url("/")).unwrap();
        let (origin, destination) = (LonLat::new(4.0, 51.9), LonLat::new(9.9, 53.5));

        let first = client
            .get_route(origin, destination, DistanceUnits::NauticalMiles)
            .await
            .unwrap();
        assert_eq!(first.status, CacheStatus::Fresh);
        assert_eq!(first.data.length, 282.6);
        assert_eq!(first.data.units, DistanceUnits::NauticalMiles);
        assert_eq!(first.data.coordinates.len(), 3);

        let second = client
            .get_route(origin, destination, DistanceUnits::NauticalMiles)
            .await
            .unwrap();
        assert_eq!(second.status, CacheStatus::Cached);
        assert_eq!(second.data, first.data);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn oracle_distance_asks_the_service_in_miles() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/route").query_param("units", "mi");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(ROUTE_BODY);
            })
            .await;

        let client = SearouteClient::with_base_url(&server.url("/")).unwrap();
        let miles = client
            .distance(
                LonLat::new(4.0, 51.9),
                LonLat::new(9.9, 53.5),
                DistanceUnits::Miles,
            )
            .await
            .unwrap();
        assert_eq!(miles, 282.6);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_reported_as_http_error() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/route");
                then.status(503).body("upstream unavailable");
            })
            .await;

        let client = SearouteClient::with_base_url(&server.url("/")).unwrap();
        let result = client
            .get_route(
                LonLat::new(4.0, 51.9),
                LonLat::new(9.9, 53.5),
                DistanceUnits::Miles,
            )
            .await;
        assert!(matches!(result, Err(OracleError::Http(_))), "{result:?}");
        mock.assert_async().await;
    }
}
