use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::facility::Facility;
use crate::domain::hours_of_operation::{DaySchedule, weekly_schedule};
use crate::domain::id::FacilityId;
use crate::domain::recommender::recommend_visit_time;
use crate::domain::slots::Slot;

const EARTH_RADIUS_METERS: f64 = 6_378_137.0;
const METERS_TO_MILES: f64 = 1609.0;

pub const DEFAULT_MAX_RESULTS: usize = 20;
pub const DEFAULT_MAX_DISTANCE_MILES: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub max_results: usize,
    pub max_distance_miles: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions { max_results: DEFAULT_MAX_RESULTS, max_distance_miles: DEFAULT_MAX_DISTANCE_MILES }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub facility_id: FacilityId,
    pub facility_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub distance: f64,
    pub hours: Vec<DaySchedule>,
    pub recommended_visit_time: Option<Slot>,
}

/// Great-circle distance between two points in miles.
pub fn distance_miles(from: LatLng, to: LatLng) -> f64 {
    let (lat1, lat2) = (from.lat.to_radians(), to.lat.to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let meters = 2.0 * EARTH_RADIUS_METERS * a.sqrt().atan2((1.0 - a).sqrt());

    meters / METERS_TO_MILES
}

/// Nearest facilities to `origin`, each with its recommended visit time.
///
/// A facility whose recommendation fails is still listed, without a visit time.
pub fn search_facilities(
    facilities: &[Facility],
    origin: LatLng,
    now: NaiveDateTime,
    user_seed: &str,
    options: SearchOptions,
) -> Vec<SearchResult> {
    let mut nearby: Vec<(&Facility, f64)> = facilities
        .iter()
        .map(|facility| (facility, distance_miles(origin, LatLng::new(facility.lat, facility.lng))))
        .filter(|(_, distance)| *distance < options.max_distance_miles)
        .collect();

    nearby.sort_by(|a, b| a.1.total_cmp(&b.1));
    nearby.truncate(options.max_results);

    log::info!("{} of {} facilities within {} miles", nearby.len(), facilities.len(), options.max_distance_miles);

    nearby
        .into_iter()
        .map(|(facility, distance)| {
            let recommended_visit_time = recommend_visit_time(facility, now, user_seed).unwrap_or_else(|e| {
                log::warn!("No recommended visit time for facility {}: {}", facility.facility_id, e);
                None
            });

            SearchResult {
                facility_id: facility.facility_id.clone(),
                facility_name: facility.facility_name.clone(),
                address: facility.address.clone(),
                city: facility.city.clone(),
                state: facility.state.clone(),
                zip: facility.zip.clone(),
                distance,
                hours: weekly_schedule(facility),
                recommended_visit_time,
            }
        })
        .collect()
}
