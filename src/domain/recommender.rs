use chrono::NaiveDateTime;

use crate::domain::clock::SharedClock;
use crate::domain::facility::Facility;
use crate::domain::search::{LatLng, SearchOptions, SearchResult, search_facilities};
use crate::domain::seed_store::{SeedStore, generate_user_seed, get_or_create_user_seed};
use crate::domain::seeded_rng::unit_draw;
use crate::domain::slots::{Slot, all_slot_options};
use crate::error::Result;

/// Seed string for a user/facility pair.
pub fn facility_seed(user_seed: &str, facility: &Facility) -> String {
    format!("{}:{}", user_seed, facility.facility_id)
}

/// Picks one candidate slot for `facility`, reproducibly for a given user seed.
///
/// Returns `Ok(None)` when the facility has no candidate slots.
pub fn recommend_visit_time(facility: &Facility, now: NaiveDateTime, user_seed: &str) -> Result<Option<Slot>> {
    let random_value = unit_draw(&facility_seed(user_seed, facility));

    let all_slots = all_slot_options(facility, now)?;
    if all_slots.is_empty() {
        log::debug!("No slot options for facility {}", facility.facility_id);
        return Ok(None);
    }

    let random_index = ((random_value * all_slots.len() as f64).floor() as usize).min(all_slots.len() - 1);

    Ok(Some(all_slots[random_index]))
}

/// Recommends visit times using a persisted user seed and an injectable clock.
#[derive(Debug)]
pub struct Recommender<S: SeedStore> {
    seed_store: S,
    clock: SharedClock,
}

impl<S: SeedStore> Recommender<S> {
    pub fn new(seed_store: S, clock: SharedClock) -> Self {
        Recommender { seed_store, clock }
    }

    pub fn seed_store(&self) -> &S {
        &self.seed_store
    }

    /// The persisted user seed, created on first call.
    ///
    /// If the store cannot be written, a throwaway seed is used for this call so that
    /// recommendations still appear, though they will differ on the next run.
    pub fn user_seed(&self) -> String {
        get_or_create_user_seed(&self.seed_store).unwrap_or_else(|e| {
            log::warn!("Using a temporary user seed: {}", e);
            generate_user_seed()
        })
    }

    pub fn recommend(&self, facility: &Facility) -> Result<Option<Slot>> {
        recommend_visit_time(facility, self.clock.now(), &self.user_seed())
    }

    /// Nearest facilities to `origin` with visit times for the current user and time.
    pub fn search(&self, facilities: &[Facility], origin: LatLng, options: SearchOptions) -> Vec<SearchResult> {
        search_facilities(facilities, origin, self.clock.now(), &self.user_seed(), options)
    }
}
