use crate::api::facility_dto::FacilityDto;
use crate::domain::facility::{Facility, facilities_from_dto};
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Loads and validates the sites table at `file_path`.
pub fn load_facilities(file_path: &str) -> Result<Vec<Facility>> {
    let dtos: Vec<FacilityDto> = parse_json_file::<Vec<FacilityDto>>(file_path)?;
    log::info!("Parsed {} facility records from '{}'.", dtos.len(), file_path);

    let facilities = facilities_from_dto(dtos)?;
    log::debug!("Facility table validated.");

    Ok(facilities)
}
