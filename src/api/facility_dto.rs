use serde::Deserialize;

/// One row of the precomputed sites table.
#[derive(Debug, Clone, Deserialize)]
pub struct FacilityDto {
    #[serde(default)]
    pub facility_id: Option<String>,
    #[serde(default)]
    pub facility_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub hours_of_operation: Option<HoursOfOperationDto>,
}

/// Weekly hours keyed by three-letter weekday abbreviations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HoursOfOperationDto {
    #[serde(default)]
    pub sun: Option<DayHoursDto>,
    #[serde(default)]
    pub mon: Option<DayHoursDto>,
    #[serde(default)]
    pub tue: Option<DayHoursDto>,
    #[serde(default)]
    pub wed: Option<DayHoursDto>,
    #[serde(default)]
    pub thu: Option<DayHoursDto>,
    #[serde(default)]
    pub fri: Option<DayHoursDto>,
    #[serde(default)]
    pub sat: Option<DayHoursDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayHoursDto {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}
