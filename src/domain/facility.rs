use chrono::{NaiveTime, Weekday};

use crate::api::facility_dto::{DayHoursDto, FacilityDto, HoursOfOperationDto};
use crate::domain::hours_of_operation::{DayHours, OpeningHours};
use crate::domain::id::FacilityId;
use crate::error::{Error, Result};

/// A testing site as loaded from the sites table. Never mutated by the slot engine.
#[derive(Debug, Clone)]
pub struct Facility {
    pub facility_id: FacilityId,
    pub facility_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub lat: f64,
    pub lng: f64,
    /// `None` means the table carries no hours for this site and the default week applies.
    pub hours_of_operation: Option<OpeningHours>,
}

impl Facility {
    pub fn new(facility_id: impl Into<String>, lat: f64, lng: f64, hours_of_operation: Option<OpeningHours>) -> Self {
        Facility {
            facility_id: FacilityId::new(facility_id),
            facility_name: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            lat,
            lng,
            hours_of_operation,
        }
    }

    /// Validates a raw table row. `index` is the row's position, used when the id is missing.
    pub fn from_dto(dto: FacilityDto, index: usize) -> Result<Self> {
        let facility_id = match dto.facility_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(Error::MissingIdentifier { index }),
        };

        let hours_of_operation = match dto.hours_of_operation {
            Some(hours) => Some(opening_hours_from_dto(&facility_id, hours)?),
            None => None,
        };

        Ok(Facility {
            facility_id: FacilityId::new(facility_id),
            facility_name: dto.facility_name,
            address: dto.address,
            city: dto.city,
            state: dto.state,
            zip: dto.zip,
            lat: dto.lat,
            lng: dto.lng,
            hours_of_operation,
        })
    }
}

/// Converts every row of a sites table, failing on the first invalid record.
pub fn facilities_from_dto(dtos: Vec<FacilityDto>) -> Result<Vec<Facility>> {
    dtos.into_iter().enumerate().map(|(index, dto)| Facility::from_dto(dto, index)).collect()
}

fn opening_hours_from_dto(facility_id: &str, dto: HoursOfOperationDto) -> Result<OpeningHours> {
    let days = [
        (Weekday::Sun, dto.sun),
        (Weekday::Mon, dto.mon),
        (Weekday::Tue, dto.tue),
        (Weekday::Wed, dto.wed),
        (Weekday::Thu, dto.thu),
        (Weekday::Fri, dto.fri),
        (Weekday::Sat, dto.sat),
    ];

    let mut opening_hours = OpeningHours::new();
    for (day, day_dto) in days {
        if let Some(day_dto) = day_dto {
            opening_hours.insert(day, day_hours_from_dto(facility_id, day, day_dto)?);
        }
    }

    Ok(opening_hours)
}

fn day_hours_from_dto(facility_id: &str, day: Weekday, dto: DayHoursDto) -> Result<DayHours> {
    Ok(DayHours {
        start: parse_optional_time(facility_id, day, dto.start)?,
        end: parse_optional_time(facility_id, day, dto.end)?,
    })
}

/// Blank strings count as absent, like a missing key.
fn parse_optional_time(facility_id: &str, day: Weekday, value: Option<String>) -> Result<Option<NaiveTime>> {
    let value = match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Ok(None),
    };

    parse_time_of_day(value.trim()).map(Some).ok_or_else(|| Error::InvalidHoursData {
        facility_id: facility_id.to_string(),
        day,
        value,
    })
}

/// Accepts `HH:MM:SS` and `HH:MM`.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(value, "%H:%M")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parser::parse_json_str;

    fn dto(json: &str) -> FacilityDto {
        parse_json_str(json).expect("fixture must parse")
    }

    #[test]
    fn parses_hours_and_treats_blank_as_absent() {
        let facility = Facility::from_dto(
            dto(r#"{
                "facility_id": "abc",
                "lat": 38.9, "lng": -77.0,
                "hours_of_operation": {
                    "mon": {"start": "09:30:00", "end": "17:00:00"},
                    "tue": {"start": "", "end": null},
                    "wed": {}
                }
            }"#),
            0,
        )
        .unwrap();

        let hours = facility.hours_of_operation.unwrap();
        let mon = hours.day(Weekday::Mon).unwrap();
        assert_eq!(mon.start, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(mon.end, NaiveTime::from_hms_opt(17, 0, 0));
        assert_eq!(hours.day(Weekday::Tue), Some(&DayHours::default()));
        assert_eq!(hours.day(Weekday::Wed), Some(&DayHours::default()));
        assert_eq!(hours.day(Weekday::Thu), None);
    }

    #[test]
    fn rejects_unparseable_time() {
        let result = Facility::from_dto(
            dto(r#"{"facility_id": "abc", "lat": 0.0, "lng": 0.0,
                    "hours_of_operation": {"fri": {"start": "nine", "end": "17:00:00"}}}"#),
            3,
        );

        match result {
            Err(Error::InvalidHoursData { facility_id, day, value }) => {
                assert_eq!(facility_id, "abc");
                assert_eq!(day, Weekday::Fri);
                assert_eq!(value, "nine");
            }
            other => panic!("expected InvalidHoursData, got {:?}", other),
        }
    }

    #[test]
    fn rejects_missing_or_blank_id() {
        let missing = Facility::from_dto(dto(r#"{"lat": 0.0, "lng": 0.0}"#), 7);
        assert!(matches!(missing, Err(Error::MissingIdentifier { index: 7 })));

        let blank = Facility::from_dto(dto(r#"{"facility_id": "  ", "lat": 0.0, "lng": 0.0}"#), 2);
        assert!(matches!(blank, Err(Error::MissingIdentifier { index: 2 })));
    }

    #[test]
    fn accepts_minutes_only_times() {
        assert_eq!(parse_time_of_day("08:15"), NaiveTime::from_hms_opt(8, 15, 0));
        assert_eq!(parse_time_of_day("25:00:00"), None);
    }
}
