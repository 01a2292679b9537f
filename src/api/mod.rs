pub mod facility_dto;
