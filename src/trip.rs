// Trip parameters collected from the traveler
use crate::flight_search::{FlightSearchQuery, TravelClass};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub const MIN_TRIP_DAYS: u32 = 1;
pub const MAX_TRIP_DAYS: u32 = 14;

#[derive(Error, Debug, PartialEq)]
pub enum TripError {
    #[error("Invalid IATA code: {0:?} (expected three letters)")]
    InvalidIataCode(String),

    #[error("Trip duration must be between 1 and 14 days, got {0}")]
    InvalidDuration(u32),

    #[error("Return date {return_date} is before departure date {departure_date}")]
    ReturnBeforeDeparture {
        departure_date: NaiveDate,
        return_date: NaiveDate,
    },

    #[error("At least one adult passenger is required")]
    NoTravelers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TravelTheme {
    #[default]
    CoupleGetaway,
    FamilyVacation,
    AdventureTrip,
    SoloExploration,
}

impl TravelTheme {
    pub fn label(&self) -> &'static str {
        match self {
            TravelTheme::CoupleGetaway => "💑 Couple Getaway",
            TravelTheme::FamilyVacation => "👨‍👩‍👧‍👦 Family Vacation",
            TravelTheme::AdventureTrip => "🏔️ Adventure Trip",
            TravelTheme::SoloExploration => "🧳 Solo Exploration",
        }
    }
}

impl fmt::Display for TravelTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Budget {
    #[default]
    Economy,
    Standard,
    Luxury,
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Budget::Economy => "Economy",
            Budget::Standard => "Standard",
            Budget::Luxury => "Luxury",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HotelRating {
    #[default]
    Any,
    ThreeStar,
    FourStar,
    FiveStar,
}

impl fmt::Display for HotelRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HotelRating::Any => "Any",
            HotelRating::ThreeStar => "3⭐",
            HotelRating::FourStar => "4⭐",
            HotelRating::FiveStar => "5⭐",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    pub num_days: u32,
    pub theme: TravelTheme,
    pub activities: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub budget: Budget,
    #[serde(serialize_with = "serialize_travel_class")]
    pub flight_class: TravelClass,
    pub hotel_rating: HotelRating,
    pub visa_required: bool,
    pub travel_insurance: bool,
    pub currency_rates: bool,
    pub adults: u32,
}

fn serialize_travel_class<S: serde::Serializer>(
    class: &TravelClass,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(class.as_str())
}

impl TripRequest {
    // A trip with the usual defaults, departing and returning on the given dates
    pub fn new(departure_date: NaiveDate, return_date: NaiveDate) -> Self {
        Self {
            origin: "BOM".to_string(),
            destination: "DEL".to_string(),
            num_days: 5,
            theme: TravelTheme::default(),
            activities: "Relaxing on the beach, exploring historical sites".to_string(),
            departure_date,
            return_date,
            budget: Budget::default(),
            flight_class: TravelClass::default(),
            hotel_rating: HotelRating::default(),
            visa_required: false,
            travel_insurance: false,
            currency_rates: false,
            adults: 1,
        }
    }

    // Normalizes the airport codes to upper case and checks every field
    pub fn validate(mut self) -> Result<Self, TripError> {
        self.origin = normalize_iata(&self.origin)?;
        self.destination = normalize_iata(&self.destination)?;

        if !(MIN_TRIP_DAYS..=MAX_TRIP_DAYS).contains(&self.num_days) {
            return Err(TripError::InvalidDuration(self.num_days));
        }
        if self.return_date < self.departure_date {
            return Err(TripError::ReturnBeforeDeparture {
                departure_date: self.departure_date,
                return_date: self.return_date,
            });
        }
        if self.adults == 0 {
            return Err(TripError::NoTravelers);
        }

        Ok(self)
    }

    // Lowercased theme label, as it appears inside prompts
    pub fn theme_phrase(&self) -> String {
        self.theme.to_string().to_lowercase()
    }

    pub fn flight_query(&self, currency: &str, max_results: u32) -> FlightSearchQuery {
        FlightSearchQuery {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            departure_date: self.departure_date,
            return_date: Some(self.return_date),
            adults: self.adults,
            travel_class: self.flight_class,
            currency: currency.to_string(),
            max_results,
        }
    }
}

fn normalize_iata(code: &str) -> Result<String, TripError> {
    let code = code.trim().to_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(TripError::InvalidIataCode(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn request() -> TripRequest {
        TripRequest::new(date(6, 1), date(6, 6))
    }

    #[test]
    fn test_defaults_are_valid() {
        let trip = request().validate().unwrap();
        assert_eq!(trip.origin, "BOM");
        assert_eq!(trip.destination, "DEL");
        assert_eq!(trip.num_days, 5);
    }

    #[test]
    fn test_codes_are_uppercased() {
        let mut trip = request();
        trip.origin = " goi ".to_string();

        assert_eq!(trip.validate().unwrap().origin, "GOI");
    }

    #[test_case("DE"; "too short")]
    #[test_case("DELH"; "too long")]
    #[test_case("D3L"; "digit")]
    #[test_case(""; "empty")]
    fn test_invalid_codes(code: &str) {
        let mut trip = request();
        trip.destination = code.to_string();

        assert!(matches!(
            trip.validate(),
            Err(TripError::InvalidIataCode(_))
        ));
    }

    #[test_case(0, false)]
    #[test_case(1, true)]
    #[test_case(14, true)]
    #[test_case(15, false)]
    fn test_duration_bounds(days: u32, valid: bool) {
        let mut trip = request();
        trip.num_days = days;

        assert_eq!(trip.validate().is_ok(), valid);
    }

    #[test]
    fn test_return_before_departure() {
        let trip = TripRequest::new(date(6, 6), date(6, 1));

        assert_eq!(
            trip.validate().unwrap_err(),
            TripError::ReturnBeforeDeparture {
                departure_date: date(6, 6),
                return_date: date(6, 1),
            }
        );
    }

    #[test]
    fn test_same_day_return_is_allowed() {
        assert!(TripRequest::new(date(6, 1), date(6, 1)).validate().is_ok());
    }

    #[test]
    fn test_zero_adults() {
        let mut trip = request();
        trip.adults = 0;

        assert_eq!(trip.validate().unwrap_err(), TripError::NoTravelers);
    }

    #[test]
    fn test_theme_phrase() {
        let mut trip = request();
        trip.theme = TravelTheme::AdventureTrip;

        assert_eq!(trip.theme_phrase(), "🏔️ adventure trip");
    }

    #[test]
    fn test_flight_query() {
        let mut trip = request();
        trip.flight_class = TravelClass::First;
        trip.adults = 2;

        let query = trip.flight_query("INR", 10);
        assert_eq!(query.origin, "BOM");
        assert_eq!(query.return_date, Some(date(6, 6)));
        assert_eq!(query.travel_class, TravelClass::First);
        assert_eq!(query.adults, 2);
        assert_eq!(query.max_results, 10);
    }
}
