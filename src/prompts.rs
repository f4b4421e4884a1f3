// Prompt construction for the three agent roles
use crate::ranker::RankedFlights;
use crate::trip::TripRequest;

pub fn research_prompt(trip: &TripRequest) -> String {
    format!(
        "Research the best attractions and activities in {} for a {}-day {} trip. \
         The traveler enjoys: {}. Budget: {}. Flight Class: {}. \
         Hotel Rating: {}. Visa Requirement: {}. Travel Insurance: {}.",
        trip.destination,
        trip.num_days,
        trip.theme_phrase(),
        trip.activities,
        trip.budget,
        trip.flight_class,
        trip.hotel_rating,
        trip.visa_required,
        trip.travel_insurance,
    )
}

pub fn hotel_restaurant_prompt(trip: &TripRequest) -> String {
    format!(
        "Find the best hotels and restaurants near popular attractions in {} for a {} trip. \
         Budget: {}. Hotel Rating: {}. Preferred activities: {}.",
        trip.destination,
        trip.theme_phrase(),
        trip.budget,
        trip.hotel_rating,
        trip.activities,
    )
}

pub fn planning_prompt(
    trip: &TripRequest,
    research: &str,
    flights: &RankedFlights,
    stays: &str,
) -> String {
    format!(
        "Based on the following data, create a {}-day itinerary for a {} trip to {}. \
         The traveler enjoys: {}. Budget: {}. Flight Class: {}. Hotel Rating: {}. \
         Visa Requirement: {}. Travel Insurance: {}. Research: {}. \
         Flights: {}. Hotels & Restaurants: {}.",
        trip.num_days,
        trip.theme_phrase(),
        trip.destination,
        trip.activities,
        trip.budget,
        trip.flight_class,
        trip.hotel_rating,
        trip.visa_required,
        trip.travel_insurance,
        research,
        flights.to_json(),
        stays,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight_search::TravelClass;
    use crate::offer::{FlightOffer, Itinerary, Segment};
    use crate::ranker::FlightOfferRanker;
    use crate::trip::{Budget, HotelRating, TravelTheme};
    use chrono::NaiveDate;

    fn trip() -> TripRequest {
        let mut trip = TripRequest::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
        );
        trip.destination = "GOI".to_string();
        trip.num_days = 3;
        trip.theme = TravelTheme::FamilyVacation;
        trip.activities = "Beaches".to_string();
        trip.budget = Budget::Luxury;
        trip.flight_class = TravelClass::Business;
        trip.hotel_rating = HotelRating::FiveStar;
        trip.visa_required = true;
        trip
    }

    #[test]
    fn test_research_prompt() {
        assert_eq!(
            research_prompt(&trip()),
            "Research the best attractions and activities in GOI for a 3-day 👨‍👩‍👧‍👦 family vacation trip. \
             The traveler enjoys: Beaches. Budget: Luxury. Flight Class: BUSINESS. \
             Hotel Rating: 5⭐. Visa Requirement: true. Travel Insurance: false."
        );
    }

    #[test]
    fn test_hotel_restaurant_prompt() {
        assert_eq!(
            hotel_restaurant_prompt(&trip()),
            "Find the best hotels and restaurants near popular attractions in GOI for a 👨‍👩‍👧‍👦 family vacation trip. \
             Budget: Luxury. Hotel Rating: 5⭐. Preferred activities: Beaches."
        );
    }

    #[test]
    fn test_planning_prompt_embeds_everything() {
        let offers = vec![FlightOffer::new(
            "4523.00",
            "INR",
            vec![Itinerary::new(
                "PT2H10M",
                vec![Segment::new("AI", "2025-06-01T06:00:00", "2025-06-01T08:10:00")],
            )],
        )];
        let flights = FlightOfferRanker::new().rank_cheapest(&offers);

        let prompt = planning_prompt(&trip(), "Warm weather.", &flights, "Taj Exotica.");

        assert!(prompt.starts_with("Based on the following data, create a 3-day itinerary"));
        assert!(prompt.contains("Research: Warm weather."));
        assert!(prompt.contains("Hotels & Restaurants: Taj Exotica."));
        assert!(prompt.contains(r#""carrier_code":"AI""#));
        assert!(prompt.contains(r#""price":"4523.00 INR""#));
    }

    #[test]
    fn test_planning_prompt_without_flights() {
        let prompt = planning_prompt(&trip(), "r", &RankedFlights::default(), "s");
        assert!(prompt.contains("Flights: []."));
    }
}
