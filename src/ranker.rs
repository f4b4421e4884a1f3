// Cheapest-flight extraction and normalization
use crate::offer::FlightOffer;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_RANK_LIMIT: usize = 3;

// Reasons a single offer is left out of the ranking
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OfferDefect {
    #[error("offer has no itineraries")]
    NoItineraries,

    #[error("first itinerary has no segments")]
    NoSegments,

    #[error("unparseable price: {0:?}")]
    UnparseablePrice(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    #[error("Invalid limit: {0} (must be at least 1)")]
    InvalidLimit(usize),
}

// Display-ready view of one of the cheapest offers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFlight {
    pub carrier_code: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: String,
    #[serde(skip)]
    pub amount: f64,
    pub offer: FlightOffer,
}

// An offer that was excluded, identified by its position in the input
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedOffer {
    pub index: usize,
    pub defect: OfferDefect,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedFlights {
    pub flights: Vec<RankedFlight>,
    pub skipped: Vec<SkippedOffer>,
}

impl RankedFlights {
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    // Serialized form embedded into the itinerary prompt
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.flights).unwrap_or_else(|_| "[]".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct FlightOfferRanker {
    limit: usize,
}

impl Default for FlightOfferRanker {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RANK_LIMIT,
        }
    }
}

impl FlightOfferRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Result<Self, RankingError> {
        if limit == 0 {
            return Err(RankingError::InvalidLimit(limit));
        }
        Ok(Self { limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Selects the `limit` cheapest well-formed offers, ascending by price.
    ///
    /// Offers with equal prices keep their input order. Malformed offers are
    /// reported in [`RankedFlights::skipped`] and never abort the batch.
    pub fn rank_cheapest(&self, offers: &[FlightOffer]) -> RankedFlights {
        let mut skipped = Vec::new();
        let mut candidates = Vec::with_capacity(offers.len());

        for (index, offer) in offers.iter().enumerate() {
            match rank_view(offer) {
                Ok(flight) => candidates.push(flight),
                Err(defect) => {
                    warn!(index, %defect, "Skipping malformed flight offer");
                    skipped.push(SkippedOffer { index, defect });
                }
            }
        }

        // Vec::sort_by is stable, so equal prices stay in input order
        candidates.sort_by(|a, b| a.amount.total_cmp(&b.amount));
        candidates.truncate(self.limit);

        debug!(
            received = offers.len(),
            ranked = candidates.len(),
            skipped = skipped.len(),
            "Ranked flight offers"
        );

        RankedFlights {
            flights: candidates,
            skipped,
        }
    }
}

// Builds the display view of an offer, or says why it cannot be ranked
fn rank_view(offer: &FlightOffer) -> Result<RankedFlight, OfferDefect> {
    let amount = parse_amount(&offer.price.total)?;

    let itinerary = offer.first_itinerary().ok_or(OfferDefect::NoItineraries)?;
    let (first, last) = match (itinerary.segments.first(), itinerary.segments.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(OfferDefect::NoSegments),
    };

    Ok(RankedFlight {
        carrier_code: first.carrier_code.clone(),
        departure_time: first.departure.at.clone(),
        // Arrival after all connections, not the first leg's
        arrival_time: last.arrival.at.clone(),
        duration: normalize_duration(&itinerary.duration),
        price: format!("{} {}", offer.price.total, offer.price.currency),
        amount,
        offer: offer.clone(),
    })
}

pub fn parse_amount(total: &str) -> Result<f64, OfferDefect> {
    match total.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(OfferDefect::UnparseablePrice(total.to_string())),
    }
}

// "PT5H30M" -> "5h30m"; durations with a day part only lose the "P"
pub fn normalize_duration(duration: &str) -> String {
    let trimmed = duration.trim();
    let stripped = trimmed
        .strip_prefix("PT")
        .or_else(|| trimmed.strip_prefix('P'))
        .unwrap_or(trimmed);
    stripped.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::{Itinerary, Segment};
    use test_case::test_case;

    fn offer(total: &str, carrier: &str) -> FlightOffer {
        FlightOffer::new(
            total,
            "INR",
            vec![Itinerary::new(
                "PT2H10M",
                vec![Segment::new(
                    carrier,
                    "2025-06-01T06:00:00",
                    "2025-06-01T08:10:00",
                )],
            )],
        )
    }

    fn amounts(ranked: &RankedFlights) -> Vec<f64> {
        ranked.flights.iter().map(|f| f.amount).collect()
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let ranked = FlightOfferRanker::new().rank_cheapest(&[]);
        assert!(ranked.is_empty());
        assert!(ranked.skipped.is_empty());
    }

    #[test]
    fn test_cheapest_three_with_stable_ties() {
        let offers = vec![
            offer("300", "AA"),
            offer("150", "BB"),
            offer("150", "CC"),
            offer("500", "DD"),
            offer("99", "EE"),
        ];

        let ranked = FlightOfferRanker::new().rank_cheapest(&offers);

        assert_eq!(amounts(&ranked), vec![99.0, 150.0, 150.0]);
        let carriers: Vec<&str> = ranked
            .flights
            .iter()
            .map(|f| f.carrier_code.as_str())
            .collect();
        assert_eq!(carriers, vec!["EE", "BB", "CC"]);
    }

    #[test_case(1, 1; "limit one")]
    #[test_case(3, 3; "default limit")]
    #[test_case(4, 4; "limit equals input")]
    #[test_case(10, 4; "limit above input")]
    fn test_output_length(limit: usize, expected: usize) {
        let offers = vec![
            offer("10", "AA"),
            offer("40", "BB"),
            offer("20", "CC"),
            offer("30", "DD"),
        ];

        let ranked = FlightOfferRanker::with_limit(limit)
            .unwrap()
            .rank_cheapest(&offers);

        assert_eq!(ranked.flights.len(), expected);
        assert!(ranked
            .flights
            .windows(2)
            .all(|pair| pair[0].amount <= pair[1].amount));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert_eq!(
            FlightOfferRanker::with_limit(0).unwrap_err(),
            RankingError::InvalidLimit(0)
        );
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let offers = vec![
            offer("812.50", "AA"),
            offer("99.99", "BB"),
            offer("412", "CC"),
            offer("99.99", "DD"),
            offer("1500", "EE"),
        ];
        let ranker = FlightOfferRanker::new();

        let first = ranker.rank_cheapest(&offers);
        let retained: Vec<FlightOffer> = first.flights.iter().map(|f| f.offer.clone()).collect();
        let second = ranker.rank_cheapest(&retained);

        assert_eq!(first, second);
    }

    #[test]
    fn test_offer_without_itineraries_is_skipped() {
        let offers = vec![
            offer("200", "AA"),
            FlightOffer::new("50", "INR", vec![]),
            offer("100", "BB"),
        ];

        let ranked = FlightOfferRanker::new().rank_cheapest(&offers);

        assert_eq!(amounts(&ranked), vec![100.0, 200.0]);
        assert_eq!(
            ranked.skipped,
            vec![SkippedOffer {
                index: 1,
                defect: OfferDefect::NoItineraries,
            }]
        );
    }

    #[test]
    fn test_offer_without_segments_is_skipped() {
        let offers = vec![FlightOffer::new(
            "50",
            "INR",
            vec![Itinerary::new("PT1H", vec![])],
        )];

        let ranked = FlightOfferRanker::new().rank_cheapest(&offers);

        assert!(ranked.is_empty());
        assert_eq!(ranked.skipped[0].defect, OfferDefect::NoSegments);
    }

    #[test]
    fn test_unparseable_price_is_skipped() {
        let offers = vec![offer("abc", "AA"), offer("120.00", "BB"), offer("NaN", "CC")];

        let ranked = FlightOfferRanker::new().rank_cheapest(&offers);

        assert_eq!(amounts(&ranked), vec![120.0]);
        assert_eq!(ranked.skipped.len(), 2);
        assert_eq!(
            ranked.skipped[0].defect,
            OfferDefect::UnparseablePrice("abc".to_string())
        );
        assert_eq!(ranked.skipped[1].index, 2);
    }

    #[test]
    fn test_arrival_comes_from_last_segment() {
        let connecting = FlightOffer::new(
            "452.30",
            "INR",
            vec![Itinerary::new(
                "PT5H30M",
                vec![
                    Segment::new("6E", "2025-06-01T06:00:00", "2025-06-01T08:00:00"),
                    Segment::new("AI", "2025-06-01T09:15:00", "2025-06-01T11:30:00"),
                ],
            )],
        );

        let ranked = FlightOfferRanker::new().rank_cheapest(&[connecting]);
        let flight = &ranked.flights[0];

        assert_eq!(flight.carrier_code, "6E");
        assert_eq!(flight.departure_time, "2025-06-01T06:00:00");
        assert_eq!(flight.arrival_time, "2025-06-01T11:30:00");
        assert_eq!(flight.duration, "5h30m");
        assert_eq!(flight.price, "452.30 INR");
    }

    #[test]
    fn test_only_first_itinerary_is_used() {
        let round_trip = FlightOffer::new(
            "900",
            "INR",
            vec![
                Itinerary::new(
                    "PT2H",
                    vec![Segment::new("AI", "2025-06-01T06:00:00", "2025-06-01T08:00:00")],
                ),
                Itinerary::new(
                    "PT2H5M",
                    vec![Segment::new("UK", "2025-06-06T18:00:00", "2025-06-06T20:05:00")],
                ),
            ],
        );

        let ranked = FlightOfferRanker::new().rank_cheapest(&[round_trip]);

        assert_eq!(ranked.flights[0].carrier_code, "AI");
        assert_eq!(ranked.flights[0].arrival_time, "2025-06-01T08:00:00");
        assert_eq!(ranked.flights[0].duration, "2h");
    }

    #[test_case("PT5H30M", "5h30m")]
    #[test_case("PT45M", "45m")]
    #[test_case("P1DT2H", "1dt2h")]
    #[test_case("5H", "5h")]
    fn test_normalize_duration(input: &str, expected: &str) {
        assert_eq!(normalize_duration(input), expected);
    }

    #[test_case("452.30", 452.30)]
    #[test_case(" 99 ", 99.0)]
    #[test_case("1e3", 1000.0)]
    fn test_parse_amount(input: &str, expected: f64) {
        assert_eq!(parse_amount(input).unwrap(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("12,50"; "comma decimal")]
    #[test_case("inf"; "infinite")]
    fn test_parse_amount_rejects(input: &str) {
        assert!(parse_amount(input).is_err());
    }

    #[test]
    fn test_json_keeps_display_fields_and_offer() {
        let ranked = FlightOfferRanker::new().rank_cheapest(&[offer("4523.00", "AI")]);
        let json: serde_json::Value = serde_json::from_str(&ranked.to_json()).unwrap();

        assert_eq!(json[0]["carrier_code"], "AI");
        assert_eq!(json[0]["price"], "4523.00 INR");
        assert_eq!(json[0]["offer"]["price"]["total"], "4523.00");
        assert!(json[0].get("amount").is_none());
    }
}
