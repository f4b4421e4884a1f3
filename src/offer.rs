use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Data structures for flight-offer search results.
//
// Every level keeps the fields it does not model in `extra`, so an offer
// serializes back with the full detail the search API returned. All modeled
// fields default when absent; structural problems are reported by the ranker
// instead of failing the whole payload.

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlightOffer {
    pub price: OfferPrice,
    pub itineraries: Vec<Itinerary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfferPrice {
    pub total: String,
    pub currency: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Itinerary {
    pub duration: String,
    pub segments: Vec<Segment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Segment {
    pub carrier_code: String,
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SegmentEndpoint {
    pub iata_code: String,
    pub at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FlightOffer {
    // Convenience constructor, mostly used by tests and benchmarks
    pub fn new(total: &str, currency: &str, itineraries: Vec<Itinerary>) -> Self {
        Self {
            price: OfferPrice {
                total: total.to_string(),
                currency: currency.to_string(),
                extra: Map::new(),
            },
            itineraries,
            extra: Map::new(),
        }
    }

    pub fn first_itinerary(&self) -> Option<&Itinerary> {
        self.itineraries.first()
    }
}

impl Itinerary {
    pub fn new(duration: &str, segments: Vec<Segment>) -> Self {
        Self {
            duration: duration.to_string(),
            segments,
            extra: Map::new(),
        }
    }
}

impl Segment {
    pub fn new(carrier_code: &str, departure_at: &str, arrival_at: &str) -> Self {
        Self {
            carrier_code: carrier_code.to_string(),
            departure: SegmentEndpoint {
                at: departure_at.to_string(),
                ..Default::default()
            },
            arrival: SegmentEndpoint {
                at: arrival_at.to_string(),
                ..Default::default()
            },
            extra: Map::new(),
        }
    }
}
