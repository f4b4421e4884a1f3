// Main library file for the travel planner

pub mod agents;
pub mod config;
pub mod flight_search;
pub mod llm;
pub mod offer;
pub mod planner;
pub mod prompts;
pub mod ranker;
pub mod render;
pub mod trip;

// Re-export key types for convenience
pub use agents::{AgentReply, AgentRole, TravelAgent};
pub use config::{AmadeusConfig, AppConfig, GeminiConfig, RetryConfig};
pub use flight_search::{
    fetch_offers, AmadeusClient, ApiError, ClientError, FlightAvailability, FlightSearch,
    FlightSearchQuery, TravelClass,
};
pub use llm::{GeminiClient, GenerationRequest, LlmError, TextGenerator};
pub use offer::{FlightOffer, Itinerary, OfferPrice, Segment, SegmentEndpoint};
pub use planner::{PlanError, PlanStage, TripPlan, TripPlanner};
pub use ranker::{
    FlightOfferRanker, OfferDefect, RankedFlight, RankedFlights, RankingError, SkippedOffer,
};
pub use trip::{Budget, HotelRating, TravelTheme, TripError, TripRequest};
