//! Trip-planning pipeline.
//!
//! Runs the flight search and the three agents one after another, each step
//! awaited before the next starts, and gathers everything into a [`TripPlan`].

use crate::agents::{AgentRole, TravelAgent};
use crate::config::AppConfig;
use crate::flight_search::{fetch_offers, FlightSearch};
use crate::llm::{LlmError, TextGenerator};
use crate::prompts;
use crate::ranker::{FlightOfferRanker, RankedFlights, RankingError};
use crate::trip::TripRequest;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("{role} agent failed: {source}")]
    Agent {
        role: AgentRole,
        #[source]
        source: LlmError,
    },

    #[error(transparent)]
    Ranking(#[from] RankingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStage {
    FetchingFlights,
    Researching,
    FindingStays,
    BuildingItinerary,
}

impl PlanStage {
    pub fn message(&self) -> &'static str {
        match self {
            PlanStage::FetchingFlights => "✈️ Fetching best flight options...",
            PlanStage::Researching => "🔍 Researching best attractions & activities...",
            PlanStage::FindingStays => "🏨 Searching for hotels & restaurants...",
            PlanStage::BuildingItinerary => "🗺️ Creating your personalized itinerary...",
        }
    }
}

pub type ProgressObserver = Box<dyn Fn(PlanStage) + Send + Sync>;

#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub request: TripRequest,
    #[serde(serialize_with = "serialize_flights")]
    pub flights: RankedFlights,
    pub flight_notice: Option<String>,
    pub research: String,
    pub stays: String,
    pub itinerary: String,
}

fn serialize_flights<S: serde::Serializer>(
    flights: &RankedFlights,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serde::Serialize::serialize(&flights.flights, serializer)
}

pub struct TripPlanner {
    search: Arc<dyn FlightSearch>,
    ranker: FlightOfferRanker,
    researcher: TravelAgent,
    stay_finder: TravelAgent,
    itinerary_planner: TravelAgent,
    currency: String,
    max_results: u32,
    progress: Option<ProgressObserver>,
}

impl TripPlanner {
    pub fn new(
        config: &AppConfig,
        search: Arc<dyn FlightSearch>,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self, PlanError> {
        let agent = |role| {
            TravelAgent::new(
                role,
                config.gemini.model.clone(),
                config.gemini.temperature,
                generator.clone(),
            )
        };

        Ok(Self {
            search,
            ranker: FlightOfferRanker::with_limit(config.rank_limit)?,
            researcher: agent(AgentRole::Researcher),
            stay_finder: agent(AgentRole::HotelRestaurantFinder),
            itinerary_planner: agent(AgentRole::Planner),
            currency: config.currency.clone(),
            max_results: config.max_results,
            progress: None,
        })
    }

    pub fn with_progress(mut self, observer: ProgressObserver) -> Self {
        self.progress = Some(observer);
        self
    }

    fn announce(&self, stage: PlanStage) {
        info!(?stage, "{}", stage.message());
        if let Some(observer) = &self.progress {
            observer(stage);
        }
    }

    pub async fn plan(&self, trip: &TripRequest) -> Result<TripPlan, PlanError> {
        self.announce(PlanStage::FetchingFlights);
        let query = trip.flight_query(&self.currency, self.max_results);
        let availability = fetch_offers(self.search.as_ref(), &query).await;
        let flight_notice = availability.unavailable_reason().map(str::to_string);
        let flights = self.ranker.rank_cheapest(&availability.into_offers());
        if !flights.skipped.is_empty() {
            warn!(skipped = flights.skipped.len(), "Some flight offers were malformed");
        }

        self.announce(PlanStage::Researching);
        let research = run_agent(&self.researcher, &prompts::research_prompt(trip)).await?;

        self.announce(PlanStage::FindingStays);
        let stays = run_agent(&self.stay_finder, &prompts::hotel_restaurant_prompt(trip)).await?;

        self.announce(PlanStage::BuildingItinerary);
        let planning_prompt = prompts::planning_prompt(trip, &research, &flights, &stays);
        let itinerary = run_agent(&self.itinerary_planner, &planning_prompt).await?;

        info!(flights = flights.flights.len(), "Travel plan generated");
        Ok(TripPlan {
            request: trip.clone(),
            flights,
            flight_notice,
            research,
            stays,
            itinerary,
        })
    }
}

async fn run_agent(agent: &TravelAgent, prompt: &str) -> Result<String, PlanError> {
    agent
        .run(prompt)
        .await
        .map(|reply| reply.content)
        .map_err(|source| PlanError::Agent {
            role: agent.role(),
            source,
        })
}
