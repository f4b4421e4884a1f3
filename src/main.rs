//! # travel-planner
//!
//! Collects trip parameters from the command line, fetches the cheapest
//! flights, asks the research, hotel and itinerary agents for their part and
//! prints the combined plan.

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tracing::info;

use travel_planner::render::render_plan;
use travel_planner::{
    AmadeusClient, AppConfig, Budget, GeminiClient, HotelRating, PlanStage, TravelClass,
    TravelTheme, TripPlanner, TripRequest,
};

#[derive(Parser)]
#[command(name = "travel-planner")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plan a trip with flights, stays and a day-by-day itinerary")]
struct Cli {
    /// Departure city (IATA code)
    #[arg(long, default_value = "BOM")]
    from: String,

    /// Destination (IATA code)
    #[arg(long, default_value = "DEL")]
    to: String,

    /// Trip duration in days (1-14)
    #[arg(long, default_value_t = 5)]
    days: u32,

    /// Travel theme
    #[arg(long, value_enum, default_value_t = ThemeArg::Couple)]
    theme: ThemeArg,

    /// Activities you enjoy
    #[arg(
        long,
        default_value = "Relaxing on the beach, exploring historical sites"
    )]
    activities: String,

    /// Departure date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    depart: Option<NaiveDate>,

    /// Return date (YYYY-MM-DD), defaults to departure plus the trip duration
    #[arg(long = "return")]
    return_date: Option<NaiveDate>,

    /// Budget preference
    #[arg(long, value_enum, default_value_t = BudgetArg::Economy)]
    budget: BudgetArg,

    /// Flight class
    #[arg(long, value_enum, default_value_t = ClassArg::Economy)]
    class: ClassArg,

    /// Preferred hotel rating
    #[arg(long, value_enum, default_value_t = RatingArg::Any)]
    hotel_rating: RatingArg,

    /// Number of adult passengers
    #[arg(long, default_value_t = 1)]
    adults: u32,

    /// Check visa requirements
    #[arg(long)]
    visa: bool,

    /// Include travel insurance
    #[arg(long)]
    insurance: bool,

    /// Show currency exchange rates
    #[arg(long)]
    currency_rates: bool,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Couple,
    Family,
    Adventure,
    Solo,
}

#[derive(Clone, Copy, ValueEnum)]
enum BudgetArg {
    Economy,
    Standard,
    Luxury,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassArg {
    Economy,
    Business,
    First,
}

#[derive(Clone, Copy, ValueEnum)]
enum RatingArg {
    Any,
    #[value(name = "3")]
    Three,
    #[value(name = "4")]
    Four,
    #[value(name = "5")]
    Five,
}

impl Cli {
    fn trip_request(&self) -> TripRequest {
        let departure_date = self.depart.unwrap_or_else(|| Local::now().date_naive());
        let return_date = self.return_date.unwrap_or_else(|| {
            departure_date
                .checked_add_days(Days::new(u64::from(self.days)))
                .unwrap_or(departure_date)
        });

        TripRequest {
            origin: self.from.clone(),
            destination: self.to.clone(),
            num_days: self.days,
            theme: match self.theme {
                ThemeArg::Couple => TravelTheme::CoupleGetaway,
                ThemeArg::Family => TravelTheme::FamilyVacation,
                ThemeArg::Adventure => TravelTheme::AdventureTrip,
                ThemeArg::Solo => TravelTheme::SoloExploration,
            },
            activities: self.activities.clone(),
            departure_date,
            return_date,
            budget: match self.budget {
                BudgetArg::Economy => Budget::Economy,
                BudgetArg::Standard => Budget::Standard,
                BudgetArg::Luxury => Budget::Luxury,
            },
            flight_class: match self.class {
                ClassArg::Economy => TravelClass::Economy,
                ClassArg::Business => TravelClass::Business,
                ClassArg::First => TravelClass::First,
            },
            hotel_rating: match self.hotel_rating {
                RatingArg::Any => HotelRating::Any,
                RatingArg::Three => HotelRating::ThreeStar,
                RatingArg::Four => HotelRating::FourStar,
                RatingArg::Five => HotelRating::FiveStar,
            },
            visa_required: self.visa,
            travel_insurance: self.insurance,
            currency_rates: self.currency_rates,
            adults: self.adults,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let trip = cli.trip_request().validate().context("Invalid trip parameters")?;
    let config = AppConfig::load().context("Failed to load configuration")?;
    info!(origin = %trip.origin, destination = %trip.destination, "Planning trip");

    let search = AmadeusClient::new(config.amadeus.clone()).context("Failed to create flight search client")?;
    let generator = GeminiClient::new(config.gemini.clone()).context("Failed to create text generation client")?;

    let planner = TripPlanner::new(&config, Arc::new(search), Arc::new(generator))?
        .with_progress(Box::new(|stage: PlanStage| eprintln!("{}", stage.message())));

    let plan = planner.plan(&trip).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render_plan(&plan));
    }
    Ok(())
}
