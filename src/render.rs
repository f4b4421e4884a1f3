// Plain-text rendering of a trip plan for the terminal
use crate::planner::TripPlan;
use crate::ranker::{RankedFlight, RankedFlights};
use crate::trip::TripRequest;

const CARD_RULE: &str = "----------------------------------------";

// Packing checklist shown alongside every plan, with its default ticks
pub const PACKING_CHECKLIST: [(&str, bool); 5] = [
    ("👕 Clothes", true),
    ("🩴 Comfortable Footwear", true),
    ("🕶️ Sunglasses & Sunscreen", false),
    ("📖 Travel Guidebook", false),
    ("💊 Medications & First-Aid", true),
];

pub fn render_banner(trip: &TripRequest) -> String {
    format!(
        "🌟 Your {} to {} is about to begin! 🌟\n\
         Let's find the best flights, stays, and experiences for your unforgettable journey.\n",
        trip.theme, trip.destination
    )
}

pub fn render_flight_card(flight: &RankedFlight) -> String {
    format!(
        "{rule}\n\
         ✈️ {carrier}\n\
         Departure: {departure}\n\
         Arrival:   {arrival}\n\
         Duration:  {duration}\n\
         💰 {price}\n\
         Book via partner site\n\
         {rule}\n",
        rule = CARD_RULE,
        carrier = flight.carrier_code,
        departure = flight.departure_time,
        arrival = flight.arrival_time,
        duration = flight.duration,
        price = flight.price,
    )
}

pub fn render_flights(flights: &RankedFlights, notice: Option<&str>) -> String {
    let mut out = String::from("✈️ Cheapest Flight Options\n\n");

    if flights.is_empty() {
        out.push_str("⚠️ No flight data available.\n");
        if let Some(reason) = notice {
            out.push_str(&format!("   ({})\n", reason));
        }
    } else {
        for flight in &flights.flights {
            out.push_str(&render_flight_card(flight));
        }
    }

    if !flights.skipped.is_empty() {
        out.push_str(&format!(
            "ℹ️ {} offer(s) were skipped because of incomplete data.\n",
            flights.skipped.len()
        ));
    }
    out
}

pub fn render_packing_checklist() -> String {
    let mut out = String::from("🎒 Packing Checklist\n");
    for (item, checked) in PACKING_CHECKLIST {
        out.push_str(&format!("  [{}] {}\n", if checked { "x" } else { " " }, item));
    }
    out
}

pub fn render_essentials(trip: &TripRequest) -> String {
    format!(
        "🛂 Travel Essentials\n  \
         🛃 Visa requirements checked: {}\n  \
         🛡️ Travel insurance: {}\n  \
         💱 Currency exchange rates: {}\n",
        yes_no(trip.visa_required),
        yes_no(trip.travel_insurance),
        yes_no(trip.currency_rates),
    )
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn render_plan(plan: &TripPlan) -> String {
    let mut out = String::new();

    out.push_str(&render_banner(&plan.request));
    out.push('\n');
    out.push_str(&render_flights(&plan.flights, plan.flight_notice.as_deref()));
    out.push('\n');
    out.push_str("🏨 Hotels & Restaurants\n\n");
    out.push_str(plan.stays.trim_end());
    out.push_str("\n\n");
    out.push_str("🗺️ Your Personalized Itinerary\n\n");
    out.push_str(plan.itinerary.trim_end());
    out.push_str("\n\n");
    out.push_str(&render_packing_checklist());
    out.push('\n');
    out.push_str(&render_essentials(&plan.request));
    out.push('\n');
    out.push_str("✅ Travel plan generated successfully!\n");
    out
}
