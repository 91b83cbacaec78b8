//! SearchAPI wire types
//!
//! Structs that mirror the provider's JSON payloads. Optional fields default so
//! that a sparse but well-formed payload still parses; a structurally wrong
//! payload fails deserialization.

use serde::Deserialize;

/// Response of the airport autocomplete engine
#[derive(Deserialize, Debug, Clone, Default)]
pub struct AirportLookupResponse {
    /// Ranked suggestions
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

/// A single autocomplete suggestion (a city or an airport)
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Suggestion {
    /// Suggestion kind, `city` or `airport`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Display name, e.g. `Toronto, ON, Canada`
    #[serde(default)]
    pub name: Option<String>,
    /// IATA code when the suggestion is itself an airport
    #[serde(default)]
    pub id: Option<String>,
    /// City, when the suggestion is an airport
    #[serde(default)]
    pub city: Option<String>,
    /// Airports serving a city suggestion
    #[serde(default)]
    pub airports: Vec<SuggestedAirport>,
}

/// Airport nested in a city suggestion
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SuggestedAirport {
    /// IATA code
    #[serde(default)]
    pub id: Option<String>,
    /// Airport name
    #[serde(default)]
    pub name: Option<String>,
    /// City
    #[serde(default)]
    pub city: Option<String>,
}

/// Response of the flight search engine
#[derive(Deserialize, Debug, Clone, Default)]
pub struct FlightsResponse {
    /// Parameters the provider searched with
    #[serde(default)]
    pub search_parameters: Option<SearchParameters>,
    /// Provider-ranked best offers
    #[serde(default)]
    pub best_flights: Vec<RawOffer>,
    /// Everything else
    #[serde(default)]
    pub other_flights: Vec<RawOffer>,
    /// Price context
    #[serde(default)]
    pub price_insights: Option<RawPriceInsights>,
}

/// Echoed search parameters
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SearchParameters {
    /// Departure code
    #[serde(default)]
    pub departure_id: Option<String>,
    /// Arrival code
    #[serde(default)]
    pub arrival_id: Option<String>,
    /// Outbound date
    #[serde(default)]
    pub outbound_date: Option<String>,
    /// Return date
    #[serde(default)]
    pub return_date: Option<String>,
    /// Trip type
    #[serde(default)]
    pub flight_type: Option<String>,
    /// Currency prices are quoted in
    #[serde(default)]
    pub currency: Option<String>,
}

/// One offer as returned by the provider
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawOffer {
    /// Legs in travel order
    #[serde(default)]
    pub flights: Vec<RawLeg>,
    /// Connections in travel order
    #[serde(default)]
    pub layovers: Vec<RawLayover>,
    /// Total duration in minutes
    #[serde(default)]
    pub total_duration: Option<u32>,
    /// Total price
    #[serde(default)]
    pub price: Option<f64>,
    /// Emissions in grams
    #[serde(default)]
    pub carbon_emissions: Option<RawCarbonEmissions>,
}

/// One leg of an offer
#[derive(Deserialize, Debug, Clone)]
pub struct RawLeg {
    /// Where the leg departs
    pub departure_airport: RawAirportTime,
    /// Where the leg lands
    pub arrival_airport: RawAirportTime,
    /// Leg duration in minutes
    #[serde(default)]
    pub duration: Option<u32>,
    /// Operating airline
    #[serde(default)]
    pub airline: Option<String>,
    /// Flight number
    #[serde(default)]
    pub flight_number: Option<String>,
    /// Departs on one day and lands on the next
    #[serde(default)]
    pub is_overnight: Option<bool>,
}

/// Airport plus local date and time for one end of a leg
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawAirportTime {
    /// IATA code
    #[serde(default)]
    pub id: Option<String>,
    /// Airport name
    #[serde(default)]
    pub name: Option<String>,
    /// Local date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    /// Local time, `HH:MM`
    #[serde(default)]
    pub time: Option<String>,
}

/// A connection between two legs
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawLayover {
    /// IATA code
    #[serde(default)]
    pub id: Option<String>,
    /// Airport name
    #[serde(default)]
    pub name: Option<String>,
    /// Connection time in minutes
    #[serde(default)]
    pub duration: Option<u32>,
    /// Connection spans a night
    #[serde(default)]
    pub overnight: Option<bool>,
}

/// Emissions block, in grams
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawCarbonEmissions {
    /// This itinerary
    #[serde(default)]
    pub this_flight: Option<f64>,
    /// Typical for the route
    #[serde(default)]
    pub typical_for_this_route: Option<f64>,
    /// Difference to typical, in percent
    #[serde(default)]
    pub difference_percent: Option<i64>,
}

/// Price insights block
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawPriceInsights {
    /// Lowest price seen
    #[serde(default)]
    pub lowest_price: Option<f64>,
    /// `low`, `typical` or `high`
    #[serde(default)]
    pub price_level: Option<String>,
    /// Usual `[low, high]` range
    #[serde(default)]
    pub typical_price_range: Option<Vec<f64>>,
}

/// Error envelope the provider returns instead of results
#[derive(Deserialize, Debug, Clone)]
pub struct ErrorEnvelope {
    /// Provider message
    pub error: String,
}
