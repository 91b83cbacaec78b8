//! Search domain types
//!
//! Airport candidates, trip specifications and normalized flight offers.

use crate::search::error::SearchError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format accepted on every tool and conversation input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Three-letter uppercase IATA airport code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IataCode(String);

impl IataCode {
    /// Parse a code, trimming whitespace and uppercasing it
    ///
    /// Anything other than exactly three ASCII letters is rejected.
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code))
        } else {
            Err(SearchError::InvalidInput(format!(
                "'{}' is not a 3-letter IATA airport code",
                raw.trim()
            )))
        }
    }

    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for IataCode {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IataCode> for String {
    fn from(code: IataCode) -> Self {
        code.0
    }
}

/// One airport matching a place-name lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportCandidate {
    /// Airport name as reported by the provider
    pub name: String,
    /// City the airport serves
    pub city: String,
    /// IATA code of the airport
    pub iata_code: IataCode,
}

impl AirportCandidate {
    /// Short human label, e.g. `Cochin International Airport (COK), Kochi`
    pub fn label(&self) -> String {
        if self.city.is_empty() {
            format!("{} ({})", self.name, self.iata_code)
        } else {
            format!("{} ({}), {}", self.name, self.iata_code, self.city)
        }
    }
}

/// Kind of trip being searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    /// Outbound flight only
    OneWay,
    /// Outbound and return flights
    #[default]
    RoundTrip,
}

impl TripType {
    /// Wire name sent to the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::OneWay => "one_way",
            TripType::RoundTrip => "round_trip",
        }
    }
}

impl FromStr for TripType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "one_way" => Ok(TripType::OneWay),
            "round_trip" => Ok(TripType::RoundTrip),
            other => Err(SearchError::InvalidInput(format!(
                "flight_type must be 'one_way' or 'round_trip', got '{}'",
                other
            ))),
        }
    }
}

/// Parse an ISO calendar date (`YYYY-MM-DD`)
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, SearchError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        SearchError::InvalidInput(format!(
            "{} must be a date in YYYY-MM-DD format, got '{}'",
            field,
            raw.trim()
        ))
    })
}

/// A complete flight search request
///
/// Built incrementally by the conversation or directly from tool arguments.
/// Call [`TripSpec::validate`] before handing it to the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSpec {
    /// Departure airport
    pub departure_code: IataCode,
    /// Arrival airport
    pub arrival_code: IataCode,
    /// One way or round trip
    pub trip_type: TripType,
    /// Outbound travel date
    pub outbound_date: NaiveDate,
    /// Return travel date, round trips only
    pub return_date: Option<NaiveDate>,
}

impl TripSpec {
    /// Check every invariant against `today`
    ///
    /// A one-way trip carrying a return date is rejected rather than silently
    /// trimmed.
    pub fn validate(&self, today: NaiveDate) -> Result<(), SearchError> {
        if self.departure_code == self.arrival_code {
            return Err(SearchError::InvalidInput(format!(
                "departure and arrival airports must differ (both are {})",
                self.departure_code
            )));
        }

        match (self.trip_type, self.return_date) {
            (TripType::RoundTrip, None) => {
                return Err(SearchError::InvalidInput(
                    "a round trip requires a return_date".to_string(),
                ));
            }
            (TripType::OneWay, Some(_)) => {
                return Err(SearchError::InvalidInput(
                    "a one-way trip must not include a return_date".to_string(),
                ));
            }
            _ => {}
        }

        if self.outbound_date < today {
            return Err(SearchError::InvalidInput(format!(
                "outbound_date {} is in the past (today is {})",
                self.outbound_date, today
            )));
        }

        if let Some(return_date) = self.return_date {
            if return_date < self.outbound_date {
                return Err(SearchError::InvalidInput(format!(
                    "return_date {} is before outbound_date {}",
                    return_date, self.outbound_date
                )));
            }
        }

        Ok(())
    }
}

/// One flight segment inside an offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    /// Departure airport code
    pub departure_airport: String,
    /// Arrival airport code
    pub arrival_airport: String,
    /// Local departure time, `YYYY-MM-DD HH:MM`
    pub departure_time: Option<String>,
    /// Local arrival time, `YYYY-MM-DD HH:MM`
    pub arrival_time: Option<String>,
    /// Operating airline
    pub airline: Option<String>,
    /// Flight number, e.g. `AI 933`
    pub flight_number: Option<String>,
    /// Segment duration
    pub duration_minutes: Option<u32>,
}

/// A connection between two legs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layover {
    /// Airport where the connection happens
    pub airport_code: String,
    /// Airport name, when the provider reports it
    pub airport_name: Option<String>,
    /// Connection time
    pub duration_minutes: Option<u32>,
    /// Whether the connection spans a night
    pub overnight: bool,
}

/// Emissions reported for an offer, in kilograms of CO2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonEmissions {
    /// Emissions of this itinerary
    pub this_flight_kg: f64,
    /// Typical emissions on the route
    pub typical_for_route_kg: Option<f64>,
    /// Difference to the typical value, in percent
    pub difference_percent: Option<i64>,
}

/// A normalized flight offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    /// Distinct airlines across all legs, in leg order
    pub airlines: Vec<String>,
    /// Flight numbers in leg order
    pub flight_numbers: Vec<String>,
    /// Total price
    pub price: Option<f64>,
    /// Currency of `price`
    pub currency: String,
    /// Departure time of the first leg
    pub departure_time: Option<String>,
    /// Arrival time of the last leg
    pub arrival_time: Option<String>,
    /// Total itinerary duration
    pub duration_minutes: Option<u32>,
    /// Legs in travel order
    pub legs: Vec<FlightLeg>,
    /// Connections in travel order; empty for a non-stop offer
    pub stops: Vec<Layover>,
    /// Whether any leg departs on one day and lands on the next
    pub is_overnight: bool,
    /// Emissions, when the provider reports them
    pub carbon_emissions: Option<CarbonEmissions>,
}

/// Echo of the parameters the provider actually searched with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchInfo {
    /// Departure airport code
    pub departure: Option<String>,
    /// Arrival airport code
    pub arrival: Option<String>,
    /// Outbound date
    pub outbound_date: Option<String>,
    /// Return date
    pub return_date: Option<String>,
    /// Trip type
    pub flight_type: Option<String>,
}

/// Price context for the searched route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceInsights {
    /// Cheapest price seen for the route
    pub lowest_price: Option<f64>,
    /// Provider's qualitative level, e.g. `low`, `typical`, `high`
    pub price_level: Option<String>,
    /// Usual low and high bound
    pub typical_price_range: Option<(f64, f64)>,
}

/// Result of one flight search
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlightSearchResult {
    /// What the provider searched for
    pub search_info: Option<SearchInfo>,
    /// Provider's best offers, provider order
    pub best_offers: Vec<FlightOffer>,
    /// Remaining offers, provider order
    pub other_offers: Vec<FlightOffer>,
    /// Price context, when available
    pub price_insights: Option<PriceInsights>,
}

impl FlightSearchResult {
    /// True when the provider found no flights at all
    pub fn is_empty(&self) -> bool {
        self.best_offers.is_empty() && self.other_offers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn round_trip(outbound: &str, ret: Option<&str>) -> TripSpec {
        TripSpec {
            departure_code: IataCode::parse("COK").unwrap(),
            arrival_code: IataCode::parse("YYZ").unwrap(),
            trip_type: TripType::RoundTrip,
            outbound_date: date(outbound),
            return_date: ret.map(date),
        }
    }

    #[test]
    fn test_iata_code_is_uppercased() {
        let code = IataCode::parse(" yyz ").unwrap();
        assert_eq!(code.as_str(), "YYZ");
    }

    #[test]
    fn test_iata_code_rejects_bad_shapes() {
        assert!(IataCode::parse("").is_err());
        assert!(IataCode::parse("YY").is_err());
        assert!(IataCode::parse("YYZZ").is_err());
        assert!(IataCode::parse("Y1Z").is_err());
    }

    #[test]
    fn test_iata_code_deserializes_from_string() {
        let code: IataCode = serde_json::from_str(r#""cok""#).unwrap();
        assert_eq!(code.as_str(), "COK");
        assert!(serde_json::from_str::<IataCode>(r#""toronto""#).is_err());
    }

    #[test]
    fn test_trip_type_from_str() {
        assert_eq!("one_way".parse::<TripType>().unwrap(), TripType::OneWay);
        assert_eq!("round_trip".parse::<TripType>().unwrap(), TripType::RoundTrip);
        assert!("multi_city".parse::<TripType>().is_err());
        assert_eq!(TripType::default(), TripType::RoundTrip);
    }

    #[test]
    fn test_valid_round_trip() {
        let spec = round_trip("2025-11-15", Some("2025-11-22"));
        assert!(spec.validate(date("2025-10-01")).is_ok());
    }

    #[test]
    fn test_round_trip_requires_return_date() {
        let spec = round_trip("2025-11-15", None);
        let err = spec.validate(date("2025-10-01")).unwrap_err();
        assert!(matches!(err, SearchError::InvalidInput(_)));
        assert!(err.to_string().contains("return_date"));
    }

    #[test]
    fn test_one_way_with_return_date_is_rejected() {
        let mut spec = round_trip("2025-11-15", Some("2025-11-22"));
        spec.trip_type = TripType::OneWay;
        let err = spec.validate(date("2025-10-01")).unwrap_err();
        assert!(err.to_string().contains("one-way"));
    }

    #[test]
    fn test_return_before_outbound_is_rejected() {
        let spec = round_trip("2025-11-15", Some("2025-11-14"));
        let err = spec.validate(date("2025-10-01")).unwrap_err();
        assert!(err.to_string().contains("before outbound_date"));
    }

    #[test]
    fn test_same_day_return_is_allowed() {
        let spec = round_trip("2025-11-15", Some("2025-11-15"));
        assert!(spec.validate(date("2025-11-15")).is_ok());
    }

    #[test]
    fn test_outbound_in_the_past_is_rejected() {
        let spec = round_trip("2025-11-15", Some("2025-11-22"));
        let err = spec.validate(date("2025-11-16")).unwrap_err();
        assert!(err.to_string().contains("in the past"));
    }

    #[test]
    fn test_same_airport_is_rejected() {
        let mut spec = round_trip("2025-11-15", Some("2025-11-22"));
        spec.arrival_code = spec.departure_code.clone();
        assert!(spec.validate(date("2025-10-01")).is_err());
    }

    #[test]
    fn test_parse_date_names_field() {
        let err = parse_date("outbound_date", "15/11/2025").unwrap_err();
        assert!(err.to_string().contains("outbound_date"));
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }
}
