//! Flight search executor
//!
//! Validates a [`TripSpec`], turns it into a provider query and normalizes the
//! provider's answer into a [`FlightSearchResult`]. No retries happen here.

use crate::provider::types::{
    FlightsResponse, RawAirportTime, RawOffer, RawPriceInsights, SearchParameters,
};
use crate::provider::{FlightDataProvider, FlightQuery};
use crate::search::clock::Clock;
use crate::search::error::SearchError;
use crate::search::model::{
    CarbonEmissions, FlightLeg, FlightOffer, FlightSearchResult, Layover, PriceInsights,
    SearchInfo, TripSpec, TripType, DATE_FORMAT,
};
use std::sync::Arc;

/// Runs flight searches against the provider
#[derive(Clone)]
pub struct FlightSearchExecutor {
    provider: Arc<dyn FlightDataProvider>,
    clock: Arc<dyn Clock>,
    max_offers: usize,
    currency: String,
}

impl FlightSearchExecutor {
    /// Create an executor
    ///
    /// * `max_offers` - cap on each of the best and other offer lists
    /// * `currency` - currency reported when the provider does not echo one
    pub fn new(
        provider: Arc<dyn FlightDataProvider>,
        clock: Arc<dyn Clock>,
        max_offers: usize,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            clock,
            max_offers,
            currency: currency.into(),
        }
    }

    /// Today according to the executor's clock
    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    /// Search flights for `spec`
    ///
    /// A search that finds nothing returns two empty offer lists.
    ///
    /// # Errors
    /// * `InvalidInput` if `spec` breaks a trip invariant
    /// * `Authentication`, `UpstreamUnavailable`, `UpstreamContractViolation`
    ///   from the provider
    pub async fn search_flights(&self, spec: &TripSpec) -> Result<FlightSearchResult, SearchError> {
        spec.validate(self.clock.today())?;
        let query = build_query(spec);

        tracing::debug!(
            departure = %query.departure_id,
            arrival = %query.arrival_id,
            outbound_date = %query.outbound_date,
            return_date = ?query.return_date,
            flight_type = %query.flight_type,
            "Searching flights"
        );

        let response = match self.provider.search_flights(&query).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    retryable = e.is_retryable(),
                    "Flight search failed"
                );
                return Err(e);
            }
        };

        let result = normalize_response(response, self.max_offers, &self.currency);

        tracing::debug!(
            best_offers = result.best_offers.len(),
            other_offers = result.other_offers.len(),
            "Flight search completed"
        );

        Ok(result)
    }
}

/// Provider query for a validated spec; one-way queries carry no return date
pub fn build_query(spec: &TripSpec) -> FlightQuery {
    let return_date = match spec.trip_type {
        TripType::RoundTrip => spec
            .return_date
            .map(|date| date.format(DATE_FORMAT).to_string()),
        TripType::OneWay => None,
    };

    FlightQuery {
        departure_id: spec.departure_code.to_string(),
        arrival_id: spec.arrival_code.to_string(),
        outbound_date: spec.outbound_date.format(DATE_FORMAT).to_string(),
        return_date,
        flight_type: spec.trip_type.as_str().to_string(),
    }
}

/// Normalize a provider response, keeping provider order
pub fn normalize_response(
    response: FlightsResponse,
    max_offers: usize,
    default_currency: &str,
) -> FlightSearchResult {
    let currency = response
        .search_parameters
        .as_ref()
        .and_then(|params| params.currency.clone())
        .unwrap_or_else(|| default_currency.to_string());

    let offers = |raw: Vec<RawOffer>| -> Vec<FlightOffer> {
        raw.into_iter()
            .take(max_offers)
            .map(|offer| normalize_offer(offer, &currency))
            .collect()
    };

    FlightSearchResult {
        search_info: response.search_parameters.map(search_info),
        best_offers: offers(response.best_flights),
        other_offers: offers(response.other_flights),
        price_insights: response.price_insights.map(price_insights),
    }
}

fn normalize_offer(raw: RawOffer, currency: &str) -> FlightOffer {
    let legs: Vec<FlightLeg> = raw
        .flights
        .iter()
        .map(|leg| FlightLeg {
            departure_airport: leg.departure_airport.id.clone().unwrap_or_default(),
            arrival_airport: leg.arrival_airport.id.clone().unwrap_or_default(),
            departure_time: local_time(&leg.departure_airport),
            arrival_time: local_time(&leg.arrival_airport),
            airline: leg.airline.clone(),
            flight_number: leg.flight_number.clone(),
            duration_minutes: leg.duration,
        })
        .collect();

    let mut airlines: Vec<String> = Vec::new();
    for airline in legs.iter().filter_map(|leg| leg.airline.as_ref()) {
        if !airlines.contains(airline) {
            airlines.push(airline.clone());
        }
    }

    let stops = if raw.layovers.is_empty() {
        // connections implied by the legs themselves
        raw.flights
            .iter()
            .take(raw.flights.len().saturating_sub(1))
            .map(|leg| Layover {
                airport_code: leg.arrival_airport.id.clone().unwrap_or_default(),
                airport_name: leg.arrival_airport.name.clone(),
                duration_minutes: None,
                overnight: false,
            })
            .collect()
    } else {
        raw.layovers
            .into_iter()
            .map(|layover| Layover {
                airport_code: layover.id.unwrap_or_default(),
                airport_name: layover.name,
                duration_minutes: layover.duration,
                overnight: layover.overnight.unwrap_or(false),
            })
            .collect()
    };

    let carbon_emissions = raw.carbon_emissions.and_then(|carbon| {
        carbon.this_flight.map(|grams| CarbonEmissions {
            this_flight_kg: grams / 1000.0,
            typical_for_route_kg: carbon.typical_for_this_route.map(|g| g / 1000.0),
            difference_percent: carbon.difference_percent,
        })
    });

    FlightOffer {
        airlines,
        flight_numbers: legs
            .iter()
            .filter_map(|leg| leg.flight_number.clone())
            .collect(),
        price: raw.price,
        currency: currency.to_string(),
        departure_time: legs.first().and_then(|leg| leg.departure_time.clone()),
        arrival_time: legs.last().and_then(|leg| leg.arrival_time.clone()),
        duration_minutes: raw.total_duration,
        is_overnight: raw
            .flights
            .iter()
            .any(|leg| leg.is_overnight.unwrap_or(false)),
        legs,
        stops,
        carbon_emissions,
    }
}

fn local_time(end: &RawAirportTime) -> Option<String> {
    match (&end.date, &end.time) {
        (Some(date), Some(time)) => Some(format!("{} {}", date, time)),
        (Some(date), None) => Some(date.clone()),
        (None, Some(time)) => Some(time.clone()),
        (None, None) => None,
    }
}

fn search_info(params: SearchParameters) -> SearchInfo {
    SearchInfo {
        departure: params.departure_id,
        arrival: params.arrival_id,
        outbound_date: params.outbound_date,
        return_date: params.return_date,
        flight_type: params.flight_type,
    }
}

fn price_insights(raw: RawPriceInsights) -> PriceInsights {
    PriceInsights {
        lowest_price: raw.lowest_price,
        price_level: raw.price_level,
        typical_price_range: match raw.typical_price_range.as_deref() {
            Some([low, high]) => Some((*low, *high)),
            _ => None,
        },
    }
}
