//! Airport resolver
//!
//! Turns a free-text place name into ranked [`AirportCandidate`]s.

use crate::provider::types::AirportLookupResponse;
use crate::provider::FlightDataProvider;
use crate::search::error::SearchError;
use crate::search::model::{AirportCandidate, IataCode};
use std::collections::HashSet;
use std::sync::Arc;

/// Resolves place names to airports through the provider
#[derive(Clone)]
pub struct AirportResolver {
    provider: Arc<dyn FlightDataProvider>,
}

impl AirportResolver {
    /// Create a resolver backed by `provider`
    pub fn new(provider: Arc<dyn FlightDataProvider>) -> Self {
        Self { provider }
    }

    /// Look up airports matching `query`
    ///
    /// Provider ranking is preserved. An empty list means nothing matched and
    /// is not an error.
    ///
    /// # Errors
    /// * `InvalidInput` if `query` is blank
    /// * any provider error unchanged
    pub async fn search_airport(&self, query: &str) -> Result<Vec<AirportCandidate>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidInput(
                "airport query cannot be empty".to_string(),
            ));
        }

        let response = self.provider.lookup_airports(query).await?;
        let candidates = candidates_from_response(response);

        tracing::debug!(
            query = %query,
            matches = candidates.len(),
            "Resolved airport query"
        );

        Ok(candidates)
    }
}

/// Flatten autocomplete suggestions into candidates
///
/// City suggestions contribute their nested airports, airport suggestions
/// contribute themselves. Records without a usable IATA code are dropped and
/// repeated codes keep their first position.
pub fn candidates_from_response(response: AirportLookupResponse) -> Vec<AirportCandidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for suggestion in response.suggestions {
        let suggestion_city = suggestion
            .name
            .as_deref()
            .and_then(|name| name.split(',').next())
            .map(|city| city.trim().to_string());

        if suggestion.airports.is_empty() {
            if let Some(candidate) = candidate(
                suggestion.id.as_deref(),
                suggestion.name.clone(),
                suggestion.city.clone(),
            ) {
                if seen.insert(candidate.iata_code.clone()) {
                    candidates.push(candidate);
                }
            }
            continue;
        }

        for airport in suggestion.airports {
            let city = airport.city.or_else(|| suggestion_city.clone());
            if let Some(candidate) = candidate(airport.id.as_deref(), airport.name, city) {
                if seen.insert(candidate.iata_code.clone()) {
                    candidates.push(candidate);
                }
            }
        }
    }

    candidates
}

fn candidate(id: Option<&str>, name: Option<String>, city: Option<String>) -> Option<AirportCandidate> {
    let iata_code = IataCode::parse(id?).ok()?;
    Some(AirportCandidate {
        name: name.unwrap_or_else(|| iata_code.to_string()),
        city: city.unwrap_or_default(),
        iata_code,
    })
}

/// How a lookup result should be handled in conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirportMatch {
    /// Nothing matched; ask for a different place name
    NoMatch,
    /// Exactly one airport; select it without asking
    Single(AirportCandidate),
    /// Several airports; the user has to pick one of these
    Ambiguous(Vec<AirportCandidate>),
}

impl AirportMatch {
    /// Classify candidates, keeping at most `max_choices` of an ambiguous set
    pub fn classify(mut candidates: Vec<AirportCandidate>, max_choices: usize) -> Self {
        match candidates.len() {
            0 => AirportMatch::NoMatch,
            1 => AirportMatch::Single(candidates.remove(0)),
            _ => {
                candidates.truncate(max_choices.max(2));
                AirportMatch::Ambiguous(candidates)
            }
        }
    }
}
