//! Reading free-text answers

use crate::search::model::{AirportCandidate, IataCode, TripType, DATE_FORMAT};
use chrono::NaiveDate;

/// Interpret an answer to "one-way or round trip?"
///
/// Returns `None` when the answer names neither, or both.
pub fn parse_trip_type(text: &str) -> Option<TripType> {
    let normalized = normalize(text);
    let one_way = normalized.contains("one way") || normalized.contains("oneway");
    let round_trip = normalized.contains("round trip")
        || normalized.contains("roundtrip")
        || wants_return(&normalized);

    match (one_way, round_trip) {
        (true, false) => Some(TripType::OneWay),
        (false, true) => Some(TripType::RoundTrip),
        _ => None,
    }
}

/// Whether "return" is mentioned without a negation shortly before it
///
/// "no return", "without a return" and "don't need a return flight" do not
/// count.
fn wants_return(normalized: &str) -> bool {
    const NEGATIONS: [&str; 6] = ["no", "not", "without", "don't", "dont", "never"];

    let words: Vec<&str> = normalized.split(' ').collect();
    words.iter().enumerate().any(|(i, word)| {
        word.starts_with("return")
            && !words[i.saturating_sub(3)..i]
                .iter()
                .any(|before| NEGATIONS.contains(before))
    })
}

/// Pick an airport by 1-based position, IATA code or exact name
pub fn parse_selection(text: &str, candidates: &[AirportCandidate]) -> Option<AirportCandidate> {
    let answer = text.trim().trim_start_matches('#').trim_end_matches('.').trim();
    if answer.is_empty() {
        return None;
    }

    if let Ok(position) = answer.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| candidates.get(index))
            .cloned();
    }

    if let Ok(code) = IataCode::parse(answer) {
        if let Some(found) = candidates.iter().find(|c| c.iata_code == code) {
            return Some(found.clone());
        }
    }

    candidates
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(answer))
        .cloned()
}

/// Pull every date out of a message, in the order written
///
/// # Errors
/// Returns the first date-like token that is not a valid `YYYY-MM-DD` date.
pub fn extract_dates(text: &str) -> Result<Vec<NaiveDate>, String> {
    let mut dates = Vec::new();
    for token in text
        .split(|c: char| !(c.is_ascii_digit() || c == '-' || c == '/'))
        .map(|token| token.trim_matches('-'))
        .filter(|token| {
            token.contains(|c: char| c == '-' || c == '/')
                && token.chars().any(|c| c.is_ascii_digit())
        })
    {
        match NaiveDate::parse_from_str(token, DATE_FORMAT) {
            Ok(date) => dates.push(date),
            Err(_) => return Err(token.to_string()),
        }
    }
    Ok(dates)
}

/// Whether the user asked to run the same search again
pub fn is_retry(text: &str) -> bool {
    let normalized = normalize(text);
    normalized.contains("retry") || normalized.contains("try again") || normalized == "yes"
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .replace(|c: char| c == '-' || c == '_' || c == ',' || c == '.', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
