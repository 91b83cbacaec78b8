//! Conversation session types
//!
//! A [`Session`] is a plain value. The server keeps nothing between turns; the
//! caller sends the session back with every message.

use crate::search::model::{AirportCandidate, FlightSearchResult, IataCode, TripSpec, TripType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where one flight-search conversation currently stands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    /// Waiting for the departure place
    GatherOrigin,
    /// Waiting for the destination place
    GatherDestination,
    /// Waiting for the user to pick a departure airport
    DisambiguateOrigin {
        /// Airports offered, provider rank order
        candidates: Vec<AirportCandidate>,
    },
    /// Waiting for the user to pick a destination airport
    DisambiguateDestination {
        /// Airports offered, provider rank order
        candidates: Vec<AirportCandidate>,
    },
    /// Waiting for one-way or round trip
    GatherTripType,
    /// Waiting for the travel date(s)
    GatherDates,
    /// Search issued; also where a retry is offered after an outage
    Searching,
    /// Results ready to hand back
    Presenting {
        /// Result of the last search
        result: FlightSearchResult,
    },
    /// Conversation finished
    Done {
        /// How it finished
        outcome: Outcome,
    },
}

impl Stage {
    /// Data-free label of this stage
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::GatherOrigin => StageKind::GatherOrigin,
            Stage::GatherDestination => StageKind::GatherDestination,
            Stage::DisambiguateOrigin { .. } => StageKind::DisambiguateOrigin,
            Stage::DisambiguateDestination { .. } => StageKind::DisambiguateDestination,
            Stage::GatherTripType => StageKind::GatherTripType,
            Stage::GatherDates => StageKind::GatherDates,
            Stage::Searching => StageKind::Searching,
            Stage::Presenting { .. } => StageKind::Presenting,
            Stage::Done { .. } => StageKind::Done,
        }
    }
}

/// Stage label without the attached data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum StageKind {
    GatherOrigin,
    GatherDestination,
    DisambiguateOrigin,
    DisambiguateDestination,
    GatherTripType,
    GatherDates,
    Searching,
    Presenting,
    Done,
}

/// Final state of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Results were presented
    Completed,
    /// The search could not be carried out
    Failed {
        /// What went wrong
        message: String,
        /// Whether starting over might succeed
        retryable: bool,
    },
}

/// Trip details collected so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDraft {
    /// Chosen departure airport
    pub origin: Option<AirportCandidate>,
    /// Chosen arrival airport
    pub destination: Option<AirportCandidate>,
    /// Chosen trip type
    pub trip_type: Option<TripType>,
    /// Outbound date
    pub outbound_date: Option<NaiveDate>,
    /// Return date, round trips only
    pub return_date: Option<NaiveDate>,
}

impl TripDraft {
    /// Origin and destination codes, once both are chosen
    pub fn route(&self) -> Option<(IataCode, IataCode)> {
        match (&self.origin, &self.destination) {
            (Some(origin), Some(destination)) => {
                Some((origin.iata_code.clone(), destination.iata_code.clone()))
            }
            _ => None,
        }
    }

    /// Assemble a trip spec once everything is present; not yet validated
    pub fn trip_spec(&self) -> Option<TripSpec> {
        let (departure_code, arrival_code) = self.route()?;
        Some(TripSpec {
            departure_code,
            arrival_code,
            trip_type: self.trip_type?,
            outbound_date: self.outbound_date?,
            return_date: self.return_date,
        })
    }
}

/// One flight-search conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Current stage
    pub stage: Stage,
    /// Details gathered so far
    #[serde(default)]
    pub draft: TripDraft,
    /// Flight searches issued for the current dates
    #[serde(default)]
    pub search_attempts: u32,
}

impl Session {
    /// Fresh session waiting for the departure place
    pub fn new() -> Self {
        Self {
            stage: Stage::GatherOrigin,
            draft: TripDraft::default(),
            search_attempts: 0,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// What the assistant should tell the user after a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    /// A question or clarification
    Prompt {
        /// Text to show
        message: String,
    },
    /// Pick one of several airports
    Choices {
        /// Text to show
        message: String,
        /// Options in provider rank order
        options: Vec<AirportCandidate>,
    },
    /// Search results
    Results {
        /// Summary line
        message: String,
        /// Offers as returned by the search
        result: FlightSearchResult,
    },
    /// The conversation ended without results
    Failure {
        /// What went wrong
        message: String,
        /// Whether starting over might succeed
        retryable: bool,
    },
}

impl Reply {
    /// Text of the reply
    pub fn message(&self) -> &str {
        match self {
            Reply::Prompt { message }
            | Reply::Choices { message, .. }
            | Reply::Results { message, .. }
            | Reply::Failure { message, .. } => message,
        }
    }
}

/// Result of advancing a session by one user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Session to send back with the next message
    pub session: Session,
    /// What to tell the user
    pub reply: Reply,
    /// Every stage passed through during this turn, in order
    pub trace: Vec<StageKind>,
}
