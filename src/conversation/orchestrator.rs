//! Conversation orchestrator
//!
//! Drives one flight-search intent from "where from?" to presented results.
//! Each call to [`Orchestrator::advance`] consumes one user message, walks the
//! session through as many stages as that message allows, and returns the
//! updated session together with the reply for the user.
//!
//! Search failures never escape as errors: they become replies, and the ones
//! that end the conversation move it to [`Stage::Done`].

use crate::conversation::parse::{extract_dates, is_retry, parse_selection, parse_trip_type};
use crate::conversation::session::{Outcome, Reply, Session, Stage, StageKind, Turn};
use crate::search::airports::{AirportMatch, AirportResolver};
use crate::search::error::SearchError;
use crate::search::flights::FlightSearchExecutor;
use crate::search::model::{AirportCandidate, TripSpec, TripType};

const ORIGIN_QUESTION: &str = "Where are you flying from?";
const DESTINATION_QUESTION: &str = "Where are you flying to?";
const TRIP_TYPE_QUESTION: &str = "Is this a one-way trip or a round trip?";
const RETRY_HINT: &str = "Reply \"retry\" to search again, or send new dates.";

/// Which end of the trip an airport answer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Origin,
    Destination,
}

impl Endpoint {
    fn question(self) -> &'static str {
        match self {
            Endpoint::Origin => ORIGIN_QUESTION,
            Endpoint::Destination => DESTINATION_QUESTION,
        }
    }

    fn gather_stage(self) -> Stage {
        match self {
            Endpoint::Origin => Stage::GatherOrigin,
            Endpoint::Destination => Stage::GatherDestination,
        }
    }

    fn disambiguate_stage(self, candidates: Vec<AirportCandidate>) -> Stage {
        match self {
            Endpoint::Origin => Stage::DisambiguateOrigin { candidates },
            Endpoint::Destination => Stage::DisambiguateDestination { candidates },
        }
    }
}

/// Session plus the stages visited while handling the current message
struct Progress {
    session: Session,
    trace: Vec<StageKind>,
}

impl Progress {
    fn enter(&mut self, stage: Stage) {
        tracing::debug!(
            from = ?self.session.stage.kind(),
            to = ?stage.kind(),
            "Conversation transition"
        );
        self.trace.push(stage.kind());
        self.session.stage = stage;
    }

    fn fail(&mut self, error: &SearchError) -> Reply {
        tracing::warn!(error = %error, "Conversation ended with a failure");
        let message = error.to_string();
        let retryable = error.is_retryable();
        self.enter(Stage::Done {
            outcome: Outcome::Failed {
                message: message.clone(),
                retryable,
            },
        });
        Reply::Failure { message, retryable }
    }

    fn finish(self, reply: Reply) -> Turn {
        Turn {
            session: self.session,
            reply,
            trace: self.trace,
        }
    }
}

/// Sequences the airport resolver and the flight search executor
#[derive(Clone)]
pub struct Orchestrator {
    resolver: AirportResolver,
    executor: FlightSearchExecutor,
    max_airport_choices: usize,
    max_search_attempts: u32,
}

impl Orchestrator {
    /// Create an orchestrator
    ///
    /// * `max_airport_choices` - airports listed when a place is ambiguous
    /// * `max_search_attempts` - searches allowed per set of dates while the
    ///   provider is unavailable
    pub fn new(
        resolver: AirportResolver,
        executor: FlightSearchExecutor,
        max_airport_choices: usize,
        max_search_attempts: u32,
    ) -> Self {
        Self {
            resolver,
            executor,
            max_airport_choices,
            max_search_attempts: max_search_attempts.max(1),
        }
    }

    /// Open a new conversation
    pub fn start(&self) -> Turn {
        let session = Session::new();
        let trace = vec![session.stage.kind()];
        Turn {
            session,
            reply: prompt(ORIGIN_QUESTION),
            trace,
        }
    }

    /// Handle one user message
    ///
    /// A finished session is replaced by a fresh one and the message is read as
    /// the new departure place.
    pub async fn advance(&self, session: Session, input: &str) -> Turn {
        let input = input.trim();
        let session = match session.stage {
            Stage::Done { .. } => Session::new(),
            _ => session,
        };

        let mut progress = Progress {
            trace: vec![session.stage.kind()],
            session,
        };

        let reply = match progress.session.stage.clone() {
            Stage::GatherOrigin => {
                self.gather_airport(&mut progress, Endpoint::Origin, input)
                    .await
            }
            Stage::GatherDestination => {
                self.gather_airport(&mut progress, Endpoint::Destination, input)
                    .await
            }
            Stage::DisambiguateOrigin { candidates } => {
                self.choose_airport(&mut progress, Endpoint::Origin, candidates, input)
            }
            Stage::DisambiguateDestination { candidates } => {
                self.choose_airport(&mut progress, Endpoint::Destination, candidates, input)
            }
            Stage::GatherTripType => self.gather_trip_type(&mut progress, input),
            Stage::GatherDates => self.gather_dates(&mut progress, input).await,
            Stage::Searching => self.resume_search(&mut progress, input).await,
            Stage::Presenting { .. } => self.present(&mut progress),
            Stage::Done { .. } => prompt(ORIGIN_QUESTION),
        };

        progress.finish(reply)
    }

    async fn gather_airport(&self, progress: &mut Progress, endpoint: Endpoint, input: &str) -> Reply {
        if input.is_empty() {
            return prompt(endpoint.question());
        }

        let candidates = match self.resolver.search_airport(input).await {
            Ok(candidates) => candidates,
            Err(SearchError::InvalidInput(_)) => return prompt(endpoint.question()),
            Err(e) if e.is_retryable() => {
                tracing::warn!(error = %e, "Airport lookup unavailable");
                return prompt(format!(
                    "I couldn't reach the airport lookup service just now. {}",
                    endpoint.question()
                ));
            }
            Err(e) => return progress.fail(&e),
        };

        match AirportMatch::classify(candidates, self.max_airport_choices) {
            AirportMatch::NoMatch => prompt(format!(
                "I couldn't find an airport matching \"{}\". Could you give another city or airport name?",
                input
            )),
            AirportMatch::Single(airport) => self.select_airport(progress, endpoint, airport),
            AirportMatch::Ambiguous(options) => {
                progress.enter(endpoint.disambiguate_stage(options.clone()));
                Reply::Choices {
                    message: format!(
                        "Several airports match \"{}\". Which one do you mean?",
                        input
                    ),
                    options,
                }
            }
        }
    }

    fn choose_airport(
        &self,
        progress: &mut Progress,
        endpoint: Endpoint,
        candidates: Vec<AirportCandidate>,
        input: &str,
    ) -> Reply {
        match parse_selection(input, &candidates) {
            Some(airport) => self.select_airport(progress, endpoint, airport),
            None => Reply::Choices {
                message: "Please pick one of these airports by number or code.".to_string(),
                options: candidates,
            },
        }
    }

    fn select_airport(&self, progress: &mut Progress, endpoint: Endpoint, airport: AirportCandidate) -> Reply {
        match endpoint {
            Endpoint::Origin => {
                let message = format!("Departing from {}. {}", airport.label(), DESTINATION_QUESTION);
                progress.session.draft.origin = Some(airport);
                progress.enter(Stage::GatherDestination);
                prompt(message)
            }
            Endpoint::Destination => {
                let same_as_origin = progress
                    .session
                    .draft
                    .origin
                    .as_ref()
                    .is_some_and(|origin| origin.iata_code == airport.iata_code);
                if same_as_origin {
                    progress.enter(endpoint.gather_stage());
                    return prompt(format!(
                        "{} is your departure airport. Please choose a different destination.",
                        airport.label()
                    ));
                }

                let message = format!("Flying to {}. {}", airport.label(), TRIP_TYPE_QUESTION);
                progress.session.draft.destination = Some(airport);
                progress.enter(Stage::GatherTripType);
                prompt(message)
            }
        }
    }

    fn gather_trip_type(&self, progress: &mut Progress, input: &str) -> Reply {
        match parse_trip_type(input) {
            Some(trip_type) => {
                let draft = &mut progress.session.draft;
                draft.trip_type = Some(trip_type);
                draft.outbound_date = None;
                draft.return_date = None;
                progress.enter(Stage::GatherDates);
                prompt(dates_question(trip_type))
            }
            None => prompt(TRIP_TYPE_QUESTION),
        }
    }

    async fn gather_dates(&self, progress: &mut Progress, input: &str) -> Reply {
        let Some(mut trip_type) = progress.session.draft.trip_type else {
            progress.enter(Stage::GatherTripType);
            return prompt(TRIP_TYPE_QUESTION);
        };

        let dates = match extract_dates(input) {
            Ok(dates) => dates,
            Err(token) => {
                return prompt(format!(
                    "\"{}\" is not a valid date; dates must be written as YYYY-MM-DD. {}",
                    token,
                    dates_question(trip_type)
                ));
            }
        };

        // the user may correct the trip type instead of giving dates
        if let Some(named) = parse_trip_type(input) {
            if dates.is_empty() {
                progress.enter(Stage::GatherTripType);
                return self.gather_trip_type(progress, input);
            }
            progress.session.draft.trip_type = Some(named);
            trip_type = named;
        }

        let (outbound_date, return_date) = match (trip_type, dates.as_slice()) {
            (_, []) => return prompt(dates_question(trip_type)),
            (TripType::OneWay, [outbound]) => (*outbound, None),
            (TripType::RoundTrip, [outbound, ret]) => (*outbound, Some(*ret)),
            (TripType::OneWay, _) => {
                return prompt("A one-way trip needs exactly one departure date (YYYY-MM-DD).");
            }
            (TripType::RoundTrip, _) => {
                return prompt(
                    "A round trip needs two dates: departure and return (YYYY-MM-DD).",
                );
            }
        };

        let Some((departure_code, arrival_code)) = progress.session.draft.route() else {
            progress.session = Session::new();
            progress.enter(Stage::GatherOrigin);
            return prompt(format!("Let's start over. {}", ORIGIN_QUESTION));
        };

        let spec = TripSpec {
            departure_code,
            arrival_code,
            trip_type,
            outbound_date,
            return_date,
        };
        if let Err(e) = spec.validate(self.executor.today()) {
            return prompt(format!("{} {}", e, dates_question(trip_type)));
        }

        let draft = &mut progress.session.draft;
        draft.outbound_date = Some(outbound_date);
        draft.return_date = return_date;
        progress.session.search_attempts = 0;
        progress.enter(Stage::Searching);
        self.search(progress, spec).await
    }

    async fn resume_search(&self, progress: &mut Progress, input: &str) -> Reply {
        if is_retry(input) {
            return match progress.session.draft.trip_spec() {
                Some(spec) => self.search(progress, spec).await,
                None => {
                    progress.enter(Stage::GatherDates);
                    let trip_type = progress.session.draft.trip_type.unwrap_or_default();
                    prompt(dates_question(trip_type))
                }
            };
        }

        let mentions_dates = extract_dates(input).map_or(true, |dates| !dates.is_empty());
        if mentions_dates {
            progress.enter(Stage::GatherDates);
            return self.gather_dates(progress, input).await;
        }

        prompt(RETRY_HINT)
    }

    async fn search(&self, progress: &mut Progress, spec: TripSpec) -> Reply {
        progress.session.search_attempts += 1;
        let attempt = progress.session.search_attempts;

        match self.executor.search_flights(&spec).await {
            Ok(result) => {
                progress.enter(Stage::Presenting { result });
                self.present(progress)
            }
            Err(e) if e.is_retryable() && attempt < self.max_search_attempts => {
                tracing::info!(attempt = attempt, error = %e, "Flight search unavailable, offering retry");
                prompt(format!(
                    "The flight search service is unavailable right now. {}",
                    RETRY_HINT
                ))
            }
            Err(e) => progress.fail(&e),
        }
    }

    fn present(&self, progress: &mut Progress) -> Reply {
        let result = match &progress.session.stage {
            Stage::Presenting { result } => result.clone(),
            _ => return prompt(ORIGIN_QUESTION),
        };
        let route = progress
            .session
            .draft
            .route()
            .map(|(from, to)| format!("{} to {}", from, to))
            .unwrap_or_else(|| "your route".to_string());

        if result.is_empty() {
            // nothing to show; let the user try other dates
            let trip_type = progress.session.draft.trip_type.unwrap_or_default();
            progress.enter(Stage::GatherDates);
            return Reply::Results {
                message: format!(
                    "No flights found from {} on those dates. {}",
                    route,
                    dates_question(trip_type)
                ),
                result,
            };
        }

        let message = format!(
            "Found {} best and {} other flight options from {}.",
            result.best_offers.len(),
            result.other_offers.len(),
            route
        );
        progress.enter(Stage::Done {
            outcome: Outcome::Completed,
        });
        Reply::Results { message, result }
    }
}

fn prompt(message: impl Into<String>) -> Reply {
    Reply::Prompt {
        message: message.into(),
    }
}

fn dates_question(trip_type: TripType) -> &'static str {
    match trip_type {
        TripType::OneWay => "What date would you like to fly (YYYY-MM-DD)?",
        TripType::RoundTrip => {
            "What are your departure and return dates (YYYY-MM-DD, departure first)?"
        }
    }
}
