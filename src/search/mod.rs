//! Airport resolution and flight search
//!
//! The two leaf capabilities exposed as tools. Both are stateless; all they
//! share is the injected provider.

pub mod airports;
pub mod clock;
pub mod error;
pub mod flights;
pub mod model;

pub use airports::{AirportMatch, AirportResolver};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::SearchError;
pub use flights::FlightSearchExecutor;
pub use model::{
    AirportCandidate, FlightOffer, FlightSearchResult, IataCode, TripSpec, TripType,
};
