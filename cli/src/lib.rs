//! Library side of the `wayfarer` binary: the interactive trip session, kept out of
//! `main.rs` so it runs against in-memory input in tests.

mod session;

pub use session::{
    is_quit_command, read_trip, run_session, write_banner, SessionSummary, TripInput,
    DEPARTURE_PROMPT, DESTINATION_PROMPT, GOODBYE, PURPOSE_PROMPT, RECOMMENDATION_HEADER,
};
