//! Interactive trip loop: read destination, departure and purpose, run the agent, print the
//! recommendation, repeat until `quit`/`exit` or EOF.
//!
//! A failed trip (model error or timeout) is reported on stderr and the loop moves on.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::Instrument;

use wayfarer::{StopReason, ToolRegistry, TravelAgent, TripRequest};

pub const DESTINATION_PROMPT: &str = "Enter the city you want to travel to: ";
pub const DEPARTURE_PROMPT: &str = "Enter your departure city: ";
pub const PURPOSE_PROMPT: &str =
    "Enter the purpose of your travel (e.g., Business, Emergency, Family Visit, Tourism or others): ";
pub const RECOMMENDATION_HEADER: &str = "✈️ Bot Recommendation:";
pub const GOODBYE: &str = "👋 Goodbye!";

/// Counts for one session; `trips_run` includes failed trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub trips_run: usize,
    pub trips_failed: usize,
}

/// One round of prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripInput {
    Trip(TripRequest),
    Quit,
    Eof,
}

pub fn is_quit_command(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    matches!(lower.as_str(), "quit" | "exit")
}

pub fn write_banner<W: Write>(out: &mut W, tools: &ToolRegistry) -> io::Result<()> {
    writeln!(out, "Wayfarer travel assistant")?;
    writeln!(out, "Type 'exit' or 'quit' to end the session.")?;
    writeln!(out, "Available tools:")?;
    for spec in tools.list_all() {
        writeln!(out, "  - {}: {}", spec.name, spec.description)?;
    }
    writeln!(out)
}

enum Field {
    Value(String),
    Quit,
    Eof,
}

/// Prompts until a non-blank line arrives. `quit_allowed` is set for the city fields only.
async fn read_field<R, W>(
    lines: &mut Lines<R>,
    out: &mut W,
    prompt: &str,
    quit_allowed: bool,
) -> io::Result<Field>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        write!(out, "{prompt}")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            return Ok(Field::Eof);
        };
        let value = line.trim();
        if quit_allowed && is_quit_command(value) {
            return Ok(Field::Quit);
        }
        if !value.is_empty() {
            return Ok(Field::Value(value.to_string()));
        }
    }
}

/// Reads destination, departure and purpose. Stops at the first quit word or EOF, so a
/// quit in the destination field never prompts for the rest.
pub async fn read_trip<R, W>(lines: &mut Lines<R>, out: &mut W) -> io::Result<TripInput>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut fields = Vec::with_capacity(3);
    for (prompt, quit_allowed) in [
        (DESTINATION_PROMPT, true),
        (DEPARTURE_PROMPT, true),
        (PURPOSE_PROMPT, false),
    ] {
        match read_field(lines, out, prompt, quit_allowed).await? {
            Field::Value(v) => fields.push(v),
            Field::Quit => return Ok(TripInput::Quit),
            Field::Eof => return Ok(TripInput::Eof),
        }
    }
    let [destination, departure, purpose]: [String; 3] = match fields.try_into() {
        Ok(f) => f,
        Err(_) => return Ok(TripInput::Eof),
    };
    Ok(TripInput::Trip(TripRequest::new(departure, destination, purpose)))
}

/// Runs trips read from `input` until quit or EOF, writing prompts and recommendations to
/// `out`.
pub async fn run_session<R, W>(
    agent: &TravelAgent,
    input: R,
    out: &mut W,
) -> io::Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write_banner(out, agent.tools())?;
    let mut lines = input.lines();
    let mut summary = SessionSummary::default();

    loop {
        let request = match read_trip(&mut lines, out).await? {
            TripInput::Trip(r) => r,
            TripInput::Quit => break,
            TripInput::Eof => {
                writeln!(out)?;
                break;
            }
        };

        writeln!(out, "\n🤖 Analyzing travel options...\n")?;
        out.flush()?;
        summary.trips_run += 1;

        let span = tracing::info_span!(
            "trip",
            departure = %request.departure,
            destination = %request.destination
        );
        match agent.run(&request).instrument(span).await {
            Ok(state) => {
                if let Some(StopReason::TurnLimitExceeded { turns }) = state.stop_reason {
                    writeln!(
                        out,
                        "(stopped after {turns} tool turns; recommendation uses what was gathered)"
                    )?;
                }
                if let Some(reply) = state.last_assistant_reply().filter(|r| !r.is_empty()) {
                    writeln!(out, "{RECOMMENDATION_HEADER}\n{reply}\n")?;
                }
            }
            Err(e) => {
                summary.trips_failed += 1;
                tracing::error!(error = %e, "trip failed");
                eprintln!("error: {e}");
            }
        }
    }

    writeln!(out, "{GOODBYE}")?;
    tracing::info!(
        trips = summary.trips_run,
        failed = summary.trips_failed,
        "session ended"
    );
    Ok(summary)
}
