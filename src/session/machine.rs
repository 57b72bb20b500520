//! Browsing session states and input interpretation
//!
//! The interpretation step is pure: it maps the current state and one line of
//! input to a [`Command`]. Executing the command against the coordinator is
//! the driver's job.

use crate::model::SiteRecord;

/// Where the user is in the browse flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a state or territory name
    AwaitingState,

    /// A state's sites are listed and a site number is expected
    AwaitingSelection {
        state: String,
        sites: Vec<SiteRecord>,
    },

    /// The session is over
    Exit,
}

/// What one line of input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Back,
    ListStates,
    ChooseState(String),
    /// Zero-based index into the listed sites
    ChooseSite(usize),
    Invalid(String),
}

pub const NOT_A_NUMBER: &str =
    "That's not a number. Please input a numeral associated with one of the National Sites";
pub const OUT_OF_RANGE: &str =
    "[Error] Please enter an integer that you can see beside one of the options";
pub const EMPTY_STATE: &str = "[Error] Please type a state or territory name";

impl SessionState {
    /// Prompt shown while in this state
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            Self::AwaitingState => Some(
                "Input a state name to search for national sites, 'list' to see them all, or 'exit' to quit: ",
            ),
            Self::AwaitingSelection { .. } => {
                Some("Select a number for nearby places, or type 'back' or 'exit': ")
            }
            Self::Exit => None,
        }
    }
}

fn is_quit(input: &str) -> bool {
    input == "exit" || input == "quit"
}

/// Interprets one line of input in the given state
///
/// Input is trimmed and lowercased before matching, so state names reach the
/// coordinator in the lowercased form the directory is keyed by.
pub fn interpret(state: &SessionState, input: &str) -> Command {
    let input = input.trim().to_lowercase();

    match state {
        SessionState::Exit => Command::Quit,
        _ if is_quit(&input) => Command::Quit,
        SessionState::AwaitingState => match input.as_str() {
            "" => Command::Invalid(EMPTY_STATE.to_string()),
            "list" => Command::ListStates,
            _ => Command::ChooseState(input),
        },
        SessionState::AwaitingSelection { sites, .. } => {
            if input == "back" {
                return Command::Back;
            }
            if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
                return Command::Invalid(NOT_A_NUMBER.to_string());
            }
            match input.parse::<usize>() {
                Ok(n) if n >= 1 && n <= sites.len() => Command::ChooseSite(n - 1),
                _ => Command::Invalid(OUT_OF_RANGE.to_string()),
            }
        }
    }
}
