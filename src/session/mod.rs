//! Interactive browsing session
//!
//! Drives the state → site → nearby-place flow over any line-based input and
//! output. The session borrows the coordinator; loading and saving the cache
//! store around it is the caller's concern.

mod machine;

pub use machine::{interpret, Command, SessionState};

use crate::crawler::Coordinator;
use crate::output::{write_nearby_places, write_state_sites, write_states};
use crate::{AtlasError, Result};
use std::io::{BufRead, Write};

const UNKNOWN_STATE: &str = "[Error] Please type a real state or American territory.";

/// A browsing session over `input` and `output`
pub struct Session<'a, R, W> {
    coordinator: &'a mut Coordinator,
    input: R,
    output: W,
    state: SessionState,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(coordinator: &'a mut Coordinator, input: R, output: W) -> Self {
        Self {
            coordinator,
            input,
            output,
            state: SessionState::AwaitingState,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Runs until the user quits or input ends
    ///
    /// The state directory is loaded before the first prompt; failing to load
    /// it ends the session with that error. Failures while serving a command
    /// are reported and the same prompt is shown again.
    pub async fn run(&mut self) -> Result<()> {
        let directory = self.coordinator.state_directory().await?;
        tracing::info!("State directory ready ({} entries)", directory.len());

        while let Some(prompt) = self.state.prompt() {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                self.state = SessionState::Exit;
                break;
            }

            let command = interpret(&self.state, &line);
            self.execute(command).await?;
        }

        Ok(())
    }

    /// Applies one command, performing any lookups it needs
    pub async fn execute(&mut self, command: Command) -> Result<()> {
        tracing::debug!("Executing {:?}", command);

        match command {
            Command::Quit => self.state = SessionState::Exit,
            Command::Back => self.state = SessionState::AwaitingState,
            Command::Invalid(message) => writeln!(self.output, "{}", message)?,
            Command::ListStates => match self.coordinator.list_states().await {
                Ok(names) => write_states(&mut self.output, &names)?,
                Err(e) => self.report(&e)?,
            },
            Command::ChooseState(name) => {
                match self.coordinator.list_sites_for_state(&name).await {
                    Ok(sites) => {
                        write_state_sites(&mut self.output, &name, &sites)?;
                        self.state = SessionState::AwaitingSelection { state: name, sites };
                    }
                    Err(AtlasError::UnknownState(_)) => writeln!(self.output, "{}", UNKNOWN_STATE)?,
                    Err(e) => self.report(&e)?,
                }
            }
            Command::ChooseSite(index) => {
                let site = match &self.state {
                    SessionState::AwaitingSelection { sites, .. } => sites.get(index).cloned(),
                    _ => None,
                };
                let Some(site) = site else {
                    writeln!(self.output, "{}", machine::OUT_OF_RANGE)?;
                    return Ok(());
                };

                match self.coordinator.list_nearby(&site).await {
                    Ok(places) => write_nearby_places(&mut self.output, &site, &places)?,
                    Err(e) => self.report(&e)?,
                }
            }
        }

        Ok(())
    }

    fn report(&mut self, error: &AtlasError) -> Result<()> {
        tracing::error!("{}", error);
        writeln!(self.output, "[Error] {}", error)?;
        Ok(())
    }
}
