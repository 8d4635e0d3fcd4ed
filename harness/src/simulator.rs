//! Remote simulator client and a reference server for it.
//!
//! The client speaks the line protocol in [`crate::protocol`] over any
//! `BufRead`/`Write` pair, typically the two halves of a TCP stream.
//! [`serve_connection`] answers the same protocol from a
//! [`LocalEnvironment`], which lets the client be exercised without the
//! external simulator.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use cubist_kernel::carrier::configuration::Configuration;
use cubist_kernel::operators::moves::Move;

use crate::environment::{CubeEnvironment, EnvironmentError, LocalEnvironment};
use crate::protocol::{Command, ErrorResponse, StepFeedback};

/// Environment port backed by a remote simulator.
#[derive(Debug)]
pub struct SimulatorClient<R, W> {
    reader: R,
    writer: W,
    size: usize,
}

impl SimulatorClient<BufReader<TcpStream>, TcpStream> {
    /// Connect over TCP and initialize a cube of edge length `size`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::Io`] if the connection fails, or any
    /// error raised by the `initialize` exchange.
    pub fn connect(
        address: impl ToSocketAddrs,
        size: usize,
        animate: bool,
    ) -> Result<Self, EnvironmentError> {
        let stream = TcpStream::connect(address)?;
        let reader = BufReader::new(stream.try_clone()?);
        Self::from_streams(reader, stream, size, animate)
    }
}

impl<R: BufRead, W: Write> SimulatorClient<R, W> {
    /// Wrap an established stream pair and initialize a `size` cube.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] if the simulator rejects `initialize`,
    /// or [`EnvironmentError::Remote`] if it answers with a cube of another
    /// size.
    pub fn from_streams(
        reader: R,
        writer: W,
        size: usize,
        animate: bool,
    ) -> Result<Self, EnvironmentError> {
        let mut client = Self {
            reader,
            writer,
            size,
        };
        let initial: Configuration = client.request(&Command::Initialize { size, animate })?;
        if initial.size() != size {
            return Err(EnvironmentError::Remote {
                message: format!(
                    "requested a size {size} cube, simulator returned size {}",
                    initial.size()
                ),
            });
        }
        debug!("simulator initialized a size {size} cube");
        Ok(client)
    }

    /// Release the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn request<T: DeserializeOwned>(&mut self, command: &Command) -> Result<T, EnvironmentError> {
        writeln!(self.writer, "{command}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(EnvironmentError::Closed);
        }
        let line = line.trim_end();
        if line.starts_with('{') {
            if let Ok(ErrorResponse { error }) = serde_json::from_str(line) {
                warn!("simulator rejected {command}: {error}");
                return Err(EnvironmentError::Remote { message: error });
            }
        }
        serde_json::from_str(line).map_err(|source| EnvironmentError::Malformed {
            response: line.to_string(),
            source,
        })
    }
}

impl<R: BufRead, W: Write> CubeEnvironment for SimulatorClient<R, W> {
    fn cube_size(&self) -> usize {
        self.size
    }

    fn reset(&mut self, scramble_moves: u32) -> Result<Configuration, EnvironmentError> {
        self.request(&Command::Reset { scramble_moves })
    }

    fn step(&mut self, mv: Move) -> Result<StepFeedback, EnvironmentError> {
        self.request(&Command::Step(mv))
    }

    fn state(&mut self) -> Result<Configuration, EnvironmentError> {
        self.request(&Command::GetState)
    }

    fn is_solved(&mut self, configuration: &Configuration) -> Result<bool, EnvironmentError> {
        self.request(&Command::IsSolved(configuration.clone()))
    }
}

/// Answer protocol requests from `reader` on `writer` until end of input.
///
/// Each `initialize` replaces the cube with a fresh [`LocalEnvironment`]
/// seeded from `seed`. Bad requests get an error response; the connection
/// stays open. Returns the number of requests answered.
///
/// # Errors
///
/// Returns the I/O error if reading or writing fails.
pub fn serve_connection(
    mut reader: impl BufRead,
    mut writer: impl Write,
    seed: u64,
) -> std::io::Result<u64> {
    let mut environment: Option<LocalEnvironment> = None;
    let mut answered = 0;
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(answered);
        }
        if line.trim().is_empty() {
            continue;
        }
        let response = match answer(&mut environment, &line, seed) {
            Ok(json) => json,
            Err(err) => {
                warn!("request {:?} failed: {err}", line.trim_end());
                error_json(&err.to_string())
            }
        };
        writeln!(writer, "{response}")?;
        writer.flush()?;
        answered += 1;
    }
}

fn answer(
    environment: &mut Option<LocalEnvironment>,
    line: &str,
    seed: u64,
) -> Result<String, EnvironmentError> {
    match Command::parse(line)? {
        Command::Initialize { size, .. } => {
            let fresh = LocalEnvironment::new(size, seed)?;
            let json = to_json(fresh.configuration());
            *environment = Some(fresh);
            Ok(json)
        }
        Command::Reset { scramble_moves } => {
            Ok(to_json(&initialized(environment)?.reset(scramble_moves)?))
        }
        Command::Step(mv) => Ok(to_json(&initialized(environment)?.step(mv)?)),
        Command::GetState => Ok(to_json(&initialized(environment)?.state()?)),
        Command::IsSolved(configuration) => Ok(to_json(
            &initialized(environment)?.is_solved(&configuration)?,
        )),
    }
}

fn initialized(
    environment: &mut Option<LocalEnvironment>,
) -> Result<&mut LocalEnvironment, EnvironmentError> {
    environment.as_mut().ok_or_else(|| EnvironmentError::Remote {
        message: "cube not initialized".to_string(),
    })
}

fn to_json(value: &impl Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| error_json(&err.to_string()))
}

fn error_json(message: &str) -> String {
    let body = ErrorResponse {
        error: message.to_string(),
    };
    serde_json::to_string(&body).unwrap_or_else(|_| r#"{"error":"unencodable error"}"#.to_string())
}
