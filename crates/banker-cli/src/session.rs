//! Interactive menu session
//!
//! Reads one command per line and answers it against a live state, so a
//! sequence of requests builds on the result of the previous ones.

use crate::commands;
use crate::error::CliError;
use crate::loader::parse_units;
use crate::output::Output;
use banker_core::ResourceState;
use std::io::{BufRead, Write};

const MENU: &str = "\
**********************************************
******** Banker Algorithm Simulation *********
  0. Quit                                 (quit)
  1. Request resources for one process    (request <pid> <units...>)
  2. Find a safe sequence                 (check)
  3. Output all safe sequences            (all)
  4. Output the current resource status   (status)
**********************************************";

/// What one input line amounts to
pub enum Step {
    /// Leave the loop
    Quit,
    /// Nothing to do (blank line)
    Skip,
    /// Print this and keep going
    Reply(Output),
}

/// Interactive session over an owned state
pub struct Session {
    state: ResourceState,
    json: bool,
    enumerate_limit: Option<usize>,
}

impl Session {
    /// Create a new session
    pub fn new(state: ResourceState, json: bool, enumerate_limit: Option<usize>) -> Self {
        Self {
            state,
            json,
            enumerate_limit,
        }
    }

    /// Current state
    #[cfg(test)]
    pub fn state(&self) -> &ResourceState {
        &self.state
    }

    /// Interpret one line
    pub fn handle(&mut self, line: &str) -> Step {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Step::Skip;
        };

        match command {
            "0" | "q" | "quit" | "exit" => Step::Quit,
            "1" | "request" => {
                let rest: Vec<&str> = tokens.collect();
                Step::Reply(self.request(&rest))
            }
            "2" | "check" => Step::Reply(commands::check(&self.state, self.json)),
            "3" | "all" | "enumerate" => Step::Reply(commands::enumerate(
                &self.state,
                self.enumerate_limit,
                self.json,
            )),
            "4" | "status" => Step::Reply(commands::status(&self.state, self.json)),
            "help" | "?" => Step::Reply(Output::new(self.json).message(MENU)),
            other => Step::Reply(
                Output::new(self.json)
                    .field("error", &format!("unknown command '{}'", other))
                    .message("error, please input a digit from 0 to 4 (or 'help')"),
            ),
        }
    }

    fn request(&mut self, args: &[&str]) -> Output {
        match parse_request_args(args) {
            Ok((pid, units)) => commands::request(&mut self.state, pid, &units, self.json),
            Err(e) => Output::new(self.json)
                .field("error", &e.to_string())
                .message(&format!(
                    "{}\nusage: request <pid> <units...>, e.g. request 1 1 0 2",
                    e
                )),
        }
    }

    /// Run the loop until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<(), CliError> {
        if !self.json {
            writeln!(out, "{}", MENU)?;
            writeln!(out, "{}", commands::status(&self.state, false).render())?;
        }

        for line in input.lines() {
            let line = line?;
            match self.handle(&line) {
                Step::Quit => break,
                Step::Skip => continue,
                Step::Reply(output) => {
                    writeln!(out, "{}", output.render())?;
                }
            }
            out.flush()?;
        }

        tracing::debug!("Interactive session ended");
        Ok(())
    }
}

/// Split `<pid> <units...>`
fn parse_request_args(args: &[&str]) -> Result<(usize, Vec<banker_core::Units>), CliError> {
    let (pid, units) = args
        .split_first()
        .ok_or_else(|| CliError::InvalidInput("missing process id".into()))?;
    let pid = pid
        .parse::<usize>()
        .map_err(|e| CliError::InvalidInput(format!("process id '{}': {}", pid, e)))?;
    let units = parse_units(&units.join(" "), "request", 1)?;
    Ok((pid, units))
}
