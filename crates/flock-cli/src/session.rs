//! Script session.
//!
//! Drives a [`Network`] from a stream of [`Command`]s and writes rendered
//! output. Network failures are reported inline and the script continues:
//! rejections as `rejected: <reason>`, input errors as `error: <reason>`.
//! Only I/O failures and unparsable lines stop the run.

use std::io::{BufRead, Write};

use flock_core::{AccountId, Network, NetworkConfig, NetworkError, PostId, PostRequest};

use crate::{
    command::Command,
    error::CliError,
    render,
};

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptStats {
    /// Commands executed (excluding blank and comment lines).
    pub commands: usize,
    /// Commands the network refused.
    pub rejected: usize,
    /// Commands with input-domain errors.
    pub errors: usize,
}

/// A network plus an output sink.
#[derive(Debug)]
pub struct Session<W> {
    network: Network,
    out: W,
    stats: ScriptStats,
}

impl<W: Write> Session<W> {
    /// Create a session over a fresh network.
    pub fn new(config: NetworkConfig, out: W) -> Self {
        Self { network: Network::new(config), out, stats: ScriptStats::default() }
    }

    /// The network being driven.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Counters so far.
    pub fn stats(&self) -> ScriptStats {
        self.stats
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run every line of `input`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Io` on read/write failure and `CliError::Parse` for
    /// the first unparsable line.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<ScriptStats, CliError> {
        writeln!(self.out, "The social network {} was created!", self.network.name())?;

        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let command = Command::parse(&line)
                .map_err(|reason| CliError::Parse { line: index + 1, reason })?;

            if let Some(command) = command {
                self.execute(command)?;
            }
        }

        tracing::info!(
            commands = self.stats.commands,
            rejected = self.stats.rejected,
            errors = self.stats.errors,
            "script finished"
        );
        Ok(self.stats)
    }

    /// Execute one command and write its output.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Io` if the output cannot be written.
    pub fn execute(&mut self, command: Command) -> Result<(), CliError> {
        self.stats.commands += 1;
        tracing::debug!(?command, "executing");

        match self.apply(command) {
            Ok(lines) => {
                for line in lines {
                    writeln!(self.out, "{line}")?;
                }
            },
            Err(err) if err.is_rejection() => {
                self.stats.rejected += 1;
                tracing::debug!(%err, "rejected");
                writeln!(self.out, "rejected: {err}")?;
            },
            Err(err) => {
                self.stats.errors += 1;
                tracing::warn!(%err, "command failed");
                writeln!(self.out, "error: {err}")?;
            },
        }

        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<Vec<String>, NetworkError> {
        let actions = match command {
            Command::SignUp { username, credential } => {
                self.network.sign_up(&username, &credential)?;
                Vec::new()
            },
            Command::LogIn { username, credential } => {
                self.network.log_in(&username, &credential)?
            },
            Command::LogOut { username } => self.network.log_out(&username)?,
            Command::Follow { follower, followee } => {
                let (follower, followee) = (self.account(&follower)?, self.account(&followee)?);
                self.network.follow(follower, followee)?
            },
            Command::Unfollow { follower, followee } => {
                let (follower, followee) = (self.account(&follower)?, self.account(&followee)?);
                self.network.unfollow(follower, followee)?
            },
            Command::Publish { username, kind, body, price, location } => {
                let owner = self.account(&username)?;
                let request = PostRequest { body, price, location };
                self.network.publish(owner, &kind, request)?.1
            },
            Command::Like { username, post } => {
                let actor = self.account(&username)?;
                self.network.like(actor, PostId::new(post))?
            },
            Command::Comment { username, post, body } => {
                let actor = self.account(&username)?;
                self.network.comment(actor, PostId::new(post), body)?
            },
            Command::Sold { post, credential } => {
                self.network.mark_sold(PostId::new(post), &credential)?
            },
            Command::Discount { post, percent, credential } => {
                self.network.discount(PostId::new(post), percent, &credential)?
            },
            Command::Notifications { username } => return self.notifications(&username),
            Command::Display { post } => {
                let id = PostId::new(post);
                let target = self.network.post(id).ok_or(NetworkError::UnknownPost(id))?;
                return Ok(vec![render::display(target)]);
            },
            Command::Show => return Ok(vec![self.network.to_string()]),
        };

        Ok(actions.iter().filter_map(|action| render::action(&self.network, action)).collect())
    }

    fn notifications(&mut self, username: &str) -> Result<Vec<String>, NetworkError> {
        let account = self.account(username)?;
        let drained = self.network.drain_notifications(account)?;

        let mut lines = Vec::with_capacity(drained.len() + 1);
        lines.push(format!("{username}'s notifications:"));
        lines.extend(drained.iter().map(|n| render::notification(&self.network, n)));
        Ok(lines)
    }

    fn account(&self, username: &str) -> Result<AccountId, NetworkError> {
        self.network
            .lookup(username)
            .ok_or_else(|| NetworkError::UnknownUser { username: username.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> (String, ScriptStats) {
        let mut session = Session::new(NetworkConfig::named("Test"), Vec::new());
        let stats = session.run(script.as_bytes()).unwrap();
        (String::from_utf8(session.into_output()).unwrap(), stats)
    }

    #[test]
    fn rejections_do_not_stop_the_script() {
        let (out, stats) = run("signup alice pass1\nfollow alice alice\nshow\n");
        assert!(out.contains("rejected: alice cannot follow themselves"));
        assert!(out.ends_with("User name: alice, Number of posts: 0, Number of followers: 0\n"));
        assert_eq!(stats, ScriptStats { commands: 3, rejected: 1, errors: 0 });
    }

    #[test]
    fn input_errors_are_reported_and_counted() {
        let (out, stats) = run("signup alice pass1\npublish alice Poll \"?\"\nsold 4 pass1\n");
        assert!(out.contains("error: post type Poll not recognized"));
        assert!(out.contains("error: unknown post: post#4"));
        assert_eq!(stats.errors, 2);
    }

    #[test]
    fn parse_error_stops_with_line_number() {
        let mut session = Session::new(NetworkConfig::default(), Vec::new());
        let err = session.run("show\n\nfrobnicate\nshow\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::Parse { line: 3, .. }));
        assert_eq!(session.stats().commands, 1);
    }

    #[test]
    fn unknown_username_is_a_rejection() {
        let (out, stats) = run("like ghost 0\n");
        assert!(out.contains("rejected: unknown user: ghost"));
        assert_eq!(stats.rejected, 1);
    }
}
