use std::io::{self, BufRead, Read, Write};

use tracing::{debug, info, warn};

use crate::config::MalformedPolicy;
use crate::error::RequestError;
use crate::math::objective::{Objective, Paraboloid};

pub const BANNER: &str = "evaluator ready: send \"x y\" pairs separated by whitespace";

/// Longest input line accepted, newline included.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

pub fn parse_number(token: &str) -> Result<f64, RequestError> {
    token.parse::<f64>().map_err(|source| RequestError::InvalidNumber {
        token: token.to_string(),
        source,
    })
}

/// Counts of a finished session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeSummary {
    pub answered: u64,
    pub rejected: u64,
}

pub struct EvalServer<O> {
    objective: O,
    policy: MalformedPolicy,
    max_line: usize,
}

impl Default for EvalServer<Paraboloid> {
    fn default() -> Self {
        EvalServer::new(Paraboloid::default(), MalformedPolicy::Reply)
    }
}

/// Discards input up to and including the next newline.
fn skip_line<R: BufRead>(input: &mut R) -> io::Result<()> {
    loop {
        let (consumed, done) = {
            let available = input.fill_buf()?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            }
        };
        input.consume(consumed);
        if done {
            return Ok(());
        }
    }
}

impl<O: Objective> EvalServer<O> {
    pub fn new(objective: O, policy: MalformedPolicy) -> Self {
        EvalServer { objective, policy, max_line: MAX_LINE_BYTES }
    }

    pub fn with_max_line(mut self, limit: usize) -> Self {
        self.max_line = limit.max(1);
        self
    }

    /// Answers requests from `input` until it is exhausted.
    ///
    /// Numbers are read as a whitespace-separated stream and paired in
    /// order, so a pair may span lines and a line may hold several pairs.
    /// A bad token drops the pending number and the rest of its line.
    /// Malformed input never ends the session; I/O errors do.
    pub fn serve<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> io::Result<ServeSummary> {
        writeln!(output, "{}", BANNER)?;
        output.flush()?;

        let mut summary = ServeSummary::default();
        let mut pending: Option<(String, f64)> = None;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = input.by_ref().take(self.max_line as u64).read_until(b'\n', &mut buf)?;
            if read == 0 {
                if let Some((token, _)) = pending.take() {
                    self.reject(&mut output, &mut summary, RequestError::Incomplete { token })?;
                }
                info!(answered = summary.answered, rejected = summary.rejected, "input closed");
                return Ok(summary);
            }

            if buf.len() >= self.max_line && buf.last() != Some(&b'\n') {
                skip_line(&mut input)?;
                pending = None;
                self.reject(&mut output, &mut summary, RequestError::TooLong { limit: self.max_line })?;
                continue;
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(_) => {
                    pending = None;
                    self.reject(&mut output, &mut summary, RequestError::Encoding)?;
                    continue;
                }
            };

            for token in line.split_whitespace() {
                let value = match parse_number(token) {
                    Ok(value) => value,
                    Err(e) => {
                        pending = None;
                        self.reject(&mut output, &mut summary, e)?;
                        break;
                    }
                };
                match pending.take() {
                    None => pending = Some((token.to_string(), value)),
                    Some((_, x)) => {
                        let result = self.objective.evaluate(x, value);
                        debug!(x, y = value, value = result, "evaluated");
                        write!(output, "{:.16} \n", result)?;
                        output.flush()?;
                        summary.answered += 1;
                    }
                }
            }
        }
    }

    fn reject<W: Write>(&self, output: &mut W, summary: &mut ServeSummary, error: RequestError) -> io::Result<()> {
        warn!(error = %error, "rejected request");
        summary.rejected += 1;
        if self.policy == MalformedPolicy::Reply {
            writeln!(output, "error: {}", error)?;
            output.flush()?;
        }
        Ok(())
    }
}
