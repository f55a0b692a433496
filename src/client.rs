use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};

use tracing::{debug, warn};

use crate::error::ClientError;

pub struct EvalClient {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    banner: String,
}

impl EvalClient {
    /// Starts `command` with piped stdin/stdout and waits for its banner.
    pub fn spawn(mut command: Command) -> Result<Self, ClientError> {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(ClientError::Spawn)?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                return Err(ClientError::Spawn(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "child process has no stdio pipes",
                )));
            }
        };

        let mut client = EvalClient {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
            banner: String::new(),
        };
        client.banner = client.read_line()?;
        debug!(banner = %client.banner, pid = client.child.id(), "evaluation server started");
        Ok(client)
    }

    pub fn banner(&self) -> &str {
        &self.banner
    }

    fn read_line(&mut self) -> Result<String, ClientError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(ClientError::Closed);
        }
        Ok(line.trim_end().to_string())
    }

    /// Sends one request and waits for its answer.
    pub fn evaluate(&mut self, x: f64, y: f64) -> Result<f64, ClientError> {
        let stdin = self.stdin.as_mut().ok_or(ClientError::Closed)?;
        writeln!(stdin, "{} {}", x, y)?;
        stdin.flush()?;

        let line = self.read_line()?;
        if let Some(message) = line.strip_prefix("error:") {
            return Err(ClientError::Rejected(message.trim().to_string()));
        }
        line.trim()
            .parse::<f64>()
            .map_err(|_| ClientError::InvalidResponse(line.clone()))
    }

    /// Closes the request stream and waits for the server to exit.
    pub fn shutdown(mut self) -> Result<ExitStatus, ClientError> {
        drop(self.stdin.take());
        Ok(self.child.wait()?)
    }
}

impl Drop for EvalClient {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Ok(None) = self.child.try_wait() {
            warn!(pid = self.child.id(), "killing evaluation server");
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn script(body: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(body);
        command
    }

    #[test]
    fn evaluate_works() {
        let mut client = EvalClient::spawn(script("echo ready; read l; echo '4.5000 '; read l; echo 'error: nope'")).unwrap();
        assert_eq!(client.banner(), "ready");
        assert_eq!(client.evaluate(1.0, 2.0).unwrap(), 4.5);
        match client.evaluate(1.0, 2.0) {
            Err(ClientError::Rejected(msg)) => assert_eq!(msg, "nope"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(client.evaluate(0.0, 0.0), Err(ClientError::Closed) | Err(ClientError::Io(_))));
    }

    #[test]
    fn invalid_response_works() {
        let mut client = EvalClient::spawn(script("echo ready; read l; echo banana")).unwrap();
        match client.evaluate(1.0, 2.0) {
            Err(ClientError::InvalidResponse(line)) => assert_eq!(line, "banana"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn shutdown_works() {
        let client = EvalClient::spawn(script("echo ready; while read l; do :; done")).unwrap();
        assert!(client.shutdown().unwrap().success());
    }

    #[test]
    fn spawn_failure_works() {
        let result = EvalClient::spawn(Command::new("/nonexistent/eval_server"));
        assert!(matches!(result, Err(ClientError::Spawn(_))));
    }

    #[test]
    fn silent_child_is_closed() {
        let result = EvalClient::spawn(script("exit 0"));
        assert!(matches!(result, Err(ClientError::Closed)));
    }
}
