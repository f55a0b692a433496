use std::io::Write;
use std::process::{Command, Output, Stdio};

use preclab::client::EvalClient;
use preclab::server::BANNER;

fn server() -> Command {
    Command::new(env!("CARGO_BIN_EXE_eval_server"))
}

/// Feeds `input` to a fresh server, closes its stdin and collects the result.
fn batch(args: &[&str], input: &str) -> Output {
    let mut child = server()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to start eval_server");
    child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout).lines().map(str::to_string).collect()
}

#[test]
fn batch_session_works() {
    let output = batch(&[], "0 0\n1 2\n-3 4\n");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!(
            "{}\n3.0000000000000000 \n8.0000000000000000 \n28.0000000000000000 \n",
            BANNER
        )
    );
}

#[test]
fn end_of_input_exits_cleanly() {
    let output = batch(&[], "");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_lines(&output), [BANNER]);
}

#[test]
fn interactive_session_works() {
    let mut client = EvalClient::spawn(server()).unwrap();
    assert_eq!(client.banner(), BANNER);

    // each answer arrives before the next request is sent
    assert_eq!(client.evaluate(0.0, 0.0).unwrap(), 3.0);
    assert_eq!(client.evaluate(1.0, 2.0).unwrap(), 8.0);
    assert_eq!(client.evaluate(-3.0, 4.0).unwrap(), 28.0);
    for i in 0..100 {
        let x = i as f64 / 8.0;
        assert_eq!(client.evaluate(x, 0.5).unwrap(), x * x + 3.25);
    }

    assert!(client.shutdown().unwrap().success());
}

#[test]
fn malformed_requests_are_recoverable() {
    let output = batch(&[], "1 2\nfoo bar\n1\n\n-3 4\n");
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "8.0000000000000000 ");
    assert!(lines[2].starts_with("error: invalid number 'foo'"));
    // the lone 1 pairs with -3, leaving 4 unmatched at end of input
    assert_eq!(lines[3], "13.0000000000000000 ");
    assert_eq!(lines[4], "error: input ended after a lone number '4'");
}

#[test]
fn pairs_follow_the_token_stream() {
    let output = batch(&[], "1\n2\n0 0 1 2\n0.37 0.026\n");
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        [
            BANNER,
            "8.0000000000000000 ",
            "3.0000000000000000 ",
            "8.0000000000000000 ",
            "3.1375760000000001 ",
        ]
    );
}

#[test]
fn overlong_line_is_rejected() {
    let input = format!("{}\n1 2\n", "9".repeat(70 * 1024));
    let output = batch(&[], &input);
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        [BANNER, "error: line longer than 65536 bytes", "8.0000000000000000 "]
    );
}

#[test]
fn malformed_requests_can_be_skipped() {
    let output = batch(&["--on-malformed", "skip"], "foo bar\n1 2\n");
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), [BANNER, "8.0000000000000000 "]);
}

#[test]
fn non_finite_values_round_trip() {
    let mut client = EvalClient::spawn(server()).unwrap();
    assert_eq!(client.evaluate(f64::INFINITY, 0.0).unwrap(), f64::INFINITY);
    assert!(client.evaluate(f64::NAN, 1.0).unwrap().is_nan());
    assert_eq!(client.evaluate(0.0, -0.0).unwrap(), 3.0);
}

#[test]
fn driver_finds_the_minimum() {
    let output = Command::new(env!("CARGO_BIN_EXE_eval_driver"))
        .args(["--server", env!("CARGO_BIN_EXE_eval_server")])
        .output()
        .expect("failed to run eval_driver");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let lines = stdout_lines(&output);
    assert_eq!(lines[0], BANNER);
    assert!(lines[1].starts_with("x=2.000000e0 y=2.000000e0 f(x,y)=11.0000000000000000"));

    let last = lines.last().unwrap();
    let value: f64 = last
        .split(" = ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap()
        .parse()
        .unwrap();
    assert!(last.starts_with("minimum f("));
    assert!((value - 3.0).abs() < 1e-8, "{}", last);
}
