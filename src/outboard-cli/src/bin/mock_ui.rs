//! A scriptable stand-in for a real plugin UI, speaking the wire protocol
//! on stdin/stdout. Useful with the `outboard` harness:
//!
//! ```text
//! outboard target/debug/mock-ui --timeout 5
//! ```
//!
//! It announces `ready`, sends one parameter edit and one configure entry as
//! if a user had touched the interface, echoes lifecycle commands to stderr,
//! and answers `quit` with an orderly `exiting`.

use std::io::{self, BufRead, Write};

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let sample_rate = args.first().map(String::as_str).unwrap_or("?");
    let ui_name = args.get(1).map(String::as_str).unwrap_or("mock-ui");
    eprintln!("[mock-ui] started: name={ui_name} sample_rate={sample_rate}");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "ready")?;
    write!(out, "control\n0\n0.5\n")?;
    write!(out, "configure\nmock-ui:greeting\nhello\n")?;
    out.flush()?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while let Some(line) = lines.next() {
        let command = line?;
        match command.as_str() {
            "show" | "focus" => eprintln!("[mock-ui] {command}"),
            "quit" => break,
            "control" => {
                let index = lines.next().transpose()?.unwrap_or_default();
                let value = lines.next().transpose()?.unwrap_or_default();
                eprintln!("[mock-ui] control {index} = {value}");
            }
            "program" => {
                let channel = lines.next().transpose()?.unwrap_or_default();
                let bank = lines.next().transpose()?.unwrap_or_default();
                let program = lines.next().transpose()?.unwrap_or_default();
                eprintln!("[mock-ui] program {channel}/{bank}/{program}");
            }
            "configure" => {
                let key = lines.next().transpose()?.unwrap_or_default();
                let value = lines.next().transpose()?.unwrap_or_default();
                eprintln!("[mock-ui] configure {key} = {value}");
            }
            other => eprintln!("[mock-ui] ignoring: {other}"),
        }
    }

    writeln!(out, "exiting")?;
    out.flush()?;
    Ok(())
}
