use std::io::{BufRead, BufReader, Error as IOError, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use log::{debug, warn};
use thiserror::Error;

use crate::config::{Config, ConfigErr};
use crate::juman::EOS;

#[derive(Error, Debug)]
pub enum AnalyzerErr {
  #[error("{self:?}")]
  IOError(#[from] IOError),
  #[error("{self:?}")]
  ConfigErr(#[from] ConfigErr),
  #[error("empty analyzer command")]
  EmptyCommandErr,
  #[error("`{0}` has no {1}")]
  PipeErr(String, &'static str),
  #[error("analyzer output ended before `EOS`")]
  UnexpectedEof,
}

/// The morphological tagger and dependency parser.
pub trait Analyze {
  /// Tags one line of text, returning the tagger output up to `EOS`.
  fn tag(&mut self, text: &str) -> Result<String, AnalyzerErr>;
  /// Parses a tagger output, returning the `-tab` parser output up to `EOS`.
  fn parse(&mut self, tagged: &str) -> Result<String, AnalyzerErr>;
}

/// Reads lines up to and including the `EOS` line.
pub fn read_until_eos<R: BufRead>(reader: &mut R) -> Result<String, AnalyzerErr> {
  let mut output = String::new();
  loop {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
      return Err(AnalyzerErr::UnexpectedEof);
    }
    output.push_str(&line);
    if line.trim_end_matches(&['\r', '\n'][..]) == EOS {
      return Ok(output);
    }
  }
}

/// A long-lived child process answering one request per `EOS`-terminated
/// block.
struct Process {
  name: String,
  child: Child,
  stdin: ChildStdin,
  stdout: BufReader<ChildStdout>,
}

impl Process {
  fn spawn(command: &[String]) -> Result<Process, AnalyzerErr> {
    let (program, args) = command.split_first().ok_or(AnalyzerErr::EmptyCommandErr)?;
    let mut child = Command::new(program)
      .args(args)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .spawn()?;
    let stdin = child
      .stdin
      .take()
      .ok_or_else(|| AnalyzerErr::PipeErr(program.clone(), "stdin"))?;
    let stdout = child
      .stdout
      .take()
      .ok_or_else(|| AnalyzerErr::PipeErr(program.clone(), "stdout"))?;
    debug!("spawned {:?}", command);
    Ok(Process {
      name: program.clone(),
      child,
      stdin,
      stdout: BufReader::new(stdout),
    })
  }
  fn request(&mut self, input: &str) -> Result<String, AnalyzerErr> {
    self.stdin.write_all(input.as_bytes())?;
    self.stdin.flush()?;
    read_until_eos(&mut self.stdout)
  }
}

impl Drop for Process {
  fn drop(&mut self) {
    if let Err(e) = self.child.kill() {
      warn!("failed to kill {}: {}", self.name, e);
    }
    let _ = self.child.wait();
  }
}

/// The tagger and parser processes, spawned once and shut down on drop.
pub struct AnalyzerSession {
  juman: Process,
  knp: Process,
}

impl AnalyzerSession {
  pub fn new(juman_command: &[String], knp_command: &[String]) -> Result<AnalyzerSession, AnalyzerErr> {
    Ok(AnalyzerSession {
      juman: Process::spawn(juman_command)?,
      knp: Process::spawn(knp_command)?,
    })
  }
  pub fn setup(config: &Config) -> Result<AnalyzerSession, AnalyzerErr> {
    AnalyzerSession::new(&config.juman_command()?, &config.knp_command()?)
  }
}

impl Analyze for AnalyzerSession {
  fn tag(&mut self, text: &str) -> Result<String, AnalyzerErr> {
    // one request per line
    let mut line: String = text.chars().filter(|&c| c != '\n' && c != '\r').collect();
    line.push('\n');
    self.juman.request(&line)
  }
  fn parse(&mut self, tagged: &str) -> Result<String, AnalyzerErr> {
    let mut input = tagged.to_string();
    if !input.ends_with('\n') {
      input.push('\n');
    }
    self.knp.request(&input)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  fn cat() -> Vec<String> {
    vec![String::from("cat")]
  }

  #[test]
  fn test_read_until_eos() {
    let mut reader = Cursor::new("a\nb\nEOS\nc\nEOS\n");
    assert_eq!("a\nb\nEOS\n", read_until_eos(&mut reader).unwrap());
    assert_eq!("c\nEOS\n", read_until_eos(&mut reader).unwrap());
    match read_until_eos(&mut reader) {
      Err(AnalyzerErr::UnexpectedEof) => (),
      r => panic!("unexpected {:?}", r),
    }
  }

  #[test]
  fn test_read_until_eos_truncated() {
    let mut reader = Cursor::new("a\nEO");
    assert!(read_until_eos(&mut reader).is_err());
  }

  #[test]
  fn test_empty_command() {
    match AnalyzerSession::new(&[], &cat()) {
      Err(AnalyzerErr::EmptyCommandErr) => (),
      Err(e) => panic!("unexpected {:?}", e),
      Ok(_) => panic!("unexpected session"),
    }
  }

  #[test]
  fn test_session_round_trip() {
    let mut session = AnalyzerSession::new(&cat(), &cat()).unwrap();
    assert_eq!("EOS\n", session.tag("EOS").unwrap());
    let tagged = "走る はしる 走る 動詞 2 * 0 子音動詞ラ行 10 基本形 2 NIL\nEOS\n";
    assert_eq!(tagged, session.parse(tagged).unwrap());
    assert_eq!(tagged, session.parse(tagged).unwrap());
  }
}
