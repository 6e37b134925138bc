use std::fmt;

use thiserror::Error;

use super::case_analysis::CaseAnalysisErr;
use super::dependency::{Dependency, DependencyErr};
use super::features::{decode_features, split_annotations, Features};
use super::morpheme::{Morpheme, MorphemeErr};
use super::phrase::{BasicPhrase, Phrase};

const PHRASE_MARKER: char = '*';
const BASIC_MARKER: char = '+';

#[derive(Error, Debug)]
pub enum KnpParseErr {
  #[error("basic phrase before any phrase at line {0}")]
  BasicBeforePhraseErr(usize),
  #[error("morpheme before any phrase at line {0}")]
  MorphemeBeforePhraseErr(usize),
  #[error("morpheme before any basic phrase at line {0}")]
  MorphemeBeforeBasicErr(usize),
  #[error("{1} at line {0}")]
  DependencyErr(usize, DependencyErr),
  #[error("{1} at line {0}")]
  CaseAnalysisErr(usize, CaseAnalysisErr),
  #[error("{1} at line {0}")]
  MorphemeErr(usize, MorphemeErr),
  #[error("dependency target {1} of {0} is out of range")]
  InvalidTargetErr(String, usize),
}

/// The three tables decoded from one `knp -tab` sentence block.
#[derive(Debug, Clone, Default)]
pub struct ParsedSentence {
  pub phrases: Vec<Phrase>,
  pub basics: Vec<BasicPhrase>,
  pub morphemes: Vec<Morpheme>,
  morpheme_basic: Vec<usize>,
}

impl ParsedSentence {
  pub fn parse(text: &str) -> Result<ParsedSentence, KnpParseErr> {
    let mut sentence = ParsedSentence::default();
    for (i, line) in text.lines().enumerate() {
      let i = i + 1;
      if line.is_empty() || line.starts_with('#') || line.starts_with('E') {
        continue;
      }
      if line.starts_with(PHRASE_MARKER) {
        let (dependency, features) = decode_header(i, line)?;
        sentence.phrases.push(Phrase::new(dependency, features));
      } else if line.starts_with(BASIC_MARKER) {
        let phrase = match sentence.phrases.len() {
          0 => return Err(KnpParseErr::BasicBeforePhraseErr(i)),
          n => n - 1,
        };
        let (dependency, features) = decode_header(i, line)?;
        sentence
          .basics
          .push(BasicPhrase::new(dependency, features, phrase));
        let basic = sentence.basics.len() - 1;
        sentence.phrases[phrase].basics.push(basic);
      } else {
        if sentence.phrases.is_empty() {
          return Err(KnpParseErr::MorphemeBeforePhraseErr(i));
        }
        if sentence.basics.is_empty() {
          return Err(KnpParseErr::MorphemeBeforeBasicErr(i));
        }
        let morpheme = Morpheme::from_line(line).map_err(|e| KnpParseErr::MorphemeErr(i, e))?;
        let m = sentence.morphemes.len();
        sentence.morphemes.push(morpheme);
        let basic = sentence.basics.len() - 1;
        sentence.basics[basic].morphemes.push(m);
        let phrase = sentence.phrases.len() - 1;
        sentence.phrases[phrase].morphemes.push(m);
        sentence.morpheme_basic.push(basic);
      }
    }
    sentence.check_targets()?;
    Ok(sentence)
  }
  fn check_targets(&self) -> Result<(), KnpParseErr> {
    for (i, p) in self.phrases.iter().enumerate() {
      if let Some(t) = p.target() {
        if t >= self.phrases.len() {
          return Err(KnpParseErr::InvalidTargetErr(format!("phrase {}", i), t));
        }
      }
    }
    for (i, b) in self.basics.iter().enumerate() {
      if let Some(t) = b.target() {
        if t >= self.basics.len() {
          return Err(KnpParseErr::InvalidTargetErr(format!("basic phrase {}", i), t));
        }
      }
    }
    Ok(())
  }
  pub fn basic_of_morpheme(&self, morpheme: usize) -> usize {
    self.morpheme_basic[morpheme]
  }
  pub fn phrase_of_morpheme(&self, morpheme: usize) -> usize {
    self.basics[self.morpheme_basic[morpheme]].phrase
  }
  pub fn phrase_of_basic(&self, basic: usize) -> usize {
    self.basics[basic].phrase
  }
  /// Lemma of the first morpheme of a basic phrase.
  pub fn head_lemma(&self, basic: usize) -> Option<&str> {
    self.basics[basic]
      .morphemes
      .first()
      .map(|&m| self.morphemes[m].lemma.as_str())
  }
  /// Whether walking the phrase dependency chain up from `from` reaches `to`.
  pub fn is_phrase_linked(&self, from: usize, to: usize) -> bool {
    let mut current = Some(from);
    let mut steps = 0;
    while let Some(p) = current {
      if p == to {
        return true;
      }
      steps += 1;
      if steps > self.phrases.len() {
        return false;
      }
      current = self.phrases[p].target();
    }
    false
  }
  pub fn surface(&self) -> String {
    self.morphemes.iter().map(|m| m.surface.as_str()).collect()
  }
}

fn decode_header(i: usize, line: &str) -> Result<(Dependency, Features), KnpParseErr> {
  let (head, tokens) = split_annotations(line);
  let dependency = Dependency::from_header(head).map_err(|e| KnpParseErr::DependencyErr(i, e))?;
  let features = decode_features(tokens).map_err(|e| KnpParseErr::CaseAnalysisErr(i, e))?;
  Ok((dependency, features))
}

impl fmt::Display for ParsedSentence {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for (i, p) in self.phrases.iter().enumerate() {
      writeln!(f, "{}\t{}", i, p)?;
    }
    writeln!(f)?;
    for (i, b) in self.basics.iter().enumerate() {
      writeln!(f, "{}\t{}", i, b)?;
    }
    writeln!(f)?;
    for (i, m) in self.morphemes.iter().enumerate() {
      writeln!(f, "{}\t{}", i, m)?;
    }
    Ok(())
  }
}
