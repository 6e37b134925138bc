use std::fmt;

use super::dependency::Dependency;
use super::features::Features;

/// A bunsetsu, opened by a `*` line.
#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
  pub dependency: Dependency,
  pub features: Features,
  pub basics: Vec<usize>,
  pub morphemes: Vec<usize>,
}

/// A basic phrase (tag unit), opened by a `+` line.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicPhrase {
  pub dependency: Dependency,
  pub features: Features,
  pub phrase: usize,
  pub morphemes: Vec<usize>,
}

impl Phrase {
  pub fn new(dependency: Dependency, features: Features) -> Phrase {
    Phrase {
      dependency,
      features,
      basics: vec![],
      morphemes: vec![],
    }
  }
  pub fn target(&self) -> Option<usize> {
    self.dependency.target
  }
  pub fn is_coordination(&self) -> bool {
    self.dependency.is_coordination()
  }
}

impl BasicPhrase {
  pub fn new(dependency: Dependency, features: Features, phrase: usize) -> BasicPhrase {
    BasicPhrase {
      dependency,
      features,
      phrase,
      morphemes: vec![],
    }
  }
  pub fn target(&self) -> Option<usize> {
    self.dependency.target
  }
  pub fn is_coordination(&self) -> bool {
    self.dependency.is_coordination()
  }
  pub fn is_predicate(&self) -> bool {
    self.features.is_predicate()
  }
}

impl fmt::Display for Phrase {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{} {:?} {}", self.dependency, self.basics, self.features)
  }
}

impl fmt::Display for BasicPhrase {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{} {} {:?} {}",
      self.dependency, self.phrase, self.morphemes, self.features
    )
  }
}
