use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DependencyErr {
  #[error("invalid dependency header `{0}`")]
  InvalidHeaderErr(String),
  #[error("`{0}` is invalid relation type")]
  InvalidRelationTypeErr(char),
  #[error("{0}")]
  ParseIntError(#[from] ParseIntError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationType {
  /// `D`: plain head-dependent relation.
  Dependency,
  /// `P`: coordination.
  Parallel,
  /// `A`: apposition.
  Apposition,
  /// `I`: partial coordination.
  PartialParallel,
}

impl RelationType {
  pub fn from_char(c: char) -> Result<RelationType, DependencyErr> {
    match c {
      'D' => Ok(RelationType::Dependency),
      'P' => Ok(RelationType::Parallel),
      'A' => Ok(RelationType::Apposition),
      'I' => Ok(RelationType::PartialParallel),
      _ => Err(DependencyErr::InvalidRelationTypeErr(c)),
    }
  }
  pub fn as_char(self) -> char {
    match self {
      RelationType::Dependency => 'D',
      RelationType::Parallel => 'P',
      RelationType::Apposition => 'A',
      RelationType::PartialParallel => 'I',
    }
  }
}

/// The `<target><type>` header of a `*` or `+` line. A target of `-1`
/// (the sentence root) is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
  pub target: Option<usize>,
  pub relation_type: RelationType,
}

impl Dependency {
  pub fn from_header(head: &str) -> Result<Dependency, DependencyErr> {
    let token = head
      .split_whitespace()
      .nth(1)
      .ok_or_else(|| DependencyErr::InvalidHeaderErr(head.to_string()))?;
    let c = token
      .chars()
      .last()
      .ok_or_else(|| DependencyErr::InvalidHeaderErr(head.to_string()))?;
    let relation_type = RelationType::from_char(c)?;
    let target: i64 = token[..token.len() - c.len_utf8()].parse()?;
    Ok(Dependency {
      target: if target < 0 { None } else { Some(target as usize) },
      relation_type,
    })
  }
  pub fn is_coordination(&self) -> bool {
    self.relation_type == RelationType::Parallel
  }
}

impl fmt::Display for Dependency {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.target {
      Some(t) => write!(f, "{}{}", t, self.relation_type.as_char()),
      None => write!(f, "-1{}", self.relation_type.as_char()),
    }
  }
}
