use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

/// The sub-record KNP emits for a case slot no argument was found for.
pub const UNREALIZED_SENTINEL: &str = "U/-/-/-/-";
const UNREALIZED_FLAG: &str = "U";
const SAME_SENTENCE_DISTANCE: &str = "0";

#[derive(Error, Debug)]
pub enum CaseAnalysisErr {
  #[error("invalid case analysis element `{0}`")]
  InvalidElementErr(String),
  #[error("{0}")]
  ParseIntError(#[from] ParseIntError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFiller {
  pub flag: String,
  pub expression: String,
  pub basic: usize,
  pub distance: String,
  pub sentence_id: i64,
}

impl CaseFiller {
  /// False for antecedents KNP found in a preceding sentence.
  pub fn is_in_same_sentence(&self) -> bool {
    self.distance == SAME_SENTENCE_DISTANCE
  }
}

/// Decoded `<格解析結果:...>`: the case frame followed by case label ->
/// fillers, in the order KNP listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseAnalysis {
  frame: String,
  cases: BTreeMap<String, Vec<CaseFiller>>,
}

impl CaseAnalysis {
  pub fn decode(value: &str) -> Result<CaseAnalysis, CaseAnalysisErr> {
    // "撮影/さつえい+する/する:動1:ガ/C/..." -> frame, elements
    let mut parts: Vec<&str> = value.splitn(3, ':').collect();
    let elements = parts.pop().unwrap_or("");
    let frame = parts.join(":");
    let mut cases: BTreeMap<String, Vec<CaseFiller>> = BTreeMap::new();
    for element in elements.split(';') {
      if element.is_empty() || element.contains(UNREALIZED_SENTINEL) {
        continue;
      }
      let cols: Vec<&str> = element.split('/').collect();
      if cols.len() < 6 {
        return Err(CaseAnalysisErr::InvalidElementErr(element.to_string()));
      }
      if cols[1] == UNREALIZED_FLAG {
        continue;
      }
      let filler = CaseFiller {
        flag: cols[1].to_string(),
        expression: cols[2].to_string(),
        basic: cols[3].parse()?,
        distance: cols[4].to_string(),
        sentence_id: cols[5].parse()?,
      };
      cases.entry(cols[0].to_string()).or_default().push(filler);
    }
    Ok(CaseAnalysis { frame, cases })
  }
  pub fn frame(&self) -> &str {
    &self.frame
  }
  pub fn fillers(&self, case: &str) -> &[CaseFiller] {
    self.cases.get(case).map(|v| v.as_slice()).unwrap_or(&[])
  }
  /// The basic phrase realizing `case`, taken from the last listed filler.
  pub fn last_filler_basic(&self, case: &str) -> Option<usize> {
    self.fillers(case).last().map(|f| f.basic)
  }
  /// Like `last_filler_basic`, but `None` when the last filler lies in
  /// another sentence.
  pub fn last_local_filler_basic(&self, case: &str) -> Option<usize> {
    self
      .fillers(case)
      .last()
      .filter(|f| f.is_in_same_sentence())
      .map(|f| f.basic)
  }
  pub fn cases(&self) -> impl Iterator<Item = &str> {
    self.cases.keys().map(|k| k.as_str())
  }
}

impl fmt::Display for CaseAnalysis {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let elements: Vec<String> = self
      .cases
      .iter()
      .flat_map(|(case, fillers)| {
        fillers.iter().map(move |e| {
          format!(
            "{}/{}/{}/{}/{}/{}",
            case, e.flag, e.expression, e.basic, e.distance, e.sentence_id
          )
        })
      })
      .collect();
    if self.frame.is_empty() {
      write!(f, "{}", elements.join(";"))
    } else {
      write!(f, "{}:{}", self.frame, elements.join(";"))
    }
  }
}
