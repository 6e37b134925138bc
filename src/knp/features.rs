use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use super::case_analysis::{CaseAnalysis, CaseAnalysisErr};

pub const CASE_ANALYSIS_KEY: &str = "格解析結果";
pub const PREDICATE_KEY: &str = "用言";
pub const INFLECTABLE_KEY: &str = "活用語";

lazy_static! {
  static ref FEATURE_PATTERN: Regex = Regex::new(r"<([^<>]*)>").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureValue {
  Flag,
  Value(String),
}

/// The predicate category carried by `<用言:...>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateType {
  Verb,
  Adjective,
  Copula,
  Other,
}

impl PredicateType {
  fn from_value(value: &str) -> PredicateType {
    match value {
      "動" => PredicateType::Verb,
      "形" => PredicateType::Adjective,
      "判" => PredicateType::Copula,
      _ => PredicateType::Other,
    }
  }
  pub fn is_verbal_or_adjectival(self) -> bool {
    self == PredicateType::Verb || self == PredicateType::Adjective
  }
}

/// A decoded KNP feature list. Looking up an absent key is never an error;
/// `has` answers false and `get` answers `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
  map: BTreeMap<String, FeatureValue>,
  case_analysis: Option<CaseAnalysis>,
}

impl Features {
  pub fn has(&self, key: &str) -> bool {
    self.map.contains_key(key)
  }
  pub fn get(&self, key: &str) -> Option<&str> {
    match self.map.get(key) {
      Some(FeatureValue::Value(v)) => Some(v),
      _ => None,
    }
  }
  pub fn insert_flag<S: Into<String>>(&mut self, key: S) {
    self.map.insert(key.into(), FeatureValue::Flag);
  }
  pub fn insert_value<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
    self.map.insert(key.into(), FeatureValue::Value(value.into()));
  }
  pub fn len(&self) -> usize {
    self.map.len() + self.case_analysis.iter().count()
  }
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
  pub fn case_analysis(&self) -> Option<&CaseAnalysis> {
    self.case_analysis.as_ref()
  }
  pub fn predicate_type(&self) -> Option<PredicateType> {
    match self.map.get(PREDICATE_KEY) {
      Some(FeatureValue::Value(v)) => Some(PredicateType::from_value(v)),
      Some(FeatureValue::Flag) => Some(PredicateType::Other),
      None => None,
    }
  }
  pub fn is_predicate(&self) -> bool {
    self.has(PREDICATE_KEY)
  }
  pub fn is_inflectable(&self) -> bool {
    self.has(INFLECTABLE_KEY)
  }
  /// Re-encodes the features as raw annotation tokens, flags bare and
  /// everything else as `key:value`.
  pub fn to_tokens(&self) -> Vec<String> {
    let mut tokens: Vec<String> = self
      .map
      .iter()
      .map(|(k, v)| match v {
        FeatureValue::Flag => k.clone(),
        FeatureValue::Value(v) => format!("{}:{}", k, v),
      })
      .collect();
    if let Some(case_analysis) = &self.case_analysis {
      tokens.push(format!("{}:{}", CASE_ANALYSIS_KEY, case_analysis));
    }
    tokens
  }
}

impl fmt::Display for Features {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{{{}}}", self.to_tokens().join(", "))
  }
}

pub fn decode_features<I, S>(tokens: I) -> Result<Features, CaseAnalysisErr>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut features = Features::default();
  for token in tokens {
    let token = token.as_ref();
    if token.is_empty() {
      continue;
    }
    match token.find(':') {
      Some(p) => {
        let (key, value) = (&token[..p], &token[p + 1..]);
        if key == CASE_ANALYSIS_KEY {
          features.case_analysis = Some(CaseAnalysis::decode(value)?);
        } else {
          features.insert_value(key, value);
        }
      }
      None => features.insert_flag(token),
    }
  }
  Ok(features)
}

/// Splits a line into the part before its first `<` and the contents of
/// every `<...>` annotation after it.
pub fn split_annotations(line: &str) -> (&str, Vec<&str>) {
  match line.find('<') {
    Some(p) => {
      let tokens = FEATURE_PATTERN
        .captures_iter(&line[p..])
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();
      (&line[..p], tokens)
    }
    None => (line, vec![]),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_absent_key_is_false() {
    let features = decode_features(vec!["体言", "係:ガ格"]).unwrap();
    assert!(features.has("体言"));
    assert!(!features.has("用言"));
    assert_eq!(None, features.get("用言"));
    assert_eq!(None, features.get("体言"));
    assert_eq!(Some("ガ格"), features.get("係"));
    assert_eq!(None, features.predicate_type());
  }

  #[test]
  fn test_predicate_type() {
    let features = decode_features(vec!["用言:動"]).unwrap();
    assert_eq!(Some(PredicateType::Verb), features.predicate_type());
    assert!(features.is_predicate());
    let features = decode_features(vec!["用言:判"]).unwrap();
    assert!(!features.predicate_type().unwrap().is_verbal_or_adjectival());
  }

  #[test]
  fn test_value_keeps_later_colons() {
    let features = decode_features(vec!["正規化代表表記:撮影/さつえい+する/する"]).unwrap();
    assert_eq!(
      Some("撮影/さつえい+する/する"),
      features.get("正規化代表表記")
    );
  }

  #[test]
  fn test_round_trip() {
    let line = "* 2D <BGH:写真/しゃしん><ヲ><助詞><体言><係:ヲ格><格解析結果:撮影/さつえい+する/する:動1:ガ/C/宇宙飛行士/1/0/1;ヲ/U/-/-/-/-;カラ/C/ステーション/4/0/1>";
    let (_, tokens) = split_annotations(line);
    let features = decode_features(&tokens).unwrap();
    let again = decode_features(features.to_tokens()).unwrap();
    assert_eq!(features, again);
    let mut expected: Vec<String> = tokens
      .iter()
      .filter(|t| !t.starts_with(CASE_ANALYSIS_KEY))
      .map(|t| t.to_string())
      .collect();
    let mut actual: Vec<String> = again
      .to_tokens()
      .into_iter()
      .filter(|t| !t.starts_with(CASE_ANALYSIS_KEY))
      .collect();
    expected.sort();
    actual.sort();
    assert_eq!(expected, actual);
  }

  #[test]
  fn test_split_annotations() {
    let (head, tokens) = split_annotations("+ -1D <文末><用言:動>");
    assert_eq!("+ -1D ", head);
    assert_eq!(vec!["文末", "用言:動"], tokens);
    let (head, tokens) = split_annotations("* 3P");
    assert_eq!("* 3P", head);
    assert!(tokens.is_empty());
  }
}
