use std::fs::File;
use std::io::{BufReader, Error as IOError, Read};
use std::path::{Path, PathBuf};

use serde_json::{error::Error as SerdeError, Value};
use thiserror::Error;

use super::alignment::ScoringParams;
use super::compressor::SubstitutionParams;
use super::resources;

#[derive(Error, Debug)]
pub enum ConfigErr {
  #[error("{self:?}")]
  IOError(#[from] IOError),
  #[error("{self:?}")]
  SerdeError(#[from] SerdeError),
  #[error("`{0}` has an invalid value in setting file")]
  InvalidValueErr(String),
  #[error("`{0}` not defined in setting file")]
  NotDefinedErr(String),
}

#[derive(Debug)]
pub struct Config {
  pub settings: Value,
  defaults: Value,
  pub resource_dir: PathBuf,
}

impl Config {
  pub fn empty() -> Result<Config, ConfigErr> {
    Ok(Config {
      settings: Value::Null,
      defaults: serde_json::from_str(resources::GRAMMARIZE_JSON)?,
      resource_dir: PathBuf::from("."),
    })
  }
  /// Reads the setting file at `path`; without one only the built-in
  /// defaults apply. Relative paths in the settings are resolved against the
  /// setting file's directory.
  pub fn setup(path: Option<&str>) -> Result<Config, ConfigErr> {
    let mut config = Config::empty()?;
    if let Some(path) = path {
      let mut buf = String::new();
      BufReader::new(File::open(path)?).read_to_string(&mut buf)?;
      config.settings = serde_json::from_str(&buf)?;
      if let Some(dir) = Path::new(path).parent() {
        config.resource_dir = dir.to_path_buf();
      }
    }
    Ok(config)
  }
  pub fn from_json_str(settings: &str) -> Result<Config, ConfigErr> {
    let mut config = Config::empty()?;
    config.settings = serde_json::from_str(settings)?;
    Ok(config)
  }

  fn get(&self, key: &str) -> Option<&Value> {
    self
      .settings
      .get(key)
      .or_else(|| self.defaults.get(key))
  }
  fn get_nested(&self, section: &str, key: &str) -> Option<&Value> {
    self
      .settings
      .get(section)
      .and_then(|s| s.get(key))
      .or_else(|| self.defaults.get(section).and_then(|s| s.get(key)))
  }
  fn strings(&self, key: &str) -> Result<Vec<String>, ConfigErr> {
    let invalid = || ConfigErr::InvalidValueErr(key.to_string());
    match self.get(key) {
      Some(Value::Array(arr)) => arr
        .iter()
        .map(|v| v.as_str().map(|s| s.to_string()).ok_or_else(invalid))
        .collect(),
      Some(_) => Err(invalid()),
      None => Err(ConfigErr::NotDefinedErr(key.to_string())),
    }
  }
  fn command(&self, key: &str) -> Result<Vec<String>, ConfigErr> {
    let command = self.strings(key)?;
    if command.is_empty() {
      return Err(ConfigErr::InvalidValueErr(key.to_string()));
    }
    Ok(command)
  }
  fn usize_of(value: Option<&Value>, key: &str) -> Result<usize, ConfigErr> {
    value
      .and_then(|v| v.as_u64())
      .map(|n| n as usize)
      .ok_or_else(|| ConfigErr::InvalidValueErr(key.to_string()))
  }

  pub fn juman_command(&self) -> Result<Vec<String>, ConfigErr> {
    self.command("jumanCommand")
  }
  pub fn knp_command(&self) -> Result<Vec<String>, ConfigErr> {
    self.command("knpCommand")
  }
  pub fn inflection_table_path(&self) -> Result<PathBuf, ConfigErr> {
    if let Some(Value::String(p)) = self.get("inflectionTable") {
      Ok(self.resource_dir.join(p))
    } else {
      Err(ConfigErr::NotDefinedErr(String::from("inflectionTable")))
    }
  }
  pub fn min_open_classes(&self) -> Result<usize, ConfigErr> {
    Config::usize_of(self.get("minOpenClasses"), "minOpenClasses")
  }
  pub fn min_headline_morphemes(&self) -> Result<usize, ConfigErr> {
    Config::usize_of(self.get("minHeadlineMorphemes"), "minHeadlineMorphemes")
  }
  pub fn headline_separators(&self) -> Result<Vec<String>, ConfigErr> {
    self.strings("headlineSeparators")
  }
  pub fn scoring_params(&self) -> Result<ScoringParams, ConfigErr> {
    let window = Config::usize_of(self.get_nested("scoring", "window"), "scoring.window")?;
    let punctuation_lemma = self
      .get_nested("scoring", "punctuationLemma")
      .and_then(|v| v.as_str())
      .ok_or_else(|| ConfigErr::InvalidValueErr(String::from("scoring.punctuationLemma")))?
      .to_string();
    let punctuation_weight = self
      .get_nested("scoring", "punctuationWeight")
      .and_then(|v| v.as_f64())
      .ok_or_else(|| ConfigErr::InvalidValueErr(String::from("scoring.punctuationWeight")))?;
    Ok(ScoringParams {
      window,
      punctuation_lemma,
      punctuation_weight,
    })
  }
  pub fn substitution_params(&self) -> Result<SubstitutionParams, ConfigErr> {
    let min_gap = Config::usize_of(
      self.get_nested("substitution", "minGap"),
      "substitution.minGap",
    )?;
    Ok(SubstitutionParams { min_gap })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs::{create_dir_all, remove_file};

  #[test]
  fn test_defaults() {
    let config = Config::empty().unwrap();
    assert_eq!(vec!["juman"], config.juman_command().unwrap());
    assert_eq!(
      vec!["knp", "-dpnd-fast", "-tab"],
      config.knp_command().unwrap()
    );
    assert_eq!(4, config.min_open_classes().unwrap());
    assert_eq!(6, config.min_headline_morphemes().unwrap());
    assert_eq!(vec!["　", "ーー"], config.headline_separators().unwrap());
    let scoring = config.scoring_params().unwrap();
    assert_eq!(2, scoring.window);
    assert_eq!("、", scoring.punctuation_lemma);
    assert!((scoring.punctuation_weight - 0.1).abs() < 1e-9);
    assert_eq!(2, config.substitution_params().unwrap().min_gap);
    assert_eq!(
      PathBuf::from("./katuyou.json"),
      config.inflection_table_path().unwrap()
    );
  }

  #[test]
  fn test_override() {
    let config = Config::from_json_str(
      r#"{"minOpenClasses": 3, "scoring": {"window": 3}, "jumanCommand": ["jumanpp"]}"#,
    )
    .unwrap();
    assert_eq!(3, config.min_open_classes().unwrap());
    assert_eq!(vec!["jumanpp"], config.juman_command().unwrap());
    let scoring = config.scoring_params().unwrap();
    assert_eq!(3, scoring.window);
    assert_eq!("、", scoring.punctuation_lemma);
  }

  #[test]
  fn test_invalid_values() {
    let config = Config::from_json_str(r#"{"minOpenClasses": "four", "knpCommand": []}"#).unwrap();
    assert!(config.min_open_classes().is_err());
    assert!(config.knp_command().is_err());
    let config = Config::from_json_str(r#"{"headlineSeparators": ["　", 1]}"#).unwrap();
    assert!(config.headline_separators().is_err());
  }

  #[test]
  fn test_setup_resolves_relative_paths() {
    let dir = std::env::temp_dir().join("grammarize_config_test");
    create_dir_all(&dir).unwrap();
    let path = dir.join("grammarize.json");
    let _ = remove_file(&path);
    resources::write_grammarize_json(&path).unwrap();
    let config = Config::setup(path.to_str()).unwrap();
    assert_eq!(dir.join("katuyou.json"), config.inflection_table_path().unwrap());
    assert_eq!(4, config.min_open_classes().unwrap());
    remove_file(&path).unwrap();
  }
}
