use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Error as IOError, Read, Write};
use std::path::Path;

use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use serde_json::Error as SerdeError;
use thiserror::Error;

/// Alternation meaning "no suffix".
pub const EMPTY_ALTERNATION: &str = "*";

lazy_static! {
  static ref COMMENT: Regex = Regex::new(r";.*").unwrap();
  static ref TYPE_LINE: Regex = Regex::new(r"^\((\S+)").unwrap();
  static ref FORM_LINE: Regex = Regex::new(r"\s*\(?\(\S+\s+(.+?)\s*\)").unwrap();
}

#[derive(Error, Debug)]
pub enum InflectionTableErr {
  #[error("{0}")]
  IOError(#[from] IOError),
  #[error("{0}")]
  SerdeError(#[from] SerdeError),
  #[error("inflection form before any inflection type at line {0}")]
  FormBeforeTypeErr(usize),
}

type Forms = BTreeMap<u32, Vec<String>>;

/// Inflection type id -> inflection form id -> suffix alternations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InflectionTable {
  types: BTreeMap<u32, Forms>,
}

impl InflectionTable {
  pub fn insert(&mut self, type_id: u32, form_id: u32, alternations: &[&str]) {
    let entry = self
      .types
      .entry(type_id)
      .or_default()
      .entry(form_id)
      .or_default();
    for alternation in alternations {
      if !entry.iter().any(|a| a == alternation) {
        entry.push(alternation.to_string());
      }
    }
  }
  pub fn alternations(&self, type_id: u32, form_id: u32) -> Option<&[String]> {
    self
      .types
      .get(&type_id)
      .and_then(|forms| forms.get(&form_id))
      .map(|a| a.as_slice())
  }
  pub fn type_len(&self) -> usize {
    self.types.len()
  }
  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  /// Re-inflects `surface` from form `from` to form `to` of `type_id` by
  /// applying every (from, to) alternation pair in turn. `None` if either
  /// form is unknown.
  pub fn reinflect(&self, surface: &str, type_id: u32, from: u32, to: u32) -> Option<String> {
    let froms = self.alternations(type_id, from)?;
    let tos = self.alternations(type_id, to)?;
    let mut surface = surface.to_string();
    for frm in froms {
      for to in tos {
        if frm == EMPTY_ALTERNATION && to == EMPTY_ALTERNATION {
          continue;
        } else if frm == EMPTY_ALTERNATION {
          surface.push_str(to);
        } else if to == EMPTY_ALTERNATION {
          surface = surface.replace(frm.as_str(), "");
        } else {
          surface = surface.replace(frm.as_str(), to);
        }
      }
    }
    Some(surface)
  }

  /// Reads the tagger's inflection definition source. Every `(NAME` line
  /// opens the next type id and every `(FORM alt...)` line under it the next
  /// form id, both counted from 1.
  pub fn from_katuyou_reader<R: BufRead>(reader: R) -> Result<InflectionTable, InflectionTableErr> {
    let mut table = InflectionTable::default();
    let mut type_id = 0;
    let mut form_id = 0;
    for (i, line) in reader.lines().enumerate() {
      let line = line?;
      let line = COMMENT.replace(&line, "");
      if TYPE_LINE.is_match(&line) {
        type_id += 1;
        form_id = 0;
        table.types.entry(type_id).or_default();
        continue;
      }
      if let Some(caps) = FORM_LINE.captures(&line) {
        if type_id == 0 {
          return Err(InflectionTableErr::FormBeforeTypeErr(i + 1));
        }
        form_id += 1;
        let alternations: Vec<&str> = caps[1].split_whitespace().collect();
        table.insert(type_id, form_id, &alternations);
      }
    }
    info!("{} inflection types", table.type_len());
    Ok(table)
  }
  pub fn from_katuyou_path<P: AsRef<Path>>(path: P) -> Result<InflectionTable, InflectionTableErr> {
    InflectionTable::from_katuyou_reader(BufReader::new(File::open(path)?))
  }

  pub fn from_json_reader<R: Read>(reader: R) -> Result<InflectionTable, InflectionTableErr> {
    let types = serde_json::from_reader(reader)?;
    Ok(InflectionTable { types })
  }
  pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<InflectionTable, InflectionTableErr> {
    InflectionTable::from_json_reader(BufReader::new(File::open(path)?))
  }
  pub fn write_json<W: Write>(&self, writer: W) -> Result<(), InflectionTableErr> {
    serde_json::to_writer(writer, &self.types)?;
    Ok(())
  }
}
