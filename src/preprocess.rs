use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

const HALF_WIDTH_SYMBOLS: &str = " ()~=*+[{|}>,<];!:?&%\"-/";
const FULL_WIDTH_SYMBOLS: &str = "　（）〜＝＊＋［｛｜｝〉，〈］；！：？＆％、ー／";

lazy_static! {
  /// A leading bullet, parenthesised asides, bracketed bylines and `=...=`
  /// captions.
  static ref DELETE_PATTERN: Regex = Regex::new(r"^◇|(?:\(.*?\)|【.*?】)|=[^。]*?=").unwrap();
  /// Unclosed photo captions, keeping their trailing punctuation.
  static ref CAPTION_PATTERN: Regex =
    Regex::new(r"=写真[^=、。]*?([、。])|=写真、[^=。]*?(?:撮影|提供)([、。])").unwrap();
  static ref FULL_WIDTH_MAP: HashMap<char, char> = {
    let mut map: HashMap<char, char> = HALF_WIDTH_SYMBOLS
      .chars()
      .zip(FULL_WIDTH_SYMBOLS.chars())
      .collect();
    for c in ('A'..='Z').chain('a'..='z').chain('0'..='9') {
      // the full-width forms sit at a fixed offset in U+FF00
      if let Some(full) = std::char::from_u32(c as u32 + 0xFEE0) {
        map.insert(c, full);
      }
    }
    map
  };
}

/// Normalizes a news sentence or headline before tagging.
pub fn preprocess_sentence(text: &str) -> String {
  let text = DELETE_PATTERN.replace_all(text, "");
  let text = CAPTION_PATTERN.replace_all(&text, "$1$2");
  text
    .chars()
    .map(|c| *FULL_WIDTH_MAP.get(&c).unwrap_or(&c))
    .collect()
}

/// Splits a preprocessed headline at each separator in turn.
pub fn headline_segments<S: AsRef<str>>(headline: &str, separators: &[S]) -> Vec<String> {
  let mut segments = vec![headline.to_string()];
  for separator in separators {
    segments = segments
      .iter()
      .flat_map(|s| s.split(separator.as_ref()))
      .map(|s| s.to_string())
      .collect();
  }
  segments
}
