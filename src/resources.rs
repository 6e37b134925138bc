use std::fs::{create_dir_all, File};
use std::io::{Error as IOError, Write};
use std::path::Path;

pub fn write_grammarize_json<P: AsRef<Path>>(path: P) -> Result<(), IOError> {
  let path = path.as_ref();
  if !path.exists() {
    if let Some(p) = path.parent() {
      if !p.exists() {
        create_dir_all(p)?;
      }
    }
    File::create(path)?.write_all(GRAMMARIZE_JSON.as_bytes())
  } else {
    Ok(())
  }
}

pub const GRAMMARIZE_JSON: &str = r#"
{
  "jumanCommand" : ["juman"],
  "knpCommand" : ["knp", "-dpnd-fast", "-tab"],
  "inflectionTable" : "katuyou.json",
  "minOpenClasses" : 4,
  "minHeadlineMorphemes" : 6,
  "headlineSeparators" : ["　", "ーー"],
  "scoring" : {
    "window" : 2,
    "punctuationLemma" : "、",
    "punctuationWeight" : 0.1
  },
  "substitution" : {
    "minGap" : 2
  }
}
"#;
