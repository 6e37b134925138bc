use std::fs::File;
use std::io::{BufRead, BufReader, Error as IOError};
use std::path::Path;

use lazy_static::lazy_static;
use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use thiserror::Error;

const TITLE_TAG: &[u8] = b"TITLE";
const TEXT_TAG: &[u8] = b"TEXT";

lazy_static! {
  /// One Japanese sentence, quotations included.
  static ref SENTENCE_PATTERN: Regex = Regex::new(r"([^。「」]*?「.*?」)*[^。「」]*?。").unwrap();
}

#[derive(Error, Debug)]
pub enum CorpusErr {
  #[error("{self:?}")]
  IOError(#[from] IOError),
  #[error("{0} at byte {1}")]
  XmlError(quick_xml::Error, u64),
}

/// A headline and the first sentence of its article.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
  pub title: String,
  pub sentence: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
  Title,
  Text,
}

/// The first sentence found on any line of `text`.
pub fn first_sentence(text: &str) -> Option<&str> {
  text
    .lines()
    .filter_map(|line| SENTENCE_PATTERN.find(line))
    .map(|m| m.as_str())
    .next()
}

/// Iterates the articles of a news archive made of `<DOC>` elements with
/// `<TITLE>` and `<TEXT>` children.
pub struct CorpusReader<R: BufRead> {
  reader: Reader<R>,
  buf: Vec<u8>,
  field: Option<Field>,
  title: String,
  text: String,
  done: bool,
}

impl CorpusReader<BufReader<File>> {
  pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CorpusReader<BufReader<File>>, CorpusErr> {
    Ok(CorpusReader::new(BufReader::new(File::open(path)?)))
  }
}

impl<R: BufRead> CorpusReader<R> {
  pub fn new(reader: R) -> CorpusReader<R> {
    CorpusReader {
      reader: Reader::from_reader(reader),
      buf: vec![],
      field: None,
      title: String::new(),
      text: String::new(),
      done: false,
    }
  }

  fn next_article(&mut self) -> Result<Option<Article>, CorpusErr> {
    loop {
      self.buf.clear();
      let event = match self.reader.read_event_into(&mut self.buf) {
        Ok(e) => e,
        Err(e) => return Err(CorpusErr::XmlError(e, self.reader.buffer_position() as u64)),
      };
      match event {
        Event::Start(e) => {
          self.field = match e.name().as_ref() {
            TITLE_TAG => {
              self.title.clear();
              Some(Field::Title)
            }
            TEXT_TAG => {
              self.text.clear();
              Some(Field::Text)
            }
            _ => None,
          };
        }
        Event::Text(e) => {
          let text = match e.unescape() {
            Ok(t) => t.into_owned(),
            Err(e) => return Err(CorpusErr::XmlError(e, self.reader.buffer_position() as u64)),
          };
          match self.field {
            Some(Field::Title) => self.title.push_str(&text),
            Some(Field::Text) => self.text.push_str(&text),
            None => (),
          }
        }
        Event::CData(e) => {
          let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
          match self.field {
            Some(Field::Title) => self.title.push_str(&text),
            Some(Field::Text) => self.text.push_str(&text),
            None => (),
          }
        }
        Event::End(e) => {
          self.field = None;
          if e.name().as_ref() == TEXT_TAG {
            let title = std::mem::take(&mut self.title);
            let sentence = first_sentence(&self.text).map(|s| s.to_string());
            match sentence {
              Some(sentence) if !title.is_empty() => {
                return Ok(Some(Article { title, sentence }));
              }
              _ => debug!("skipping article `{}`", title),
            }
          }
        }
        Event::Eof => return Ok(None),
        _ => (),
      }
    }
  }
}

impl<R: BufRead> Iterator for CorpusReader<R> {
  type Item = Result<Article, CorpusErr>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    match self.next_article() {
      Ok(Some(article)) => Some(Ok(article)),
      Ok(None) => {
        self.done = true;
        None
      }
      Err(e) => {
        self.done = true;
        Some(Err(e))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  const ARCHIVE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DOCS>
<DOC>
<TITLE>オーロラ展:野口宇宙飛行士らが宇宙で撮影</TITLE>
<TEXT>
 野口聡一宇宙飛行士らが撮影したオーロラ展が開かれる。入場無料。
</TEXT>
</DOC>
<DOC>
<TITLE>見出しだけ</TITLE>
</DOC>
<DOC>
<TITLE>首相:「改革進める」</TITLE>
<TEXT>
【東京】
 首相は「改革を進める。」と述べた。次の文。
</TEXT>
</DOC>
<DOC>
<TITLE>句点なし</TITLE>
<TEXT>句点のない本文</TEXT>
</DOC>
<DOC>
<TITLE>Q&amp;A</TITLE>
<TEXT><![CDATA[質問に答えた。]]></TEXT>
</DOC>
</DOCS>
"#;

  #[test]
  fn test_first_sentence() {
    assert_eq!(Some("今日は晴れ。"), first_sentence("今日は晴れ。明日は雨。"));
    assert_eq!(
      Some("彼は「行く。」と言った。"),
      first_sentence("彼は「行く。」と言った。")
    );
    assert_eq!(Some("二行目。"), first_sentence("一行目\n二行目。"));
    assert_eq!(None, first_sentence("句点なし"));
  }

  #[test]
  fn test_read_articles() {
    let articles: Vec<Article> = CorpusReader::new(Cursor::new(ARCHIVE))
      .collect::<Result<_, _>>()
      .unwrap();
    assert_eq!(3, articles.len());
    assert_eq!("オーロラ展:野口宇宙飛行士らが宇宙で撮影", articles[0].title);
    assert_eq!(
      " 野口聡一宇宙飛行士らが撮影したオーロラ展が開かれる。",
      articles[0].sentence
    );
    assert_eq!(" 首相は「改革を進める。」と述べた。", articles[1].sentence);
    assert_eq!("Q&A", articles[2].title);
    assert_eq!("質問に答えた。", articles[2].sentence);
  }

  #[test]
  fn test_malformed_archive() {
    let mut reader = CorpusReader::new(Cursor::new("<DOC><TITLE>見出し</DOC>"));
    assert!(reader.next().unwrap().is_err());
    assert!(reader.next().is_none());
  }
}
