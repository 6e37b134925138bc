//! ```no_run
//! use grammarize::prelude::*;
//!
//! // JUMAN and KNP must be on the PATH and `katuyou.json` must have been
//! // built with `grammarize katuyou`.
//! let config = Config::setup(None).unwrap();
//! let session = AnalyzerSession::setup(&config).unwrap();
//! let mut grammarizer = Grammarizer::setup(session, &config).unwrap();
//!
//! let headline = "オーロラ展:野口宇宙飛行士らが宇宙で撮影 東京・新宿で5日から";
//! let sentence = "野口聡一宇宙飛行士(45)らが国際宇宙ステーションから撮影したオーロラの写真を中心とした「宇宙から見たオーロラ展2011」が5~31日、東京都新宿区新宿3のコニカミノルタプラザ(03・3225・5001)で開かれる。";
//!
//! if let Some(compression) = grammarizer.grammarize(headline, sentence).unwrap() {
//!     println!("{}", compression.text);
//!     // => 野口聡一宇宙飛行士らが国際宇宙で撮影したオーロラの写真を中心としたオーロラ展２０１１が５〜３１日、東京都新宿区新宿３のコニカミノルタプラザで開かれる
//!     println!("{}", compression.alignment_string());
//!     // => 0-0 1-1 2-2 ...
//! }
//! ```

#![crate_name = "grammarize"]
#![crate_type = "lib"]
#![crate_type = "rlib"]

pub mod alignment;
pub mod analyzer;
pub mod compressor;
pub mod config;
pub mod corpus;
pub mod grammarizer;
pub mod inflection_table;
pub mod juman;
pub mod knp;
pub mod minimal_tree;
pub mod preprocess;
pub mod resources;

#[cfg(test)]
mod test_utils;

pub mod prelude {
  pub use crate::analyzer::{Analyze, AnalyzerSession};
  pub use crate::compressor::Compression;
  pub use crate::config::Config;
  pub use crate::grammarizer::Grammarizer;
  pub use crate::inflection_table::InflectionTable;
}
