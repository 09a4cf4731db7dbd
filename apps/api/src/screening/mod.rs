//! CV-to-job matching: tokenization, TF-IDF weighting, cosine scoring,
//! plus the upload/parse workflow that feeds the engine.

pub mod engine;
pub mod extract;
pub mod handlers;
pub mod keywords;
pub mod parser;
pub mod similarity;
pub mod tokenizer;
pub mod vectorizer;
