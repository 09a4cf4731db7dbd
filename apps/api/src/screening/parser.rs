//! Heuristic CV field extraction from raw resume text.
//!
//! Runs after upload as a best-effort enrichment: contact details via
//! regex, skills via the tech keyword set, education/experience via
//! section-header scanning.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::screening::keywords::tech_keyword_set;
use crate::screening::tokenizer::tokenize;

#[derive(Debug, Clone, Serialize)]
pub struct ParsedCv {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Distinct tech keywords found in the text, comma-joined.
    pub skills: String,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub parsed_at: DateTime<Utc>,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap()
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\+84|0)[0-9]{9,10}").unwrap())
}

fn name_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z\s]+$").unwrap())
}

/// Extracts structured fields from raw CV text. Pure and infallible; a
/// field the heuristics cannot find is simply `None`.
pub fn parse_cv(raw_text: &str) -> ParsedCv {
    ParsedCv {
        full_name: extract_name(raw_text),
        email: extract_first(raw_text, email_regex()),
        phone: extract_first(raw_text, phone_regex()),
        skills: extract_skills(raw_text),
        education: extract_section(raw_text, &["education", "academic", "university", "degree"]),
        experience: extract_section(raw_text, &["experience", "work", "project", "internship"]),
        parsed_at: Utc::now(),
    }
}

fn extract_first(text: &str, re: &Regex) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}

/// The candidate name is usually one of the first short lines: all
/// letters, no digits, no email marker.
fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| l.len() > 2 && l.len() < 50)
        .take(5)
        .find(|l| !l.contains('@') && !l.chars().any(|c| c.is_ascii_digit()) && name_line_regex().is_match(l))
        .map(str::to_string)
}

fn extract_skills(text: &str) -> String {
    let keyword_set = tech_keyword_set();
    let mut seen = std::collections::HashSet::new();
    let mut skills = Vec::new();

    for token in tokenize(text) {
        if keyword_set.contains(token.as_str()) && seen.insert(token.clone()) {
            skills.push(token);
        }
    }
    skills.join(", ")
}

/// Finds the first line containing any section header keyword and joins up
/// to 10 following non-empty lines.
fn extract_section(text: &str, header_keywords: &[&str]) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let lowered = line.to_lowercase();
        if header_keywords.iter().any(|k| lowered.contains(k)) {
            let section: Vec<&str> = lines[i + 1..]
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .take(10)
                .collect();
            return Some(section.join(" | "));
        }
    }
    None
}
