// src/analysis/mod.rs
use serde::{Deserialize, Serialize};

pub mod analyzer;
pub mod lexicon;

pub use analyzer::ResumeAnalyzer;
pub use lexicon::AnalysisLexicon;

/// Structured assessment of one resume, produced by [`ResumeAnalyzer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub skills: SkillMatches,
    pub education: EducationSignal,
    pub experience: ExperienceSignal,
    pub suggestions: Vec<String>,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatches {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationSignal {
    pub detected: bool,
    pub level: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSignal {
    pub detected: bool,
    pub years: String,
    pub details: String,
}
