// src/analysis/analyzer.rs
use super::lexicon::AnalysisLexicon;
use super::{EducationSignal, ExperienceSignal, ResumeAnalysis, SkillMatches};

const MIN_CONTENT_CHARS: usize = 1000;
const MIN_TECHNICAL_SKILLS: usize = 5;
const MIN_SOFT_SKILLS: usize = 3;

const TECHNICAL_SKILL_POINTS: u32 = 3;
const TECHNICAL_SKILL_CAP: u32 = 30;
const SOFT_SKILL_POINTS: u32 = 2;
const SOFT_SKILL_CAP: u32 = 10;
const EDUCATION_POINTS: u32 = 30;
const EXPERIENCE_POINTS: u32 = 30;

/// Keyword-driven resume assessment. A pure function of the input text and
/// the configured lexicon: no I/O, no shared state, safe to call from any
/// number of concurrent requests.
pub struct ResumeAnalyzer {
    lexicon: AnalysisLexicon,
}

impl ResumeAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: AnalysisLexicon::builtin(),
        }
    }

    pub fn with_lexicon(lexicon: AnalysisLexicon) -> Self {
        Self { lexicon }
    }

    /// Run the full pipeline: skills, education and experience signals,
    /// suggestions, score.
    pub fn analyze(&self, content: &str) -> ResumeAnalysis {
        let skills = self.extract_skills(content);
        let education = self.detect_education(content);
        let experience = self.detect_experience(content);
        let suggestions = self.generate_suggestions(content, &skills);
        let score = self.calculate_score(&skills, &education, &experience);

        ResumeAnalysis {
            skills,
            education,
            experience,
            suggestions,
            score,
        }
    }

    /// Case-insensitive substring match against both vocabularies. Output
    /// preserves vocabulary order; each term is tested at most once.
    fn extract_skills(&self, content: &str) -> SkillMatches {
        let haystack = content.to_lowercase();

        let technical = self
            .lexicon
            .technical_skills
            .iter()
            .filter(|skill| haystack.contains(&skill.to_lowercase()))
            .cloned()
            .collect();

        let soft = self
            .lexicon
            .soft_skills
            .iter()
            .filter(|skill| haystack.contains(&skill.to_lowercase()))
            .cloned()
            .collect();

        SkillMatches { technical, soft }
    }

    /// Presence test only; no attempt to extract degrees or institutions
    fn detect_education(&self, content: &str) -> EducationSignal {
        let detected = self
            .lexicon
            .education_keywords
            .iter()
            .any(|keyword| content.contains(keyword.as_str()));

        let level = if detected {
            "Education background detected"
        } else {
            "No education background detected"
        };

        EducationSignal {
            detected,
            level: level.to_string(),
            details: "Detailed education history requires deeper parsing".to_string(),
        }
    }

    fn detect_experience(&self, content: &str) -> ExperienceSignal {
        let detected = self
            .lexicon
            .experience_keywords
            .iter()
            .any(|keyword| content.contains(keyword.as_str()));

        let years = if detected {
            "Years of experience require deeper parsing"
        } else {
            "No work experience detected"
        };

        ExperienceSignal {
            detected,
            years: years.to_string(),
            details: "Detailed work history requires deeper parsing".to_string(),
        }
    }

    /// Fixed rule list, evaluated in order; every rule fires independently
    fn generate_suggestions(&self, content: &str, skills: &SkillMatches) -> Vec<String> {
        let mut suggestions = Vec::new();

        if content.chars().count() < MIN_CONTENT_CHARS {
            suggestions
                .push("Resume content is short; add more detail about your background".to_string());
        }

        if skills.technical.len() < MIN_TECHNICAL_SKILLS {
            suggestions
                .push("Few technical skills detected; list more relevant technologies".to_string());
        }

        if skills.soft.len() < MIN_SOFT_SKILLS {
            suggestions.push(
                "Few soft skills detected; show collaboration and communication strengths"
                    .to_string(),
            );
        }

        if !has_quantified_metric(content) {
            suggestions.push(
                "No quantified achievements found; add concrete numbers to show impact"
                    .to_string(),
            );
        }

        let has_action_verbs = self
            .lexicon
            .action_verbs
            .iter()
            .any(|verb| content.contains(verb.as_str()));
        if !has_action_verbs {
            suggestions.push(
                "No action-oriented language found; start achievements with strong verbs"
                    .to_string(),
            );
        }

        suggestions
    }

    /// Weighted sum, clamped per component; always lands in [0, 100]
    fn calculate_score(
        &self,
        skills: &SkillMatches,
        education: &EducationSignal,
        experience: &ExperienceSignal,
    ) -> u32 {
        let mut score = 0;

        score += (skills.technical.len() as u32 * TECHNICAL_SKILL_POINTS).min(TECHNICAL_SKILL_CAP);
        score += (skills.soft.len() as u32 * SOFT_SKILL_POINTS).min(SOFT_SKILL_CAP);

        if education.detected {
            score += EDUCATION_POINTS;
        }
        if experience.detected {
            score += EXPERIENCE_POINTS;
        }

        score
    }
}

impl Default for ResumeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// True when the text contains a digit immediately followed by `%`, `次`
/// or `个`
fn has_quantified_metric(content: &str) -> bool {
    let mut prev_is_digit = false;
    for c in content.chars() {
        if prev_is_digit && matches!(c, '%' | '次' | '个') {
            return true;
        }
        prev_is_digit = c.is_ascii_digit();
    }
    false
}
