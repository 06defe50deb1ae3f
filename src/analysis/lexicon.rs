// src/analysis/lexicon.rs
//! Keyword vocabularies driving the analysis pipeline, kept as data so they
//! can be swapped without touching the pipeline itself.

const TECHNICAL_SKILLS: &[&str] = &[
    "JavaScript",
    "Python",
    "Java",
    "C++",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "Spring",
    "SQL",
    "NoSQL",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "CI/CD",
    "Git",
    "Machine Learning",
    "Data Science",
    "AI",
    "Deep Learning",
    "TensorFlow",
    "PyTorch",
    "NLP",
    "Computer Vision",
];

const SOFT_SKILLS: &[&str] = &[
    "团队协作",
    "沟通",
    "领导力",
    "解决问题",
    "时间管理",
    "项目管理",
    "批判性思维",
    "创新",
    "适应性",
    "灵活性",
    "自我激励",
    "分析思维",
];

const EDUCATION_KEYWORDS: &[&str] = &["大学", "学院", "学士", "硕士", "博士", "MBA", "学位"];

const EXPERIENCE_KEYWORDS: &[&str] =
    &["经验", "工作", "职位", "项目", "负责", "开发", "管理", "实习"];

const ACTION_VERBS: &[&str] = &[
    "开发", "设计", "实现", "领导", "管理", "创建", "优化", "提高", "减少", "解决",
];

/// The reference vocabularies for skill extraction, signal detection and
/// suggestion rules. Each list is ordered; match output preserves that order.
#[derive(Debug, Clone)]
pub struct AnalysisLexicon {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub education_keywords: Vec<String>,
    pub experience_keywords: Vec<String>,
    pub action_verbs: Vec<String>,
}

impl AnalysisLexicon {
    pub fn builtin() -> Self {
        Self {
            technical_skills: owned(TECHNICAL_SKILLS),
            soft_skills: owned(SOFT_SKILLS),
            education_keywords: owned(EDUCATION_KEYWORDS),
            experience_keywords: owned(EXPERIENCE_KEYWORDS),
            action_verbs: owned(ACTION_VERBS),
        }
    }
}

impl Default for AnalysisLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|term| term.to_string()).collect()
}
