// src/cover_letters.rs
use crate::database::{Job, User};
use anyhow::Result;
use std::collections::HashMap;

/// One generation template. Bodies carry `{{placeholder}}` variables filled
/// at render time.
#[derive(Debug, Clone)]
pub struct CoverLetterTemplate {
    pub id: &'static str,
    pub description: &'static str,
    body: &'static str,
}

const TEMPLATES: &[CoverLetterTemplate] = &[
    CoverLetterTemplate {
        id: "standard",
        description: "Balanced tone for most applications",
        body: "{{date}}\n\nDear Hiring Manager,\n\nI am writing to apply for the \
{{job_title}} position at {{company}}. My background in {{skills}} aligns closely \
with the responsibilities described in your posting, and I believe I can contribute \
from day one.\n\nI would welcome the opportunity to discuss how my experience can \
support your team.\n\nSincerely,\n{{applicant_name}}\n{{applicant_email}}\n",
    },
    CoverLetterTemplate {
        id: "enthusiastic",
        description: "High-energy tone for companies you admire",
        body: "{{date}}\n\nDear Hiring Manager,\n\nI was thrilled to see the \
{{job_title}} opening at {{company}}. I have followed your work for some time, and \
the chance to bring my experience with {{skills}} to your team is exactly the \
challenge I am looking for.\n\nI would love to talk about what we could build \
together.\n\nWith enthusiasm,\n{{applicant_name}}\n{{applicant_email}}\n",
    },
    CoverLetterTemplate {
        id: "professional",
        description: "Formal tone emphasizing track record",
        body: "{{date}}\n\nDear Hiring Manager,\n\nPlease accept my application for \
the {{job_title}} role at {{company}}. Over the course of my career I have built \
measurable results with {{skills}}, and I am confident that record translates \
directly to the requirements of this position.\n\nThank you for your \
consideration.\n\nRespectfully,\n{{applicant_name}}\n{{applicant_email}}\n",
    },
    CoverLetterTemplate {
        id: "technical",
        description: "Skill-forward tone for engineering roles",
        body: "{{date}}\n\nDear Hiring Manager,\n\nI am applying for the \
{{job_title}} position at {{company}}. My core toolkit includes {{skills}}, and I \
keep it current by shipping production systems and following the field closely. \
The technical scope of this role is a strong match for that experience.\n\nI look \
forward to discussing the details.\n\nBest regards,\n{{applicant_name}}\n\
{{applicant_email}}\n",
    },
    CoverLetterTemplate {
        id: "creative",
        description: "Informal tone for design-led teams",
        body: "{{date}}\n\nHello!\n\nImagine adding someone to your {{job_title}} \
search who pairs hands-on experience with {{skills}} with genuine excitement for \
what {{company}} is building. That is the application you are reading right \
now.\n\nI would be delighted to share more ideas in person.\n\nCreatively yours,\n\
{{applicant_name}}\n{{applicant_email}}\n",
    },
];

/// Renders cover letters from the built-in template set
pub struct CoverLetterGenerator;

impl CoverLetterGenerator {
    pub fn template_ids() -> Vec<&'static str> {
        TEMPLATES.iter().map(|template| template.id).collect()
    }

    pub fn find_template(template_id: &str) -> Option<&'static CoverLetterTemplate> {
        TEMPLATES.iter().find(|template| template.id == template_id)
    }

    /// Fill a template with the given variables. Unknown template ids are a
    /// caller error.
    pub fn render(template_id: &str, variables: &HashMap<String, String>) -> Result<String> {
        let template = Self::find_template(template_id).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown cover letter template: {}. Available: {}",
                template_id,
                Self::template_ids().join(", ")
            )
        })?;

        Ok(variables
            .iter()
            .fold(template.body.to_string(), |acc, (key, value)| {
                acc.replace(&format!("{{{{{}}}}}", key), value)
            }))
    }
}

/// Assemble substitution variables from the applicant, the target job, and
/// the technical skills pulled from the resume analysis
pub fn letter_variables(
    user: &User,
    job: Option<&Job>,
    technical_skills: &[String],
) -> HashMap<String, String> {
    let mut variables = HashMap::new();

    variables.insert("applicant_name".to_string(), user.name.clone());
    variables.insert("applicant_email".to_string(), user.email.clone());
    variables.insert(
        "date".to_string(),
        chrono::Utc::now().format("%Y-%m-%d").to_string(),
    );

    let (job_title, company) = match job {
        Some(job) => (job.title.clone(), job.company.clone()),
        None => ("advertised".to_string(), "your company".to_string()),
    };
    variables.insert("job_title".to_string(), job_title);
    variables.insert("company".to_string(), company);

    let skills = if technical_skills.is_empty() {
        "a broad range of technologies".to_string()
    } else {
        technical_skills.join(", ")
    };
    variables.insert("skills".to_string(), skills);

    variables
}
