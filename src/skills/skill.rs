//! Skill catalog, response schemas, and result projection.

use serde::{Deserialize, Serialize};

use crate::config::{GLOSSARY_PATH, SUMMARIZE_PATH, TUTOR_PATH};

/// A backend text-transformation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Glossary,
    Summarize,
    Tutor,
}

impl Skill {
    pub const ALL: [Skill; 3] = [Skill::Glossary, Skill::Summarize, Skill::Tutor];

    /// Stable identifier used in logs and error text.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Glossary => "glossary",
            Self::Summarize => "summarize",
            Self::Tutor => "tutor",
        }
    }

    /// Endpoint path relative to the backend base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Glossary => GLOSSARY_PATH,
            Self::Summarize => SUMMARIZE_PATH,
            Self::Tutor => TUTOR_PATH,
        }
    }

    /// Button label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Glossary => "Generate Glossary",
            Self::Summarize => "Summarize Content",
            Self::Tutor => "Ask Tutor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Glossary => "Create a glossary of important terms",
            Self::Summarize => "Generate a summary of the content",
            Self::Tutor => "Get explanations from an AI tutor",
        }
    }

    /// Heading of a successful result.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Glossary => "Glossary",
            Self::Summarize => "Summary",
            Self::Tutor => "Tutor Response",
        }
    }

    /// Whether the payload repeats the content as `question`.
    pub fn asks_question(&self) -> bool {
        matches!(self, Self::Tutor)
    }

    /// Decode the response body for this skill and render it as text.
    pub fn project(&self, body: serde_json::Value) -> Result<String, serde_json::Error> {
        Ok(match self {
            Self::Glossary => serde_json::from_value::<GlossaryResponse>(body)?.render(),
            Self::Summarize => serde_json::from_value::<SummaryResponse>(body)?.render(),
            Self::Tutor => serde_json::from_value::<TutorResponse>(body)?.render(),
        })
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Skill {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "glossary" => Ok(Self::Glossary),
            "summarize" => Ok(Self::Summarize),
            "tutor" => Ok(Self::Tutor),
            _ => Err(format!("Unknown skill: {}", s)),
        }
    }
}

/// One glossary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossaryResponse {
    pub terms: Vec<GlossaryTerm>,
}

impl GlossaryResponse {
    pub fn render(&self) -> String {
        self.terms
            .iter()
            .map(|t| format!("{}: {}", t.term, t.definition))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub key_points: Vec<String>,
}

impl SummaryResponse {
    pub fn render(&self) -> String {
        let points = self
            .key_points
            .iter()
            .map(|p| format!("- {p}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n\nKey Points:\n{}", self.summary, points)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorResponse {
    pub explanation: String,
}

impl TutorResponse {
    pub fn render(&self) -> String {
        self.explanation.clone()
    }
}

/// The titled block shown in the skills panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillResult {
    pub title: String,
    pub content: String,
}

impl SkillResult {
    pub fn success(skill: Skill, content: String) -> Self {
        Self {
            title: skill.title().to_string(),
            content,
        }
    }

    /// Generic failure block; never carries backend detail.
    pub fn failure(skill: Skill) -> Self {
        Self {
            title: "Error".to_string(),
            content: format!("Failed to execute {}. Please try again.", skill.id()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.title == "Error"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn id_round_trips_through_from_str() {
        for skill in Skill::ALL {
            assert_eq!(skill.id().parse::<Skill>().unwrap(), skill);
            assert_eq!(serde_json::to_string(&skill).unwrap(), format!("\"{skill}\""));
        }
        assert!("translate".parse::<Skill>().is_err());
    }

    #[test]
    fn glossary_joins_terms_with_blank_lines() {
        let content = Skill::Glossary
            .project(json!({"terms": [
                {"term": "torque", "definition": "rotational force"},
                {"term": "actuator", "definition": "a motor"}
            ]}))
            .unwrap();
        assert_eq!(content, "torque: rotational force\n\nactuator: a motor");
    }

    #[test]
    fn glossary_single_term() {
        let content = Skill::Glossary
            .project(json!({"terms": [{"term": "torque", "definition": "rotational force"}]}))
            .unwrap();
        assert_eq!(content, "torque: rotational force");
    }

    #[test]
    fn summary_lists_key_points() {
        let content = Skill::Summarize
            .project(json!({"summary": "Robots move.", "key_points": ["joints", "links"]}))
            .unwrap();
        assert_eq!(content, "Robots move.\n\nKey Points:\n- joints\n- links");
    }

    #[test]
    fn tutor_is_verbatim() {
        let content = Skill::Tutor
            .project(json!({"explanation": "Think of it as\na lever."}))
            .unwrap();
        assert_eq!(content, "Think of it as\na lever.");
    }

    #[test]
    fn missing_fields_fail_projection() {
        assert!(Skill::Summarize.project(json!({"summary": "no points"})).is_err());
        assert!(Skill::Glossary.project(json!({"terms": "torque"})).is_err());
        assert!(Skill::Tutor.project(json!({})).is_err());
    }

    #[test]
    fn only_tutor_asks_question() {
        assert!(Skill::Tutor.asks_question());
        assert!(!Skill::Glossary.asks_question());
        assert!(!Skill::Summarize.asks_question());
    }

    #[test]
    fn failure_names_skill() {
        let result = SkillResult::failure(Skill::Summarize);
        assert!(result.is_error());
        assert_eq!(result.content, "Failed to execute summarize. Please try again.");
    }
}
