//! Skills panel: glossary, summarize, and tutor actions.

pub mod dispatcher;
pub mod skill;

pub use dispatcher::{PendingSkill, SkillDispatcher, SkillOutcome};
pub use skill::{
    GlossaryResponse, GlossaryTerm, Skill, SkillResult, SummaryResponse, TutorResponse,
};
