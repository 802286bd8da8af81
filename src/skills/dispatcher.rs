//! Skill dispatcher: runs a skill against the backend and keeps the latest result.

use std::sync::Arc;

use tracing::{info, warn};

use super::skill::{Skill, SkillResult};
use crate::config::AssistConfig;
use crate::error::{GatewayError, InputError};
use crate::gateway::Gateway;
use crate::page::PageContext;
use crate::request::{SkillRequest, build_skill};

/// A skill invocation that has been built but not yet sent.
pub struct PendingSkill {
    skill: Skill,
    gateway: Arc<dyn Gateway>,
    endpoint: String,
    request: SkillRequest,
}

/// Result of sending a [`PendingSkill`]: the rendered content or the failure.
#[derive(Debug)]
pub struct SkillOutcome {
    pub skill: Skill,
    pub content: Result<String, GatewayError>,
}

impl PendingSkill {
    pub fn skill(&self) -> Skill {
        self.skill
    }

    pub fn request(&self) -> &SkillRequest {
        &self.request
    }

    /// Perform the single network attempt and project the response.
    pub async fn send(self) -> SkillOutcome {
        let content = match serde_json::to_value(&self.request) {
            Ok(body) => self
                .gateway
                .send(&self.endpoint, body)
                .await
                .and_then(|value| {
                    self.skill
                        .project(value)
                        .map_err(|e| GatewayError::MalformedResponse {
                            endpoint: self.endpoint.clone(),
                            reason: e.to_string(),
                        })
                }),
            Err(e) => Err(GatewayError::Encode {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            }),
        };
        SkillOutcome {
            skill: self.skill,
            content,
        }
    }
}

/// Skills panel state: the latest result and an advisory busy flag.
pub struct SkillDispatcher {
    gateway: Arc<dyn Gateway>,
    base_url: String,
    page: PageContext,
    result: Option<SkillResult>,
    active: Option<Skill>,
    in_flight: usize,
}

impl SkillDispatcher {
    pub fn new(config: &AssistConfig, gateway: Arc<dyn Gateway>) -> Self {
        let page = config
            .page_path
            .as_deref()
            .map(PageContext::from_path)
            .unwrap_or_default();
        Self {
            gateway,
            base_url: config.base_url.clone(),
            page,
            result: None,
            active: None,
            in_flight: 0,
        }
    }

    /// Page context attached to invocations that don't supply their own.
    pub fn set_page(&mut self, page: PageContext) {
        self.page = page;
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    /// Latest result, including one hidden by an in-flight request.
    pub fn result(&self) -> Option<&SkillResult> {
        self.result.as_ref()
    }

    /// The result to display: hidden while a request is outstanding.
    pub fn visible_result(&self) -> Option<&SkillResult> {
        if self.is_busy() {
            None
        } else {
            self.result.as_ref()
        }
    }

    /// Skill most recently started.
    pub fn active(&self) -> Option<Skill> {
        self.active
    }

    /// Advisory flag for disabling skill buttons. Not enforced here.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Build a request for `skill`.
    ///
    /// Blank content is refused and leaves the previous result untouched.
    pub fn begin(
        &mut self,
        skill: Skill,
        content: &str,
        context: Option<&PageContext>,
    ) -> Result<PendingSkill, InputError> {
        let page = context.unwrap_or(&self.page);
        let request = build_skill(skill.id(), content, page, skill.asks_question())?;
        info!(
            skill = %skill,
            context = request.context.as_deref().unwrap_or(""),
            "Skill request dispatched"
        );

        self.in_flight += 1;
        self.active = Some(skill);

        Ok(PendingSkill {
            skill,
            gateway: Arc::clone(&self.gateway),
            endpoint: format!("{}{}", self.base_url, skill.path()),
            request,
        })
    }

    /// Store the outcome as the current result. Failures become an `Error` block.
    pub fn complete(&mut self, outcome: SkillOutcome) -> &SkillResult {
        self.in_flight = self.in_flight.saturating_sub(1);
        let result = match outcome.content {
            Ok(content) => SkillResult::success(outcome.skill, content),
            Err(e) => {
                warn!(skill = %outcome.skill, error = %e, "Skill request failed");
                SkillResult::failure(outcome.skill)
            }
        };
        self.result.insert(result)
    }

    /// Run a skill end to end.
    pub async fn invoke(
        &mut self,
        skill: Skill,
        content: &str,
        context: Option<&PageContext>,
    ) -> Result<&SkillResult, InputError> {
        let pending = self.begin(skill, content, context)?;
        let outcome = pending.send().await;
        Ok(self.complete(outcome))
    }
}
