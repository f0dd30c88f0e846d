//! Skip rules evaluated after the payload is admitted.
//!
//! Runs before any processor stage to drop events the agent should not
//! react to, most importantly its own activity and that of other bots.

use regex::Regex;
use tracing::debug;

use crate::event::{EventContext, UserType};

/// Outcome of a skip check. `reason` is set whenever `skip` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipDecision {
    pub skip: bool,
    pub reason: String,
}

impl SkipDecision {
    pub fn proceed() -> Self {
        Self {
            skip: false,
            reason: String::new(),
        }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            skip: true,
            reason: reason.into(),
        }
    }
}

/// Decides whether an admitted event should be processed.
pub trait SkipPolicy: Send + Sync {
    fn evaluate(&self, ctx: &EventContext) -> SkipDecision;
}

/// Which part of the event a rule matches against.
#[derive(Debug, Clone)]
pub enum SkipField {
    /// `sender.login`
    SenderLogin,
    /// `repository.full_name`
    Repository,
    /// `issue.state`; events without an issue never match.
    IssueState,
}

/// A regex rule that skips the event when it matches.
#[derive(Debug, Clone)]
pub struct SkipRule {
    /// Pattern as written, for logs.
    pub pattern: String,
    /// Compiled pattern matched against `field`.
    pub regex: Regex,
    /// Which part of the event the rule inspects.
    pub field: SkipField,
    /// Reported in the skip decision when the rule matches.
    pub reason: String,
}

/// Ordered skip rules. The first match wins.
#[derive(Debug, Clone)]
pub struct SkipRules {
    skip_bot_senders: bool,
    rules: Vec<SkipRule>,
}

impl SkipRules {
    /// Skip events sent by bot accounts.
    pub fn default_rules() -> Self {
        let rules = vec![SkipRule {
            pattern: "*[bot]".into(),
            regex: Regex::new(r"(?i)\[bot\]$").unwrap(),
            field: SkipField::SenderLogin,
            reason: "sender is a bot".into(),
        }];

        Self {
            skip_bot_senders: true,
            rules,
        }
    }

    /// A rule set that never skips (for testing).
    pub fn empty() -> Self {
        Self {
            skip_bot_senders: false,
            rules: Vec::new(),
        }
    }

    pub fn add_rule(
        &mut self,
        pattern: &str,
        field: SkipField,
        reason: &str,
    ) -> Result<(), regex::Error> {
        self.rules.push(SkipRule {
            pattern: pattern.into(),
            regex: Regex::new(pattern)?,
            field,
            reason: reason.into(),
        });
        Ok(())
    }
}

impl SkipPolicy for SkipRules {
    fn evaluate(&self, ctx: &EventContext) -> SkipDecision {
        let sender = &ctx.payload.sender;
        if self.skip_bot_senders && sender.kind == UserType::Bot {
            debug!(sender = %sender.login, "Sender account type is Bot");
            return SkipDecision::skip("sender is a bot");
        }

        for rule in &self.rules {
            let value = match rule.field {
                SkipField::SenderLogin => sender.login.as_str(),
                SkipField::Repository => ctx.payload.repository.full_name.as_str(),
                SkipField::IssueState => match ctx.issue() {
                    Some(issue) => issue.state.as_str(),
                    None => continue,
                },
            };

            if rule.regex.is_match(value) {
                debug!(
                    sender = %sender.login,
                    rule = %rule.pattern,
                    reason = %rule.reason,
                    "Event matched skip rule"
                );
                return SkipDecision::skip(rule.reason.clone());
            }
        }

        SkipDecision::proceed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn ctx_from(sender: serde_json::Value) -> EventContext {
        let mut raw = testing::label_payload();
        raw["sender"] = sender;
        testing::context(raw)
    }

    #[test]
    fn bot_account_type_is_skipped() {
        let ctx = ctx_from(serde_json::json!({ "login": "renovate", "type": "Bot" }));
        let decision = SkipRules::default_rules().evaluate(&ctx);
        assert!(decision.skip);
        assert_eq!(decision.reason, "sender is a bot");
    }

    #[test]
    fn bot_login_suffix_is_skipped() {
        let ctx = ctx_from(serde_json::json!({ "login": "ubiquibot[bot]" }));
        assert!(SkipRules::default_rules().evaluate(&ctx).skip);
    }

    #[test]
    fn human_sender_proceeds() {
        let ctx = ctx_from(serde_json::json!({ "login": "alice", "type": "User" }));
        let decision = SkipRules::default_rules().evaluate(&ctx);
        assert_eq!(decision, SkipDecision::proceed());
        assert!(decision.reason.is_empty());
    }

    #[test]
    fn empty_rules_never_skip() {
        let ctx = ctx_from(serde_json::json!({ "login": "renovate", "type": "Bot" }));
        assert!(!SkipRules::empty().evaluate(&ctx).skip);
    }

    #[test]
    fn custom_rule_on_issue_state() {
        let mut rules = SkipRules::empty();
        rules
            .add_rule("^closed$", SkipField::IssueState, "issue is closed")
            .unwrap();

        let mut raw = testing::label_payload();
        raw["issue"]["state"] = serde_json::json!("closed");
        let decision = rules.evaluate(&testing::context(raw));
        assert_eq!(decision, SkipDecision::skip("issue is closed"));

        assert!(!rules.evaluate(&testing::context(testing::label_payload())).skip);
    }

    #[test]
    fn invalid_rule_pattern_is_rejected() {
        let mut rules = SkipRules::empty();
        assert!(rules.add_rule("(", SkipField::Repository, "x").is_err());
    }
}
