use crate::providers::{ChatMessage, Role};
use serde::{Deserialize, Serialize};

/// Who produced an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Speaker {
    Persona,
    Interlocutor,
}

/// One finalized message in the simulated conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: Speaker,
    pub content: String,
}

impl Utterance {
    pub fn persona(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Persona,
            content: content.into(),
        }
    }

    pub fn interlocutor(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Interlocutor,
            content: content.into(),
        }
    }
}

/// The persona model sees itself as the assistant.
pub fn for_persona(history: &[Utterance]) -> Vec<ChatMessage> {
    translate(history, Speaker::Persona)
}

/// The interlocutor model sees the persona as the user.
pub fn for_interlocutor(history: &[Utterance]) -> Vec<ChatMessage> {
    translate(history, Speaker::Interlocutor)
}

fn translate(history: &[Utterance], assistant: Speaker) -> Vec<ChatMessage> {
    history
        .iter()
        .map(|u| {
            let role = if u.speaker == assistant {
                Role::Assistant
            } else {
                Role::User
            };
            ChatMessage::new(role, u.content.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Vec<Utterance> {
        vec![
            Utterance::interlocutor("How's it going?"),
            Utterance::persona("Fine."),
            Utterance::interlocutor("Just fine?"),
        ]
    }

    #[test]
    fn persona_perspective() {
        let roles: Vec<Role> = for_persona(&conversation()).iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
    }

    #[test]
    fn interlocutor_perspective_flips_roles() {
        let messages = for_interlocutor(&conversation());
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(messages[1].content, "Fine.");
    }

    #[test]
    fn empty_history_translates_to_nothing() {
        assert!(for_persona(&[]).is_empty());
        assert!(for_interlocutor(&[]).is_empty());
    }
}
