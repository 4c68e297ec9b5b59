//! Static catalog of selectable meditation sessions.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One selectable meditation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDefinition {
    pub id: String,
    /// Duration in minutes.
    pub duration_minutes: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl SessionDefinition {
    pub fn new(
        id: impl Into<String>,
        duration_minutes: u64,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            duration_minutes,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Get session duration in seconds.
    ///
    /// Uses saturating arithmetic so absurd configured values cannot overflow.
    pub fn duration_secs(&self) -> u64 {
        self.duration_minutes.saturating_mul(60)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_minutes == 0 {
            return Err(ValidationError::NonPositiveDuration {
                session_id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Ordered list of session definitions with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    sessions: Vec<SessionDefinition>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and zero durations.
    pub fn new(sessions: Vec<SessionDefinition>) -> Result<Self, ValidationError> {
        for (i, session) in sessions.iter().enumerate() {
            session.validate()?;
            if sessions[..i].iter().any(|s| s.id == session.id) {
                return Err(ValidationError::DuplicateSessionId(session.id.clone()));
            }
        }
        Ok(Self { sessions })
    }

    /// The four sessions shipped with the app.
    pub fn builtin() -> Self {
        Self {
            sessions: vec![
                SessionDefinition::new(
                    "1",
                    5,
                    "Respiração Consciente",
                    "Técnica simples de respiração para acalmar",
                ),
                SessionDefinition::new(
                    "2",
                    10,
                    "Meditação Guiada",
                    "Experiência meditativa com orientação de voz",
                ),
                SessionDefinition::new(
                    "3",
                    15,
                    "Mindfulness Completo",
                    "Sessão completa de atenção plena",
                ),
                SessionDefinition::new(
                    "4",
                    20,
                    "Meditação Profunda",
                    "Sessão avançada de meditação",
                ),
            ],
        }
    }

    pub fn sessions(&self) -> &[SessionDefinition] {
        &self.sessions
    }

    pub fn get(&self, id: &str) -> Option<&SessionDefinition> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&SessionDefinition, ValidationError> {
        self.get(id)
            .ok_or_else(|| ValidationError::UnknownSession(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
