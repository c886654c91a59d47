//! Explorer session state
//!
//! The configurator walks a child through four pages: a name prompt, a short
//! explanation of exoplanets, the seven questions, and the result. The
//! session is owned by the caller and passed explicitly; the generation core
//! never reads it implicitly.

use crate::error::{SessionError, UnknownOptionError};
use crate::questionnaire::{AnswerSet, ClusterKey, ClusterOption, CompleteAnswerSet};

/// Page the explorer is currently on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Intro,
    Explanation,
    Questions,
    Result,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Intro => "intro",
            Stage::Explanation => "explanation",
            Stage::Questions => "questions",
            Stage::Result => "result",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExplorerSession {
    stage: Stage,
    explorer: String,
    answers: AnswerSet,
}

impl ExplorerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn explorer(&self) -> &str {
        &self.explorer
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    fn expect_stage(&self, expected: Stage, action: &'static str) -> Result<(), SessionError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(SessionError::WrongStage {
                action,
                stage: self.stage.as_str(),
            })
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.explorer = name.trim().to_string();
    }

    /// Leave the intro page. Requires a non-empty name.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_stage(Stage::Intro, "start the adventure")?;
        if self.explorer.is_empty() {
            return Err(SessionError::NameRequired);
        }
        self.stage = Stage::Explanation;
        Ok(())
    }

    pub fn begin_questions(&mut self) -> Result<(), SessionError> {
        self.expect_stage(Stage::Explanation, "begin the questions")?;
        self.stage = Stage::Questions;
        Ok(())
    }

    /// Record an answer; allowed at any stage before the result.
    pub fn answer(
        &mut self,
        key: ClusterKey,
        option: &str,
    ) -> Result<&'static ClusterOption, UnknownOptionError> {
        self.answers.select(key, option)
    }

    /// Fraction of clusters answered, 0 to 1.
    pub fn progress(&self) -> f64 {
        self.answers.len() as f64 / ClusterKey::ALL.len() as f64
    }

    /// Move to the result page with the completed answers.
    pub fn finish(&mut self) -> Result<CompleteAnswerSet, SessionError> {
        self.expect_stage(Stage::Questions, "create the planet")?;
        let complete = self.answers.complete()?;
        self.stage = Stage::Result;
        Ok(complete)
    }

    /// Keep the explorer, clear the answers, return to the questions.
    pub fn create_another(&mut self) {
        self.answers.clear();
        self.stage = Stage::Questions;
    }

    /// Forget everything and return to the intro page.
    pub fn start_over(&mut self) {
        self.answers.clear();
        self.explorer.clear();
        self.stage = Stage::Intro;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at_questions() -> ExplorerSession {
        let mut session = ExplorerSession::new();
        session.set_name("  Ada ");
        session.start().unwrap();
        session.begin_questions().unwrap();
        session
    }

    #[test]
    fn test_name_required_to_start() {
        let mut session = ExplorerSession::new();
        assert_eq!(session.start(), Err(SessionError::NameRequired));
        session.set_name("   ");
        assert_eq!(session.start(), Err(SessionError::NameRequired));
        assert_eq!(session.stage(), Stage::Intro);
    }

    #[test]
    fn test_full_walkthrough() {
        let mut session = session_at_questions();
        assert_eq!(session.explorer(), "Ada");
        assert_eq!(session.stage(), Stage::Questions);

        for key in ClusterKey::ALL {
            session.answer(key, key.cluster().options[0].name).unwrap();
        }
        assert_eq!(session.progress(), 1.0);

        let complete = session.finish().unwrap();
        assert_eq!(session.stage(), Stage::Result);
        assert_eq!(complete.desc(ClusterKey::Size), "tiny like Mercury");
    }

    #[test]
    fn test_finish_requires_every_answer() {
        let mut session = session_at_questions();
        session.answer(ClusterKey::Size, "Earth").unwrap();
        assert!((session.progress() - 1.0 / 7.0).abs() < 1e-12);

        match session.finish() {
            Err(SessionError::Incomplete(err)) => assert_eq!(err.missing.len(), 6),
            other => panic!("expected incomplete answers, got {:?}", other),
        }
        assert_eq!(session.stage(), Stage::Questions);
    }

    #[test]
    fn test_stage_order_enforced() {
        let mut session = ExplorerSession::new();
        assert!(matches!(session.begin_questions(), Err(SessionError::WrongStage { .. })));
        assert!(matches!(session.finish(), Err(SessionError::WrongStage { .. })));
    }

    #[test]
    fn test_create_another_keeps_name() {
        let mut session = session_at_questions();
        session.answer(ClusterKey::Orbit, "Venus").unwrap();
        session.create_another();
        assert_eq!(session.explorer(), "Ada");
        assert!(session.answers().is_empty());
        assert_eq!(session.stage(), Stage::Questions);
    }

    #[test]
    fn test_start_over_resets_everything() {
        let mut session = session_at_questions();
        session.answer(ClusterKey::Orbit, "Venus").unwrap();
        session.start_over();
        assert_eq!(session.explorer(), "");
        assert!(session.answers().is_empty());
        assert_eq!(session.stage(), Stage::Intro);
    }
}
