use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::exam::{assembler::ExamAssembler, scoring::ScoringEngine};
use crate::repo::{AttemptStore, QuestionRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub questions: Arc<dyn QuestionRepository>,
    pub attempts: Arc<dyn AttemptStore>,
    pub assembler: Arc<ExamAssembler>,
    pub scoring: Arc<ScoringEngine>,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<ExamAssembler> {
    fn from_ref(state: &AppState) -> Self {
        state.assembler.clone()
    }
}

impl FromRef<AppState> for Arc<ScoringEngine> {
    fn from_ref(state: &AppState) -> Self {
        state.scoring.clone()
    }
}
