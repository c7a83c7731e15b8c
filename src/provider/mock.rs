use super::{GenerationParameters, GenerativeProvider, ProviderResponse};
use crate::error::{GenError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model_id: String,
    pub instruction: String,
    pub params: GenerationParameters,
}

/// Replays scripted results in order; errors once the script runs out.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ProviderResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, result: Result<ProviderResponse>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn then_text(self, text: &str) -> Self {
        self.then(Ok(ProviderResponse::from_text(text)))
    }

    pub fn then_error(self, error: GenError) -> Self {
        self.then(Err(error))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedProvider {
    async fn invoke(
        &self,
        model_id: &str,
        instruction: &str,
        params: &GenerationParameters,
    ) -> Result<ProviderResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            model_id: model_id.to_string(),
            instruction: instruction.to_string(),
            params: params.clone(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenError::NetworkError("script exhausted".into())))
    }
}
