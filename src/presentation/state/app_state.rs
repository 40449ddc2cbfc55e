use std::sync::Arc;

use crate::application::ports::{AudioDecoder, SpeechRecognizer};
use crate::presentation::tool::TranscribeTool;

pub struct AppState<D: ?Sized, R>
where
    D: AudioDecoder,
    R: SpeechRecognizer,
{
    pub tool: Arc<TranscribeTool<D, R>>,
}

impl<D: ?Sized, R> Clone for AppState<D, R>
where
    D: AudioDecoder,
    R: SpeechRecognizer,
{
    fn clone(&self) -> Self {
        Self {
            tool: Arc::clone(&self.tool),
        }
    }
}
