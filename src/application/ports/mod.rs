mod audio_decoder;
mod speech_recognizer;

pub use audio_decoder::{AudioDecoder, AudioDecoderError, DecodedAudio};
pub use speech_recognizer::{RecognitionError, RecognitionRequest, SpeechRecognizer};
