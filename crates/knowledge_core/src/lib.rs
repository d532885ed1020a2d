pub mod domain;
pub mod extraction;
pub mod ports;
pub mod quiz;

pub use domain::{Credential, ExtractionMode, MockNotice, SamplingConfig, SessionUser};
pub use ports::{
    ChatCompletionService, CredentialStore, PortError, PortResult, TextGenerationService,
};
pub use quiz::{QuizGenerator, QuizOutcome};
