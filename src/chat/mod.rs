pub mod canned;
pub mod composer;
pub mod engine;
pub mod envelope;
pub mod intent;
pub mod prompt;
pub mod suggest;

pub use engine::ChatEngine;
pub use envelope::{QuickReply, ResponseEnvelope, SourceRef};
pub use intent::{Intent, IntentClassifier};
