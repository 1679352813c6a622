pub mod ingest;
pub mod provider;
pub mod providers;
pub mod types;

pub use ingest::run_turn;
pub use provider::{AnalyzeBackend, AnalyzeRequest, BackendError, ImagePayload};
pub use providers::HttpAnalyzeBackend;
pub use types::{ConversationLog, ImageEcho, Message, Role, StreamChunk};
