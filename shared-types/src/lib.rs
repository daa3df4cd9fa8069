// Shared API models for the counsel backend and its web frontend

pub mod consultation;
pub mod system;
pub mod typescript_gen;

pub use typescript_gen::generate_typescript_definitions;

pub use consultation::{
    format_micros, Consultation, CreateConsultationRequest, Message, MessageRole,
    SendMessageRequest, DEFAULT_STAGE, MAX_MESSAGE_CHARS,
};
pub use system::{DiagnosticsResponse, ErrorResponse, StatusMessage};
