pub mod chat;
pub mod shared;
pub mod tts;
