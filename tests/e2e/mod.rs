// End-to-end tests for the Mistral TTS API
//
// Each test starts the full router on an ephemeral port, backed by in-memory
// fakes of the language model and speech engine and a throwaway audio
// directory. The Mistral client itself is exercised against a local mock
// upstream in test_mistral_client.

mod helpers;
mod test_audio;
mod test_chat;
mod test_mistral_client;
