mod anthropic_client;
mod scripted_provider;

pub use anthropic_client::AnthropicClient;
pub use scripted_provider::ScriptedLlmProvider;
