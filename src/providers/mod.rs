pub mod anthropic;
pub mod factory;
pub mod http_client;
pub mod mock;
pub mod openai;
pub mod scrub;
pub mod traits;

pub use anthropic::AnthropicClient;
pub use factory::{create_client, parse_model_string};
pub use mock::MockClient;
pub use openai::OpenAiClient;
pub use scrub::{sanitize_api_error, scrub_secrets};
pub use traits::{ChatMessage, ModelClient, Role};
