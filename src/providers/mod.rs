mod logging;
pub mod openai;

pub use openai::OpenAIProvider;
