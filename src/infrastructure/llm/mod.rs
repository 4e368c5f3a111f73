mod mock_transport;
mod openai_transport;

pub use mock_transport::MockTransport;
pub use openai_transport::OpenAiCompatibleTransport;
