pub mod chatbot;
pub mod openai;
