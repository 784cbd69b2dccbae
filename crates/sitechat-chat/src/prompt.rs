use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// System instruction followed by one user turn carrying the retrieved
/// context (chunks separated by blank lines) and the question.
pub fn build_messages(system_prompt: &str, query: &str, context: &[String]) -> Vec<Message> {
    let context = context.join("\n\n");
    vec![
        Message::system(system_prompt),
        Message::user(format!("Context:\n{context}\n\nQuestion: {query}")),
    ]
}
