//! Chat messages and the client for the completion API.

pub mod client;

pub use client::CompletionClient;

/// One message in a chat exchange.
#[derive(Debug, Clone)]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
}

impl Message {
    pub fn role(&self) -> &'static str {
        match self {
            Message::System(_) => "system",
            Message::User(_) => "user",
            Message::Assistant(_) => "assistant",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System(content)
            | Message::User(content)
            | Message::Assistant(content) => content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_match_the_completions_api() {
        assert_eq!(Message::System("a".into()).role(), "system");
        assert_eq!(Message::User("b".into()).role(), "user");
        assert_eq!(Message::Assistant("c".into()).role(), "assistant");
    }

    #[test]
    fn content_is_returned_verbatim() {
        let prompt = "List 3 edge cases for a login form";
        assert_eq!(Message::User(prompt.into()).content(), prompt);
    }
}
