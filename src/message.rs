//! Platform-independent view of an inbound chat message.

/// Tokens that notify a whole server or channel
pub const BROADCAST_MENTIONS: [&str; 2] = ["@everyone", "@here"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub id: u64,
    pub author_id: u64,
    /// Human readable author name used in audit lines
    pub author_tag: String,
    pub channel_id: u64,
    pub raw_text: String,
    pub contains_broadcast_mention: bool,
}

impl IncomingMessage {
    pub fn new(
        id: u64,
        author_id: u64,
        author_tag: impl Into<String>,
        channel_id: u64,
        raw_text: impl Into<String>,
    ) -> Self {
        let raw_text = raw_text.into();
        let contains_broadcast_mention = BROADCAST_MENTIONS
            .iter()
            .any(|token| raw_text.contains(token));

        IncomingMessage {
            id,
            author_id,
            author_tag: author_tag.into(),
            channel_id,
            raw_text,
            contains_broadcast_mention,
        }
    }

    /// True when the relay itself wrote this message
    pub fn is_own(&self, relay_user_id: u64) -> bool {
        self.author_id == relay_user_id
    }

    /// Discord mention markup for the author
    pub fn author_mention(&self) -> String {
        format!("<@{}>", self.author_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_mention_detection() {
        assert!(IncomingMessage::new(1, 2, "a", 3, "hey @everyone").contains_broadcast_mention);
        assert!(IncomingMessage::new(1, 2, "a", 3, "@here look").contains_broadcast_mention);
        assert!(!IncomingMessage::new(1, 2, "a", 3, "hey everyone").contains_broadcast_mention);
        // Raw text is case sensitive
        assert!(!IncomingMessage::new(1, 2, "a", 3, "@EVERYONE").contains_broadcast_mention);
    }

    #[test]
    fn test_only_relay_messages_are_own() {
        let relay = 900;
        assert!(IncomingMessage::new(1, relay, "dushman", 3, "gm").is_own(relay));
        // Another bot is just another author
        assert!(!IncomingMessage::new(2, 901, "otherbot", 3, "@everyone").is_own(relay));
    }

    #[test]
    fn test_author_mention() {
        let msg = IncomingMessage::new(1, 42, "user#0001", 3, "hi");
        assert_eq!(msg.author_mention(), "<@42>");
    }
}
