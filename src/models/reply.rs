use serde::Serialize;

/// Envelope the chat widget renders.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub content: Vec<ReplyBlock>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyBlock {
    Text { text: String },
}

impl ChatReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ReplyBlock::Text { text: text.into() }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_widget_shape() {
        let value = serde_json::to_value(ChatReply::text("Hey you.")).unwrap();
        assert_eq!(value, json!({"content": [{"type": "text", "text": "Hey you."}]}));
    }
}
