use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct VisionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

impl VisionResponse {
    /// Text of the first choice, if it carries any.
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(MessageContent::into_text)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<MessageContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Blocks(blocks) => blocks.into_iter().filter_map(|b| b.text).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<String> {
        serde_json::from_str::<VisionResponse>(json).unwrap().into_text()
    }

    #[test]
    fn plain_text_content() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"A cat."}}]}"#;
        assert_eq!(parse(json).as_deref(), Some("A cat."));
    }

    #[test]
    fn block_content() {
        let json = r#"{"choices":[{"message":{"content":[
            {"type":"text","text":"A "},
            {"type":"text","text":"dog."}
        ]}}]}"#;
        assert_eq!(parse(json).as_deref(), Some("A dog."));
    }

    #[test]
    fn empty_choices() {
        assert_eq!(parse(r#"{"choices":[]}"#), None);
        assert_eq!(parse("{}"), None);
        assert_eq!(parse(r#"{"choices":[{"message":{"content":null}}]}"#), None);
        assert_eq!(parse(r#"{"choices":[{"message":{"content":""}}]}"#), None);
    }
}
