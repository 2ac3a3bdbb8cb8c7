use serde::Serialize;

/// Body of a single-turn chat completion carrying one image and one prompt.
#[derive(Debug, Serialize)]
pub struct VisionRequest<'a> {
    model: &'a str,
    messages: [UserMessage<'a>; 1],
}

impl<'a> VisionRequest<'a> {
    pub fn new(model: &'a str, image_b64: &str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: [UserMessage {
                role: "user",
                content: [
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{image_b64}"),
                        },
                    },
                    ContentPart::Text { text: prompt },
                ],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: [ContentPart<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    ImageUrl { image_url: ImageUrl },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let request = VisionRequest::new("qwen-vl-max", "AAAA", "Describe.");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "qwen-vl-max");
        let message = &value["messages"][0];
        assert_eq!(message["role"], "user");
        assert_eq!(message["content"][0]["type"], "image_url");
        assert_eq!(
            message["content"][0]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
        assert_eq!(message["content"][1]["type"], "text");
        assert_eq!(message["content"][1]["text"], "Describe.");
    }
}
