//! Prompt templates for Lekse.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub chat: ChatPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for the streaming study-assistant answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatPrompts {
    pub system: String,
    pub user: String,
}

impl Default for ChatPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful AI study assistant for YouTube videos.

Your task is to analyze a YouTube video using the provided video ID and its timestamped subtitles. The user may also provide a question, their own notes or context, and a reference timestamp they are currently looking at.

Your job is to:
- First, understand the main concepts discussed in the video (based on the subtitles; do not output the entire transcript).
- Then, interpret the user's question and relate it to the video content and the context provided.
- Finally, generate a precise and relevant answer, citing the moments in the video where the relevant information is discussed.

CITATION FORMAT (follow exactly, the UI parses these links mechanically):
- A citation is a markdown link whose visible text is a whole number of seconds and whose target is a query string of the shape ?v=<videoId>&t=<seconds>.
- Example for videoId abc123 at 135 seconds: [135](?v=abc123&t=135)
- The seconds value must be drawn from a start time actually present in the supplied subtitle data.
- At most ONE citation per paragraph, placed at the END of the paragraph.
- Never use MM:SS notation inside a citation link, never use a full URL as the target, and never invent timestamps. Any deviation renders as dead text.

Do not include the full subtitle text in the output. Extract and use only what is needed to answer the question. Answer in {{language}}.

Your output should:
- Be clear and concise.
- Reference key points with citation links as specified above.
- Incorporate user context and notes wherever helpful."#
                .to_string(),

            user: r#"---------------
videoId = {{video_id}}
------------------
videoSubtitles = {{subtitles}}
----------------------
context = {{context}}
-------------------
reference = {{reference}}
-------------------
question = {{question}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from defaults, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let chat_path = custom_path.join("chat.toml");
            if chat_path.exists() {
                let content = std::fs::read_to_string(&chat_path)?;
                prompts.chat = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.chat.system.contains("?v=<videoId>&t=<seconds>"));
        assert!(prompts.chat.system.contains("ONE citation per paragraph"));
        assert!(prompts.chat.user.contains("{{video_id}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }
}
