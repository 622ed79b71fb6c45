//! Prompt templates for Svar.
//!
//! Prompts can be customized by editing the `[prompts]` tables in the
//! configuration file; `{{variable}}` placeholders are substituted at
//! render time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub qa: QaPrompts,
}

/// Prompts for question answering over a video transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    pub system: String,
    pub user: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an expert video analyst. You answer questions about a YouTube video based on content from its transcript.

Guidelines:
- Provide a thorough, well-structured response that directly addresses the question
- Include relevant details and insights from the video content
- Write in a natural, conversational tone as if you're explaining the video to someone
- Don't mention that you're working with transcripts - just provide the information naturally
- If the content doesn't contain enough information to answer fully, acknowledge this but provide what you can"#.to_string(),

            user: r#"Content from the video:
{{context}}

User's question: {{question}}

Answer the question based on the above content."#.to_string(),
        }
    }
}

impl Prompts {
    /// Render a template, substituting `{{key}}` placeholders.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut out = template.to_string();
        for (key, value) in vars {
            out = out.replace(&format!("{{{{{}}}}}", key), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_variables() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "What about cats?".to_string());
        vars.insert("context".to_string(), "Cats are great.".to_string());

        let rendered = Prompts::render(&QaPrompts::default().user, &vars);
        assert!(rendered.contains("What about cats?"));
        assert!(rendered.contains("Cats are great."));
        assert!(!rendered.contains("{{question}}"));
        assert!(!rendered.contains("{{context}}"));
    }

    #[test]
    fn test_unknown_placeholders_left_alone() {
        let rendered = Prompts::render("{{missing}}", &HashMap::new());
        assert_eq!(rendered, "{{missing}}");
    }
}
