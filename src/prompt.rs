//! Prompt construction.

use crate::config::MAX_PROMPT_HTML_CHARS;
use crate::error_handling::FetchError;

/// Instruction sent to every provider.
pub const SYSTEM_PROMPT: &str = "\
You are an expert cybersecurity analyst specializing in phishing detection.
Your task is to analyze a given URL and its HTML source code to determine if it is a phishing website or a safe website.
Decide on exactly one verdict: \"Safe\" or \"Phishing\".
Then give a concise, one-paragraph explanation of your reasoning.
Respond with a single JSON object and nothing else, in exactly this shape:
{\"verdict\": \"Safe\" | \"Phishing\", \"reasoning\": \"<one paragraph>\"}";

/// A provider-neutral prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Builds the analysis prompt from a URL and its page source.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    max_html_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            max_html_chars: MAX_PROMPT_HTML_CHARS,
        }
    }
}

impl PromptBuilder {
    pub fn with_max_html_chars(max_html_chars: usize) -> Self {
        Self { max_html_chars }
    }

    /// Composes the prompt. Pure: equal inputs give equal prompts.
    ///
    /// `html` is cut to the first `max_html_chars` characters.
    pub fn build(&self, url: &str, html: &str) -> Prompt {
        let html = truncate_chars(html, self.max_html_chars);
        Prompt {
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "URL: {url}\n\nSOURCE CODE (first {} characters):\n{html}",
                group_thousands(self.max_html_chars)
            ),
        }
    }

    /// Composes the prompt for a page that could not be fetched.
    ///
    /// The failure is named under its own heading so the model judges the bare URL.
    pub fn build_without_source(&self, url: &str, error: &FetchError) -> Prompt {
        Prompt {
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "URL: {url}\n\nSOURCE CODE: unavailable\n{}",
                Self::fetch_failure_placeholder(error)
            ),
        }
    }

    /// Stand-in for the page source when it could not be fetched.
    pub fn fetch_failure_placeholder(error: &FetchError) -> String {
        format!(
            "[The page source could not be retrieved: {error}. \
             Base your verdict on the URL alone.]"
        )
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
