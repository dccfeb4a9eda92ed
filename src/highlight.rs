use serde::Serialize;

use crate::data_models::{EpisodeResult, Span};

/// CSS class wrapped around emphasized runs in HTML output.
pub const HIGHLIGHT_CLASS: &str = "keyword_highlight";
/// CSS class of one rendered passage.
pub const PASSAGE_CLASS: &str = "search_result";

const REGEX_METACHARACTERS: &[char] = &[
    '|', '\\', '{', '}', '(', ')', '[', ']', '^', '$', '+', '*', '?', '.',
];

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub emphasized: bool,
}

/// One rendered sentence. Text stays raw until a caller asks for markup.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    runs: Vec<Run>,
}

impl Fragment {
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = format!("<p class=\"{PASSAGE_CLASS}\">");
        for run in &self.runs {
            if run.emphasized {
                out.push_str(&format!(
                    "<span class=\"{HIGHLIGHT_CLASS}\">{}</span>",
                    html_escape(&run.text)
                ));
            } else {
                out.push_str(&html_escape(&run.text));
            }
        }
        out.push_str("</p>");
        out
    }
}

/// Turn a sentence's spans into display runs, merging neighbours with equal emphasis.
pub fn render(sentence: &[Span]) -> Fragment {
    let mut runs: Vec<Run> = Vec::with_capacity(sentence.len());

    for span in sentence.iter().filter(|span| !span.text.is_empty()) {
        match runs.last_mut() {
            Some(last) if last.emphasized == span.highlighted => last.text.push_str(&span.text),
            _ => runs.push(Run {
                text: span.text.clone(),
                emphasized: span.highlighted,
            }),
        }
    }

    Fragment { runs }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RenderedEpisode {
    pub id: String,
    pub title: String,
    pub season: String,
    pub docs_url: Option<String>,
    pub passages: Vec<Fragment>,
}

impl RenderedEpisode {
    pub fn to_html(&self) -> String {
        let title = html_escape(&self.title);
        let mut out = match &self.docs_url {
            Some(url) => format!(
                "<p><a class=\"episode_title\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{title}</a></p>",
                html_escape(url)
            ),
            None => format!("<p><span class=\"episode_title\">{title}</span></p>"),
        };
        for passage in &self.passages {
            out.push_str(&passage.to_html());
        }
        out
    }
}

/// Render every highlight sentence of an episode. No highlights yields no passages.
pub fn render_episode(episode: &EpisodeResult) -> RenderedEpisode {
    RenderedEpisode {
        id: episode.id.clone(),
        title: episode.title.clone(),
        season: episode.season.clone(),
        docs_url: episode.docs_url(),
        passages: episode.highlights.iter().map(|s| render(s)).collect(),
    }
}

/// Escape `s` for literal use inside a regular expression. `-` becomes `\x2d`
/// so the result is also safe inside a character class.
pub fn escape_regex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch == '-' {
            out.push_str("\\x2d");
        } else {
            if REGEX_METACHARACTERS.contains(&ch) {
                out.push('\\');
            }
            out.push(ch);
        }
    }
    out
}

/// Drop control characters so backend text can't drive a terminal
/// (ANSI escapes, carriage returns, bells).
pub fn strip_control(s: &str) -> String {
    s.chars().filter(|ch| !ch.is_control()).collect()
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_runs_merge() {
        let sentence = vec![
            Span::new("a ", false),
            Span::new("b ", false),
            Span::new("c", true),
            Span::new("d", true),
        ];
        let fragment = render(&sentence);
        assert_eq!(
            fragment.runs(),
            &[
                Run {
                    text: "a b ".to_string(),
                    emphasized: false
                },
                Run {
                    text: "cd".to_string(),
                    emphasized: true
                },
            ]
        );
    }

    #[test]
    fn test_empty_span_text_does_not_split_runs() {
        let sentence = vec![
            Span::new("x", true),
            Span::new("", false),
            Span::new("y", true),
        ];
        let fragment = render(&sentence);
        assert_eq!(fragment.runs().len(), 1);
        assert_eq!(fragment.plain_text(), "xy");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a < b & \"c\" 'd'"), "a &lt; b &amp; &quot;c&quot; &#x27;d&#x27;");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_strip_control_removes_terminal_escapes() {
        assert_eq!(strip_control("\x1b[31mred\x1b[0m"), "[31mred[0m");
        assert_eq!(strip_control("bell\x07 and\r return"), "bell and return");
        assert_eq!(strip_control("the beacon falls"), "the beacon falls");
        assert_eq!(strip_control("Sangfiellé"), "Sangfiellé");
    }

    #[test]
    fn test_escape_regex_metacharacters() {
        assert_eq!(escape_regex("a.b"), "a\\.b");
        assert_eq!(escape_regex("(x|y)"), "\\(x\\|y\\)");
        assert_eq!(escape_regex("road-to-partizan"), "road\\x2dto\\x2dpartizan");
        assert_eq!(escape_regex("$5+?"), "\\$5\\+\\?");
        assert_eq!(escape_regex("nothing special"), "nothing special");
    }
}
