use curiosity_client::highlight::{HIGHLIGHT_CLASS, PASSAGE_CLASS};
use curiosity_client::{EpisodeResult, Run, Span, escape_regex, render, render_episode};
use proptest::prelude::*;
use regex::Regex;
use scraper::{Html, Selector};

fn arb_span() -> impl Strategy<Value = Span> {
    (".{0,8}", any::<bool>()).prop_map(|(text, highlighted)| Span { text, highlighted })
}

fn episode_with(highlights: Vec<Vec<Span>>) -> EpisodeResult {
    EpisodeResult {
        id: "7".to_string(),
        slug: None,
        title: "The <Beacon> & co".to_string(),
        season: "palisade".to_string(),
        docs_id: Some("doc-7".to_string()),
        highlights,
    }
}

#[cfg(test)]
mod renderer {
    use super::*;

    #[test]
    fn test_beacon_falls_scenario() {
        let sentence = vec![
            Span::new("the ", false),
            Span::new("beacon", true),
            Span::new(" falls", false),
        ];
        let fragment = render(&sentence);
        assert_eq!(
            fragment.runs(),
            &[
                Run {
                    text: "the ".to_string(),
                    emphasized: false
                },
                Run {
                    text: "beacon".to_string(),
                    emphasized: true
                },
                Run {
                    text: " falls".to_string(),
                    emphasized: false
                },
            ]
        );
        assert_eq!(fragment.plain_text(), "the beacon falls");
    }

    #[test]
    fn test_empty_sentence_renders_empty() {
        let fragment = render(&[]);
        assert!(fragment.is_empty());
        assert_eq!(fragment.plain_text(), "");
    }

    #[test]
    fn test_episode_without_highlights() {
        let rendered = render_episode(&episode_with(vec![]));
        assert!(rendered.passages.is_empty());
        assert_eq!(rendered.id, "7");
    }

    #[test]
    fn test_episode_keeps_sentence_order() {
        let rendered = render_episode(&episode_with(vec![
            vec![Span::new("second best", false)],
            vec![],
            vec![Span::new("third", true)],
        ]));
        let texts: Vec<String> = rendered.passages.iter().map(|p| p.plain_text()).collect();
        assert_eq!(texts, vec!["second best", "", "third"]);
    }

    #[test]
    fn test_markup_in_text_stays_text() {
        let sentence = vec![
            Span::new("<script>alert('x')</script> ", false),
            Span::new("<img src=x onerror=alert(1)>", true),
        ];
        let html = render(&sentence).to_html();
        let doc = Html::parse_fragment(&html);

        let script = Selector::parse("script").unwrap();
        let img = Selector::parse("img").unwrap();
        assert_eq!(doc.select(&script).count(), 0);
        assert_eq!(doc.select(&img).count(), 0);

        let passage = Selector::parse(&format!("p.{PASSAGE_CLASS}")).unwrap();
        let text: String = doc.select(&passage).next().unwrap().text().collect();
        assert_eq!(text, "<script>alert('x')</script> <img src=x onerror=alert(1)>");

        let mark = Selector::parse(&format!("span.{HIGHLIGHT_CLASS}")).unwrap();
        let marked: Vec<String> = doc
            .select(&mark)
            .map(|el| el.text().collect::<String>())
            .collect();
        assert_eq!(marked, vec!["<img src=x onerror=alert(1)>"]);
    }

    #[test]
    fn test_episode_html_escapes_title_and_links_docs() {
        let rendered = render_episode(&episode_with(vec![vec![
            Span::new("the ", false),
            Span::new("beacon", true),
        ]]));
        let doc = Html::parse_fragment(&rendered.to_html());

        let link = Selector::parse("a.episode_title").unwrap();
        let anchor = doc.select(&link).next().unwrap();
        assert_eq!(
            anchor.value().attr("href"),
            Some("https://docs.google.com/document/d/doc-7")
        );
        assert_eq!(anchor.text().collect::<String>(), "The <Beacon> & co");

        let mark = Selector::parse(&format!("span.{HIGHLIGHT_CLASS}")).unwrap();
        assert_eq!(doc.select(&mark).count(), 1);
    }
}

#[cfg(test)]
mod regex_escaping {
    use super::*;

    #[test]
    fn test_escaped_text_matches_itself_literally() {
        for raw in [
            "road-to-partizan",
            "what? (really) [yes]",
            "a|b",
            "$1.00 + tax*",
            "{braces} ^caret\\slash",
        ] {
            let re = Regex::new(&escape_regex(raw)).unwrap();
            assert!(re.is_match(raw), "{raw:?} should match itself");
            assert_eq!(re.find(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_escaped_text_does_not_act_as_pattern() {
        let re = Regex::new(&escape_regex("a.c")).unwrap();
        assert!(!re.is_match("abc"));
    }

    #[test]
    fn test_hyphen_safe_inside_character_class() {
        let re = Regex::new(&format!("^[{}]+$", escape_regex("a-c"))).unwrap();
        assert!(re.is_match("a-c"));
        assert!(!re.is_match("b"));
    }
}

proptest! {
    #[test]
    fn prop_render_round_trips_text(sentence in proptest::collection::vec(arb_span(), 0..12)) {
        let fragment = render(&sentence);
        let original: String = sentence.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(fragment.plain_text(), original);
    }

    #[test]
    fn prop_render_never_leaves_equal_neighbours(sentence in proptest::collection::vec(arb_span(), 0..12)) {
        let fragment = render(&sentence);
        for pair in fragment.runs().windows(2) {
            prop_assert_ne!(pair[0].emphasized, pair[1].emphasized);
        }
    }

    #[test]
    fn prop_emphasized_text_is_preserved(sentence in proptest::collection::vec(arb_span(), 0..12)) {
        let fragment = render(&sentence);
        let expected: String = sentence
            .iter()
            .filter(|s| s.highlighted)
            .map(|s| s.text.as_str())
            .collect();
        let got: String = fragment
            .runs()
            .iter()
            .filter(|r| r.emphasized)
            .map(|r| r.text.as_str())
            .collect();
        prop_assert_eq!(got, expected);
    }
}
