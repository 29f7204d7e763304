use std::fmt::Write;
use std::path::Path;

use dictionary::{LookupStatus, WordDefinition};

use crate::config::AppConfig;

pub const IDLE: &str = "Start by searching for a word!";
pub const LOADING: &str = "Fetching results...";
pub const ERROR: &str = "Error retrieving data. Please try again.";

pub fn render_status(status: &LookupStatus) -> String {
    match status {
        LookupStatus::Idle => IDLE.to_owned(),
        LookupStatus::Loading => LOADING.to_owned(),
        LookupStatus::Success(words) => render_words(words),
        LookupStatus::Error => ERROR.to_owned(),
    }
}

/// Playable audio urls of all entries. `play <n>` refers to the n-th one.
pub fn audio_urls(words: &[WordDefinition]) -> Vec<&str> {
    words.iter().flat_map(|word| word.audio_urls()).collect()
}

fn render_words(words: &[WordDefinition]) -> String {
    if words.is_empty() {
        return "No definitions found.".to_owned();
    }
    let mut out = String::new();
    let mut audio_index = 0;
    for (index, word) in words.iter().enumerate() {
        if index != 0 {
            out.push_str("----------------------------------------\n");
        }
        let _ = writeln!(out, "Word: {}", word.word);
        if let Some(phonetic) = &word.phonetic {
            let _ = writeln!(out, "Phonetic: {phonetic}");
        }
        for url in word.audio_urls() {
            audio_index += 1;
            let _ = writeln!(out, "  [{audio_index}] Play audio ({url})");
        }
        for meaning in &word.meanings {
            let _ = writeln!(out, "  {}", meaning.part_of_speech);
            for definition in &meaning.definitions {
                let _ = writeln!(out, "    Definition: {}", definition.definition);
                if let Some(example) = &definition.example {
                    let _ = writeln!(out, "    Example: {example}");
                }
            }
        }
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn render_settings(config: &AppConfig, path: Option<&Path>) -> String {
    let mut out = String::from("Settings\n");
    for (key, value) in config.entries() {
        let _ = writeln!(out, "  {key:<18}{value}");
    }
    match path {
        Some(path) => {
            let _ = write!(out, "Stored in {}", path.display());
        }
        None => out.push_str("No config directory, changes last for this session only"),
    }
    out
}

pub fn render_help() -> &'static str {
    "Commands:
  define <word>       look a word up (also: find, search)
  play <n>            play the n-th pronunciation of the last result
  back                show the last result again
  settings            show the settings
  set <key> <value>   change a setting
  help                show this message
  quit                leave (also: exit, q)"
}

#[cfg(test)]
mod tests {
    use dictionary::{Definition, Meaning, Phonetic};

    use super::*;

    fn hello() -> WordDefinition {
        WordDefinition {
            word: "hello".to_owned(),
            phonetic: Some("/həˈloʊ/".to_owned()),
            phonetics: Some(vec![
                Phonetic {
                    text: Some("/həˈloʊ/".to_owned()),
                    audio: Some("https://example.com/hello-us.mp3".to_owned()),
                },
                Phonetic {
                    text: Some("/hɛˈləʊ/".to_owned()),
                    audio: Some(String::new()),
                },
            ]),
            meanings: vec![Meaning {
                part_of_speech: "exclamation".to_owned(),
                definitions: vec![
                    Definition {
                        definition: "used as a greeting".to_owned(),
                        example: Some("hello there!".to_owned()),
                    },
                    Definition {
                        definition: "used to attract attention".to_owned(),
                        example: None,
                    },
                ],
            }],
        }
    }

    #[test]
    fn resting_views() {
        assert_eq!(render_status(&LookupStatus::Idle), IDLE);
        assert_eq!(render_status(&LookupStatus::Loading), LOADING);
        assert_eq!(render_status(&LookupStatus::Error), ERROR);
        assert_eq!(
            render_status(&LookupStatus::Success(Vec::new())),
            "No definitions found."
        );
    }

    #[test]
    fn word_details() {
        let rendered = render_status(&LookupStatus::Success(vec![hello()]));
        assert_eq!(
            rendered,
            "Word: hello
Phonetic: /həˈloʊ/
  [1] Play audio (https://example.com/hello-us.mp3)
  exclamation
    Definition: used as a greeting
    Example: hello there!
    Definition: used to attract attention"
        );
    }

    #[test]
    fn audio_numbering_continues_across_entries() {
        let mut second = hello();
        second.phonetic = None;
        second.phonetics = Some(vec![Phonetic {
            text: None,
            audio: Some("https://example.com/hello-uk.mp3".to_owned()),
        }]);
        let words = vec![hello(), second];

        let rendered = render_status(&LookupStatus::Success(words.clone()));

        assert!(rendered.contains("[2] Play audio (https://example.com/hello-uk.mp3)"));
        assert_eq!(rendered.matches("Phonetic:").count(), 1);
        assert_eq!(
            audio_urls(&words),
            vec![
                "https://example.com/hello-us.mp3",
                "https://example.com/hello-uk.mp3"
            ]
        );
    }

    #[test]
    fn settings_list_every_key() {
        let rendered = render_settings(&AppConfig::default(), Some(Path::new("/tmp/config.toml")));
        for key in AppConfig::KEYS {
            assert!(rendered.contains(key), "{key} missing from {rendered}");
        }
        assert!(rendered.ends_with("Stored in /tmp/config.toml"));
    }
}
