//! Corpus and lexicon fixtures written to temporary directories

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// A small film-trivia corpus whose questions chain through shared entities.
///
/// Alien -> Ridley Scott -> South Shields -> Tyne and Wear, plus a second
/// question about Ridley Scott that converges with the first.
pub fn scenario_corpus() -> Vec<Value> {
    vec![
        json!({"question": "Who directed Alien?", "answers": ["Ridley Scott"], "passage_id": "P0"}),
        json!({"question": "Where was Ridley Scott born?", "answers": ["South Shields"], "passage_id": "P1"}),
        json!({"question": "Which county is South Shields in?", "answers": ["Tyne and Wear"], "passage_id": "P2"}),
        json!({"question": "What region contains Tyne and Wear?", "answers": ["North East England"], "passage_id": "P3"}),
        json!({"question": "Who directed Gladiator?", "answers": ["Ridley Scott"], "passage": {"id": "P4"}}),
        json!({"question": "Who wrote Frankenstein?", "answers": ["Mary Shelley"], "passages": [{"id": "P5"}]}),
    ]
}

/// Lexicon covering every entity of [`scenario_corpus`] except Frankenstein
pub fn scenario_lexicon() -> &'static str {
    "- surface: Alien\n  id: Q103569\n\
     - surface: Gladiator\n  id: Q128518\n\
     - surface: Ridley Scott\n  id: Q56005\n  label: PERSON\n\
     - surface: South Shields\n  id: Q215609\n\
     - surface: Tyne and Wear\n  id: Q23087\n\
     - surface: North East England\n  id: Q47967\n\
     - surface: Mary Shelley\n  id: Q47152\n"
}

pub fn write_corpus(dir: &Path, name: &str, records: &[Value]) -> PathBuf {
    let path = dir.join(name);
    let mut content = String::new();
    for record in records {
        content.push_str(&record.to_string());
        content.push('\n');
    }
    std::fs::write(&path, content).expect("write corpus fixture");
    path
}

pub fn write_lexicon(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("lexicon.yaml");
    std::fs::write(&path, content).expect("write lexicon fixture");
    path
}
