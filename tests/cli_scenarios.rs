use std::io::Write;

use clap::Parser;
use rankext::cli::args::{Command, RankextArgs};
use rankext::cli::commands::{expand_query, score_fixture};
use rankext::config::RankConfig;
use rankext::error::{RankError, Result};
use rankext::extension::ExtensionRegistry;
use tempfile::NamedTempFile;

const FIXTURE: &str = r#"{
  "index_stats": { "avg_doc_len": 20.0, "num_docs": 3, "num_terms": 40 },
  "documents": [
    {
      "id": "far",
      "metadata": { "score": 1.0, "max_freq": 1, "len": 20 },
      "result": {
        "kind": "intersect",
        "children": [
          { "kind": "term", "freq": 1, "term": { "text": "hello", "idf": 1.0 }, "offsets": [0] },
          { "kind": "term", "freq": 1, "term": { "text": "world", "idf": 1.0 }, "offsets": [10] }
        ]
      }
    },
    {
      "id": "near",
      "metadata": { "score": 1.0, "max_freq": 1, "len": 20 },
      "result": {
        "kind": "intersect",
        "children": [
          { "kind": "term", "freq": 1, "term": { "text": "hello", "idf": 1.0 }, "offsets": [3] },
          { "kind": "term", "freq": 1, "term": { "text": "world", "idf": 1.0 }, "offsets": [4] }
        ]
      }
    },
    {
      "id": "unscored",
      "metadata": { "score": 0.0, "max_freq": 1, "len": 20 },
      "result": { "kind": "virtual", "freq": 1 }
    }
  ]
}"#;

fn fixture_file(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{content}")?;
    Ok(file)
}

fn parse(argv: &[&str]) -> RankextArgs {
    RankextArgs::parse_from(argv)
}

#[test]
fn score_command_ranks_fixture_documents() -> Result<()> {
    let file = fixture_file(FIXTURE)?;
    let path = file.path().to_string_lossy().to_string();
    let args = parse(&["rankext", "score", &path, "--explain"]);
    let Command::Score(score_args) = args.command else {
        panic!("expected score command");
    };

    let report = score_fixture(&score_args, &RankConfig::default(), &ExtensionRegistry::with_defaults())?;

    let ids: Vec<&str> = report.ranked.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["near", "far", "unscored"]);
    assert_eq!(report.ranked[0].score, 2.0);
    assert_eq!(report.ranked[1].score, 0.2);
    assert_eq!(report.ranked[2].score, 0.0);
    assert!(report.ranked.iter().all(|d| d.explanation.is_some()));
    assert!(report.filtered_out.is_empty());
    Ok(())
}

#[test]
fn score_command_honors_scorer_override() -> Result<()> {
    let file = fixture_file(FIXTURE)?;
    let path = file.path().to_string_lossy().to_string();
    let args = parse(&["rankext", "score", &path, "--scorer", "DISMAX"]);
    let Command::Score(score_args) = args.command else {
        panic!("expected score command");
    };

    let report = score_fixture(&score_args, &RankConfig::default(), &ExtensionRegistry::with_defaults())?;
    assert_eq!(report.scorer, "DISMAX");
    // every document matched twice, except the virtual one
    let scores: Vec<f64> = report.ranked.iter().map(|d| d.score).collect();
    assert_eq!(scores, vec![2.0, 2.0, 1.0]);
    assert!(report.ranked.iter().all(|d| d.explanation.is_none()));
    Ok(())
}

#[test]
fn score_command_rejects_bad_input() -> Result<()> {
    let registry = ExtensionRegistry::with_defaults();

    let file = fixture_file(FIXTURE)?;
    let path = file.path().to_string_lossy().to_string();
    let args = parse(&["rankext", "score", &path, "--scorer", "NOPE"]);
    let Command::Score(score_args) = args.command else {
        panic!("expected score command");
    };
    let err = score_fixture(&score_args, &RankConfig::default(), &registry).unwrap_err();
    assert!(matches!(err, RankError::InvalidConfig(_)));

    let broken = fixture_file(
        r#"{"documents": [{"id": "x", "metadata": {"score": 1.0, "max_freq": 1, "len": 1},
            "result": {"kind": "union", "children": []}}]}"#,
    )?;
    let path = broken.path().to_string_lossy().to_string();
    let args = parse(&["rankext", "score", &path]);
    let Command::Score(score_args) = args.command else {
        panic!("expected score command");
    };
    let err = score_fixture(&score_args, &RankConfig::default(), &registry).unwrap_err();
    assert!(matches!(err, RankError::InvalidResult(_)));
    Ok(())
}

#[test]
fn expand_command_uses_schema_and_synonyms() -> Result<()> {
    let schema = fixture_file(r#"[{"name": "title"}, {"name": "author", "phonetic": true}]"#)?;
    let synonyms = fixture_file(r#"[["sneakers", "shoes", "trainers"]]"#)?;
    let schema_path = schema.path().to_string_lossy().to_string();
    let synonyms_path = synonyms.path().to_string_lossy().to_string();

    let args = parse(&[
        "rankext",
        "expand",
        "Running shoes",
        "--fields",
        "title",
        "--schema",
        &schema_path,
        "--synonyms",
        &synonyms_path,
    ]);
    let Command::Expand(expand_args) = args.command else {
        panic!("expected expand command");
    };

    let report = expand_query(&expand_args, &RankConfig::default(), &ExtensionRegistry::with_defaults())?;
    assert_eq!(report.expander, "DEFAULT");
    assert_eq!(report.language, "english");
    assert_eq!(report.tokens.len(), 2);
    assert_eq!(report.tokens[0].token, "running");
    assert_eq!(report.tokens[0].expansions, vec!["+run", "running"]);
    assert_eq!(report.tokens[1].token, "shoes");
    assert_eq!(report.tokens[1].expansions, vec!["~0", "+shoe", "shoes"]);
    Ok(())
}
