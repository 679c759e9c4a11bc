use crate::cli::{prepare, script, write, Cli, Command, PrepareArgs, ScriptArgs, Verbosity, WriteArgs};
use crate::{refseq, Store};
use clap::Parser;
use color_eyre::eyre::{Report, Result};

#[test]
fn verbosity_for_rust_log() {
    assert_eq!(Verbosity::default().to_string(), "info");
    assert_eq!(Verbosity::Debug.to_string(), "debug");
}

#[test]
fn parse_build() {
    let args = Cli::parse_from(["ideogen", "build", "--keep-source", "--data-dir", "data"]);
    match args.command {
        Command::Build(build) => {
            assert!(build.keep_source);
            assert!(!build.force_download);
        }
        _ => panic!("expected build command"),
    }
    assert_eq!(args.data_dir, Some("data".into()));
}

#[test]
fn parse_write_defaults() {
    let args = Cli::parse_from(["ideogen", "write", "TP53", "EGFR"]);
    match args.command {
        Command::Write(write) => {
            assert_eq!(write.symbols, ["TP53", "EGFR"]);
            assert_eq!(write.container, "ideo-container");
            assert_eq!(write.title, "Ideogram");
            assert_eq!(write.output, None);
        }
        _ => panic!("expected write command"),
    }
}

#[test]
fn parse_script_requires_input() {
    assert!(Cli::try_parse_from(["ideogen", "script"]).is_err());
    assert!(Cli::try_parse_from(["ideogen", "script", "TP53", "--annotations", "a.json"]).is_err());
    assert!(Cli::try_parse_from(["ideogen", "script", "--annotations", "a.json"]).is_ok());
}

#[test]
fn parse_global_verbosity() {
    let args = Cli::parse_from(["ideogen", "sources", "--verbosity", "debug"]);
    assert!(matches!(args.verbosity, Verbosity::Debug));
    assert!(matches!(args.command, Command::Sources));
}

#[test]
fn prepare_rejects_bad_container() {
    let args = PrepareArgs { container: "#bad".to_string() };
    assert!(prepare(&args).is_err());
}

#[tokio::test]
async fn script_from_annotations_file() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let store = Store::new(dir.path());
    let input = dir.path().join("annotations.json");
    let output = dir.path().join("ideogram.js");
    std::fs::write(&input, r#"{"chr1": [{"start": 0, "end": 100}]}"#)?;

    let args = ScriptArgs {
        symbols: Vec::new(),
        annotations: Some(input),
        container: "viz1".to_string(),
        output: Some(output.clone()),
    };
    script(&args, &store).await?;

    let contents = std::fs::read_to_string(&output)?;
    assert!(contents.contains("container: '#viz1'"));
    assert!(contents.contains(r#"annotations: {"chr1":[{"start":0,"end":100}]}"#));
    // no lookup, so nothing was downloaded
    assert!(!store.contains("refseq_human.tsv"));
    Ok(())
}

#[tokio::test]
async fn script_from_invalid_json() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let store = Store::new(dir.path());
    let input = dir.path().join("annotations.json");
    std::fs::write(&input, "{not json")?;

    let args = ScriptArgs {
        symbols: Vec::new(),
        annotations: Some(input),
        container: "viz1".to_string(),
        output: None,
    };
    assert!(script(&args, &store).await.is_err());
    Ok(())
}

#[test]
fn parse_write_output() {
    let args = Cli::parse_from(["ideogen", "write", "TP53", "-o", "tp53.html"]);
    match args.command {
        Command::Write(write) => assert_eq!(write.output, Some("tp53.html".into())),
        _ => panic!("expected write command"),
    }
}

#[tokio::test]
async fn write_to_file() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let store = Store::new(dir.path());
    refseq::tests::seed_store(&store)?;
    let output = dir.path().join("pages").join("tp53.html");

    let args = WriteArgs {
        symbols: vec!["TP53".to_string()],
        output: Some(output.clone()),
        container: "viz1".to_string(),
        title: "TP53".to_string(),
    };
    write(&args, &store).await?;

    let page = std::fs::read_to_string(&output)?;
    assert!(page.contains("<title>TP53</title>"));
    assert!(page.contains(r#""name":"TP53""#));
    Ok(())
}
