use super::*;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("pkgdag").chain(args.iter().copied()))
}

#[test]
fn test_sort_command() {
    let cli = parse(&["sort", "--reverse"]).unwrap();
    assert!(matches!(cli.command, Commands::Sort { reverse: true }));
    assert_eq!(cli.command.name(), "sort");
}

#[test]
fn test_global_options_precede_command() {
    let cli = parse(&["--allow-unresolved", "--arch", "aarch64", "nodes", "--name", "zlib"]).unwrap();
    assert!(cli.config.allow_unresolved);
    assert_eq!(cli.config.arch, "aarch64");
    assert!(matches!(cli.command, Commands::Nodes { name: Some(ref n) } if n == "zlib"));
}

#[test]
fn test_subgraph_requires_a_selection() {
    assert!(parse(&["subgraph"]).is_err());
    assert!(parse(&["subgraph", "--roots", "a", "--leaves", "b"]).is_err());

    let cli = parse(&["subgraph", "--leaves", "glibc,zlib"]).unwrap();
    match cli.command {
        Commands::Subgraph { roots, leaves } => {
            assert!(roots.is_empty());
            assert_eq!(leaves, ["glibc", "zlib"]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_filter_predicates_are_exclusive() {
    assert!(parse(&["filter"]).is_err());
    assert!(parse(&["filter", "--local", "--not-local"]).is_err());

    let cli = parse(&["filter", "--source", "https://a,https://b"]).unwrap();
    assert!(
        matches!(cli.command, Commands::Filter { ref sources, local: false, .. } if sources.len() == 2)
    );
}

#[test]
fn test_command_is_required() {
    assert!(parse(&[]).is_err());
}

#[test]
fn test_global_options_follow_command() {
    let cli = parse(&[
        "sort",
        "--reverse",
        "--dir",
        "/srv/defs",
        "-r",
        "https://mirror.example/main",
        "--allow-unresolved",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Sort { reverse: true }));
    assert_eq!(cli.config.workdir, Some(std::path::PathBuf::from("/srv/defs")));
    assert_eq!(cli.config.repositories, ["https://mirror.example/main"]);
    assert!(cli.config.allow_unresolved);
}
