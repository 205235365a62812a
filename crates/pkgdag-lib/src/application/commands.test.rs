use super::*;
use crate::dag::GraphOptions;
use crate::testing::{DefinitionDir, definition, graph, graph_with, local_key};

fn chain() -> Graph {
    graph(vec![
        definition("a", "1.0", &["b"]),
        definition("b", "1.0", &["c"]),
        definition("c", "1.0", &[]),
    ])
    .unwrap()
}

fn run(command: Commands, graph: &Graph) -> Vec<String> {
    let mut out = Vec::new();
    execute_command_with_writer(command, graph, &mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_sort_prints_keys_in_both_orders() {
    let graph = chain();
    let (a, b, c) = (local_key("a", "1.0"), local_key("b", "1.0"), local_key("c", "1.0"));

    assert_eq!(
        run(Commands::Sort { reverse: true }, &graph),
        [c.clone(), b.clone(), a.clone()]
    );
    assert_eq!(run(Commands::Sort { reverse: false }, &graph), [a, b, c]);
}

#[test]
fn test_deps_and_nodes() {
    let graph = chain();

    assert_eq!(
        run(
            Commands::Deps {
                key: local_key("a", "1.0")
            },
            &graph
        ),
        [local_key("b", "1.0")]
    );
    assert!(run(Commands::Deps { key: "nope".to_string() }, &graph).is_empty());
    assert_eq!(run(Commands::Nodes { name: None }, &graph).len(), 3);
    assert_eq!(
        run(
            Commands::Nodes {
                name: Some("c".to_string())
            },
            &graph
        ),
        [local_key("c", "1.0")]
    );
    assert_eq!(run(Commands::Packages, &graph), ["a", "b", "c"]);
}

#[test]
fn test_subgraph_commands() {
    let graph = chain();

    let roots = run(
        Commands::Subgraph {
            roots: vec!["b".to_string()],
            leaves: Vec::new(),
        },
        &graph,
    );
    assert_eq!(roots, [local_key("c", "1.0"), local_key("b", "1.0")]);

    let leaves = run(
        Commands::Subgraph {
            roots: Vec::new(),
            leaves: vec!["b".to_string()],
        },
        &graph,
    );
    assert_eq!(leaves, [local_key("b", "1.0"), local_key("a", "1.0")]);

    let mut out = Vec::new();
    let both = Commands::Subgraph {
        roots: vec!["a".to_string()],
        leaves: vec!["c".to_string()],
    };
    assert!(execute_command_with_writer(both, &graph, &mut out).is_err());
}

#[test]
fn test_filter_command() {
    let graph = graph_with(
        vec![definition("a", "1.0", &["zzz"])],
        GraphOptions::default().allow_unresolved(true),
    )
    .unwrap();

    let local = run(
        Commands::Filter {
            local: true,
            not_local: false,
            sources: Vec::new(),
            not_sources: Vec::new(),
        },
        &graph,
    );
    assert_eq!(local, [local_key("a", "1.0")]);

    let remote = run(
        Commands::Filter {
            local: false,
            not_local: true,
            sources: Vec::new(),
            not_sources: Vec::new(),
        },
        &graph,
    );
    assert_eq!(remote, ["zzz:@"]);
}

#[test]
fn test_load_graph_from_workdir() {
    let dir = DefinitionDir::new().unwrap();
    dir.write_definition(&definition("a", "1.0", &["b"])).unwrap();
    dir.write_definition(&definition("b", "1.0", &[])).unwrap();

    let mut config = AppConfig {
        workdir: Some(dir.path().to_path_buf()),
        ..AppConfig::default()
    };
    config.validate().unwrap();

    let graph = load_graph(&config).unwrap();
    assert!(graph.has_edge(&local_key("a", "1.0"), &local_key("b", "1.0")));
}

#[test]
fn test_load_graph_reports_build_failures() {
    let dir = DefinitionDir::new().unwrap();
    dir.write_definition(&definition("a", "1.0", &["missing"])).unwrap();

    let mut config = AppConfig {
        workdir: Some(dir.path().to_path_buf()),
        ..AppConfig::default()
    };
    config.validate().unwrap();

    let err = load_graph(&config).unwrap_err();
    assert!(format!("{err:#}").contains("unable to resolve dependency missing"));
}
