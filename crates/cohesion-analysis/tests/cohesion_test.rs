use cohesion_analysis::cohesion::{build_graph, CohesionSummary, DependencyGraph};
use cohesion_analysis::loader::{LoadedModule, ModuleLoader};
use cohesion_core::config::ScanConfig;

fn load_module(files: &[(&str, &str)]) -> LoadedModule {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in files {
        std::fs::write(dir.path().join(name), source).unwrap();
    }
    let loader = ModuleLoader::new(dir.path(), ScanConfig::default()).unwrap();
    let mut result = loader.load_all().unwrap();
    assert!(result.is_clean(), "unexpected load errors: {:?}", result.errors);
    assert_eq!(result.data.len(), 1);
    result.data.remove(0)
}

fn graph_of(source: &str) -> DependencyGraph {
    load_module(&[("m.go", source)]).dependency_graph()
}

fn node_names(graph: &DependencyGraph) -> Vec<String> {
    graph
        .sorted_nodes()
        .into_iter()
        .map(|(_, node)| node.symbol.name.clone())
        .collect()
}

fn edges(graph: &DependencyGraph) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for (idx, node) in graph.sorted_nodes() {
        for (_, target) in graph.sorted_out_edges(idx) {
            out.push((node.symbol.name.clone(), target.symbol.name.clone()));
        }
    }
    out
}

fn edge(from: &str, to: &str) -> (String, String) {
    (from.to_string(), to.to_string())
}

#[test]
fn call_chain_forms_one_component() {
    let graph = graph_of(
        "package m\n\nfunc a() {\n\tb()\n\tc()\n}\n\nfunc b() { c() }\n\nfunc c() {}\n",
    );
    assert_eq!(node_names(&graph), vec!["a", "b", "c"]);
    assert_eq!(edges(&graph), vec![edge("a", "b"), edge("a", "c"), edge("b", "c")]);

    let summary = CohesionSummary::from_graph(&graph);
    assert_eq!(summary.connected_components, 1);
    assert_eq!(summary.average_degree, Some(1.0));
    assert_eq!(summary.density, Some(1.0));
}

#[test]
fn unrelated_variables_are_separate_components() {
    let graph = graph_of("package m\n\nvar x = 1\n\nvar y = 2\n");
    assert_eq!(node_names(&graph), vec!["x", "y"]);
    assert!(edges(&graph).is_empty());

    let summary = CohesionSummary::from_graph(&graph);
    assert_eq!(summary.connected_components, 2);
    assert_eq!(summary.average_degree, Some(0.0));
    assert_eq!(summary.density, Some(0.0));
}

#[test]
fn recursion_adds_no_self_loop() {
    let graph = graph_of("package m\n\nfunc f() { f() }\n");
    assert_eq!(node_names(&graph), vec!["f"]);
    assert_eq!(graph.edge_count(), 0);

    let summary = CohesionSummary::from_graph(&graph);
    assert_eq!(summary.connected_components, 1);
    assert_eq!(summary.average_degree, Some(0.0));
    assert_eq!(summary.density, None);
}

#[test]
fn only_module_local_symbols_become_nodes() {
    let graph = graph_of(
        r#"package m

import "fmt"

var counter int

func run(n int) int {
	local := n
	fmt.Println(local)
	counter++
	return helper(local)
}

func helper(v int) int { return v }
"#,
    );
    assert_eq!(node_names(&graph), vec!["counter", "run", "helper"]);
    assert_eq!(edges(&graph), vec![edge("run", "counter"), edge("run", "helper")]);
}

#[test]
fn local_shadowing_hides_package_function() {
    let graph = graph_of(
        "package m\n\nfunc helper() {}\n\nfunc run() {\n\thelper := func() {}\n\thelper()\n}\n",
    );
    assert_eq!(node_names(&graph), vec!["helper", "run"]);
    assert!(edges(&graph).is_empty());
}

#[test]
fn closures_attribute_to_enclosing_function() {
    let graph = graph_of(
        "package m\n\nfunc target() {}\n\nfunc outer() {\n\tf := func() { target() }\n\tf()\n}\n",
    );
    assert_eq!(edges(&graph), vec![edge("outer", "target")]);
}

#[test]
fn methods_resolve_through_receivers_params_and_constructors() {
    let graph = graph_of(
        r#"package m

type Stack struct {
	items []int
}

func NewStack() *Stack { return &Stack{} }

func (s *Stack) Push(v int) {
	s.items = append(s.items, v)
	s.grow()
}

func (s *Stack) grow() {}

func fill(st *Stack) { st.Push(1) }

func build() {
	s := NewStack()
	s.Push(2)
}
"#,
    );
    assert_eq!(
        node_names(&graph),
        vec!["Stack", "NewStack", "Push", "grow", "fill", "build"]
    );
    let found = edges(&graph);
    for expected in [
        edge("NewStack", "Stack"),
        edge("Push", "Stack"),
        edge("Push", "grow"),
        edge("grow", "Stack"),
        edge("fill", "Stack"),
        edge("fill", "Push"),
        edge("build", "NewStack"),
        edge("build", "Push"),
    ] {
        assert!(found.contains(&expected), "missing {expected:?} in {found:?}");
    }
    assert_eq!(found.len(), 8);
}

#[test]
fn methods_with_equal_names_stay_distinct() {
    let graph = graph_of(
        r#"package m

type A struct{}
type B struct{}

func (A) Name() string { return "a" }
func (B) Name() string { return "b" }

func both() string { return A{}.Name() + B{}.Name() }
"#,
    );
    assert_eq!(graph.node_count(), 5);
    let from_both: Vec<_> = edges(&graph)
        .into_iter()
        .filter(|(from, _)| from == "both")
        .collect();
    assert_eq!(
        from_both,
        vec![edge("both", "A"), edge("both", "B"), edge("both", "Name"), edge("both", "Name")]
    );
}

#[test]
fn struct_literal_keys_are_not_package_symbols() {
    let graph = graph_of(
        r#"package m

var name = "x"

type Config struct {
	name string
}

func newConfig() Config { return Config{name: "y"} }
"#,
    );
    assert_eq!(edges(&graph), vec![edge("newConfig", "Config")]);
}

#[test]
fn map_literal_keys_resolve_as_values() {
    let graph = graph_of(
        r#"package m

const key = "k"

func table() map[string]int { return map[string]int{key: 1} }
"#,
    );
    assert_eq!(edges(&graph), vec![edge("table", "key")]);
}

#[test]
fn types_reference_their_field_types() {
    let graph = graph_of(
        "package m\n\ntype Inner struct{}\n\ntype Outer struct {\n\tin Inner\n\tptr *Inner\n}\n",
    );
    assert_eq!(edges(&graph), vec![edge("Outer", "Inner")]);
}

#[test]
fn files_of_one_package_share_a_graph() {
    let module = load_module(&[
        ("a.go", "package m\n\nfunc a() { b() }\n"),
        ("b.go", "package m\n\nfunc b() {}\n"),
    ]);
    assert_eq!(module.files.len(), 2);
    let graph = module.dependency_graph();
    assert_eq!(edges(&graph), vec![edge("a", "b")]);
}

#[test]
fn undefined_names_skip_only_their_expression() {
    let module = load_module(&[("m.go", "package m\n\nfunc f() {\n\tmissing()\n\tg()\n}\n\nfunc g() {}\n")]);
    let (graph, failures) = build_graph(&module.semantics, &module.roots());
    assert!(failures >= 1);
    assert_eq!(edges(&graph), vec![edge("f", "g")]);
}

#[test]
fn syntax_errors_yield_a_partial_graph() {
    let module = load_module(&[(
        "m.go",
        "package m\n\nfunc good() { helper() }\n\nfunc helper() {}\n\nfunc broken() { helper( }\n",
    )]);
    assert!(module.syntax_errors() > 0);
    let graph = module.dependency_graph();
    assert!(edges(&graph).contains(&edge("good", "helper")));
}

#[test]
fn long_operator_chains_resolve_without_recursion() {
    let terms = " + 1".repeat(10_000);
    let graph = graph_of(&format!(
        "package m\n\nfunc f() int {{ return 1 }}\n\nfunc g() int {{ return f(){terms} }}\n"
    ));
    assert_eq!(node_names(&graph), vec!["f", "g"]);
    assert_eq!(edges(&graph), vec![edge("g", "f")]);
}

#[test]
fn failed_long_chain_is_walked_part_by_part() {
    let terms = " + 1".repeat(10_000);
    let module = load_module(&[(
        "m.go",
        &format!("package m\n\nfunc f() int {{ return 1 }}\n\nfunc g() int {{ return missing() + f(){terms} }}\n"),
    )]);
    let (graph, failures) = build_graph(&module.semantics, &module.roots());
    assert!(failures >= 1);
    assert_eq!(edges(&graph), vec![edge("g", "f")]);
}

#[test]
fn long_else_if_chains_keep_their_references() {
    let mut body = String::from("\tif n == 0 {\n\t\tf()\n\t}");
    for i in 1..2_000 {
        body.push_str(&format!(" else if n == {i} {{\n\t\tf()\n\t}}"));
    }
    let graph = graph_of(&format!(
        "package m\n\nfunc f() {{}}\n\nfunc g(n int) {{\n{body} else {{\n\t\th()\n\t}}\n}}\n\nfunc h() {{}}\n"
    ));
    assert_eq!(edges(&graph), vec![edge("g", "f"), edge("g", "h")]);
}

#[test]
fn nesting_past_the_limit_fails_only_that_subtree() {
    let depth = 300;
    let open = "func() {\n".repeat(depth);
    let close = "}()\n".repeat(depth);
    let module = load_module(&[(
        "m.go",
        &format!(
            "package m\n\nfunc f() {{}}\n\nfunc deep() {{\n{open}f()\n{close}}}\n\nfunc shallow() {{ f() }}\n"
        ),
    )]);
    assert_eq!(module.syntax_errors(), 0);
    let (graph, failures) = build_graph(&module.semantics, &module.roots());
    assert!(failures >= 1);
    assert_eq!(graph.node_count(), 3);
    assert!(edges(&graph).contains(&edge("shallow", "f")));
}
