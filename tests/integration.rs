use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn selgraph(fixture: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_selgraph"))
        .args(args)
        .current_dir(fixture)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
    return child.wait_with_output().unwrap();
}

fn site() -> &'static Path {
    return Path::new("tests/fixtures/site");
}

fn json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    return serde_json::from_slice(&output.stdout).unwrap();
}

fn graph_of_site() -> Value {
    let discovered = selgraph(site(), &["discover"], "");
    let units = String::from_utf8(discovered.stdout).unwrap();
    return json(&selgraph(site(), &["build-graph"], &units));
}

#[test]
fn discover_lists_stylesheets_and_documents() {
    let units = json(&selgraph(site(), &["discover"], "{}"));

    assert_eq!(
        units,
        serde_json::json!([{
            "name": "site",
            "type": "basic-css",
            "dir": ".",
            "files": ["css/site.css", "index.html", "plain.html"],
        }])
    );
}

#[test]
fn discover_honours_request_excludes() {
    let units = json(&selgraph(site(), &["scan"], r#"{"exclude": ["plain"]}"#));
    assert_eq!(units[0]["files"], serde_json::json!(["css/site.css", "index.html"]));
}

#[test]
fn build_graph_emits_definitions_in_stylesheet_order() {
    let graph = graph_of_site();

    let names: Vec<&str> = graph["defs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| return d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["#app", ".nav-item", ".title", ".card"]);

    let app = &graph["defs"][0];
    assert_eq!(app["path"], "css/site.css#app");
    assert_eq!(app["unit"], "site");
    assert_eq!(app["defStart"], 1);
    assert_eq!(app["defEnd"], 4);
    assert_eq!(app["data"], serde_json::json!({"keyword": "selector", "kind": "id"}));
}

#[test]
fn build_graph_links_html_usages_to_definitions() {
    let graph = graph_of_site();
    let html = std::fs::read_to_string(site().join("index.html")).unwrap();

    let usages: Vec<(String, String)> = graph["refs"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| return r["file"] == "index.html")
        .map(|r| {
            let start = usize::try_from(r["start"].as_u64().unwrap()).unwrap();
            let end = usize::try_from(r["end"].as_u64().unwrap()).unwrap();
            return (html[start..end].to_string(), r["defPath"].as_str().unwrap().to_string());
        })
        .collect();

    assert_eq!(
        usages,
        vec![
            ("app".to_string(), "css/site.css#app".to_string()),
            ("title".to_string(), "css/site.css.title".to_string()),
            ("nav-item".to_string(), "css/site.css.nav-item".to_string()),
            ("card".to_string(), "css/site.css.card".to_string()),
        ]
    );
}

#[test]
fn build_graph_references_property_documentation() {
    let graph = graph_of_site();

    let docs: Vec<&str> = graph["refs"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| return r["defUnitType"] == "URL")
        .map(|r| {
            assert_eq!(r["defUnit"], "MDN");
            return r["defPath"].as_str().unwrap();
        })
        .collect();
    assert_eq!(
        docs,
        vec![
            "https://developer.mozilla.org/en-US/docs/Web/CSS/color",
            "https://developer.mozilla.org/en-US/docs/Web/CSS/transform",
            "https://developer.mozilla.org/en-US/docs/Web/CSS/padding",
        ]
    );
}

#[test]
fn page_without_linked_stylesheet_has_no_references() {
    let graph = graph_of_site();
    let refs = graph["refs"].as_array().unwrap();

    assert!(refs.iter().all(|r| return r["file"] != "plain.html"));
    assert_eq!(refs.len(), 11);
}

#[test]
fn build_graph_accepts_a_bare_unit() {
    let unit = r#"{"Name":"site","Type":"basic-css","Dir":".","Files":["css/site.css"]}"#;
    let graph = json(&selgraph(site(), &["graph"], unit));
    assert_eq!(graph["defs"].as_array().unwrap().len(), 4);
}

#[test]
fn multiple_units_fail() {
    let units = r#"[{"name":"a","files":[]},{"name":"b","files":[]}]"#;
    let output = selgraph(site(), &["build-graph"], units);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Multiple Units"));
}

#[test]
fn malformed_request_fails() {
    let output = selgraph(site(), &["build-graph"], "not json");
    assert!(!output.status.success());
}

#[test]
fn unit_dir_is_honoured_from_elsewhere() {
    let dir = tempfile::tempdir().unwrap();
    let web = dir.path().join("web");
    std::fs::create_dir(&web).unwrap();
    std::fs::write(web.join("a.css"), ".hero { margin: 0 }").unwrap();
    std::fs::write(
        web.join("a.html"),
        r#"<link rel="stylesheet" href="a.css"><section class="hero"></section>"#,
    )
    .unwrap();

    let unit = r#"{"name":"web","type":"basic-css","dir":"web","files":["a.css","a.html"]}"#;
    let graph = json(&selgraph(dir.path(), &["build-graph"], unit));
    assert_eq!(graph["refs"].as_array().unwrap().len(), 3);
}

#[test]
fn malformed_project_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".selgraph.toml"), "include = not-a-list").unwrap();

    let output = selgraph(dir.path(), &["discover"], "");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid TOML"));
}
