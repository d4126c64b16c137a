use html::NodeKey;
use print_footnotes::TAG_NAME;
use runtime::Page;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Fixture {
    scenario: Vec<Scenario>,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    links: Vec<LinkSpec>,
    entries: Vec<String>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct LinkSpec {
    href: Option<String>,
    name: Option<String>,
    #[serde(default)]
    opt_out: bool,
}

#[derive(Debug, Deserialize)]
struct Step {
    action: Action,
    visible: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Action {
    Print,
    Screen,
    Frame,
    Connect,
    Disconnect,
}

fn load_fixture() -> Fixture {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/print_scenarios.toml");
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"));
    toml::from_str(&content).unwrap_or_else(|err| panic!("invalid fixture {path:?}: {err}"))
}

fn build(page: &mut Page, links: &[LinkSpec]) -> NodeKey {
    let doc = page.document_mut();
    let host = doc.create_element(TAG_NAME);
    for (i, link) in links.iter().enumerate() {
        let p = doc.create_element("p");
        doc.append_child(host, p).unwrap();
        let mut attrs = Vec::new();
        if let Some(href) = &link.href {
            attrs.push(("href", href.as_str()));
        }
        if let Some(name) = &link.name {
            attrs.push(("name", name.as_str()));
        }
        let a = doc.create_element_with_attrs("a", &attrs);
        if link.opt_out {
            doc.toggle_attr(a, "no-print-footnote", true).unwrap();
        }
        doc.append_child(p, a).unwrap();
        doc.append_text(a, &format!("link {i}")).unwrap();
    }
    host
}

fn run(scenario: &Scenario) {
    let name = &scenario.name;
    let mut page = Page::new();
    let host = build(&mut page, &scenario.links);
    let root = page.document().root();
    page.connect(root, host).unwrap();
    let ids = page.define_elements().unwrap();
    assert_eq!(ids.len(), 1, "[{name}] one element expected");
    let id = ids[0];

    let element = page.element(id).unwrap();
    let ctl = element.controller();
    let doc = page.document();
    let entries: Vec<_> = ctl.entries().iter().map(|e| doc.text_content(*e)).collect();
    assert_eq!(entries, scenario.entries, "[{name}] entries");
    assert_eq!(ctl.markers().len(), scenario.entries.len(), "[{name}] markers");
    for (i, (marker, entry)) in ctl.markers().iter().zip(ctl.entries()).enumerate() {
        let expected = (i + 1).to_string();
        assert_eq!(doc.text_content(*marker), expected, "[{name}] marker {i}");
        assert_eq!(doc.attr(*entry, "value"), Some(expected.as_str()), "[{name}] entry {i}");
    }
    assert_eq!(
        ctl.footnote_list().is_some(),
        !scenario.entries.is_empty(),
        "[{name}] footnote container"
    );

    for (n, step) in scenario.steps.iter().enumerate() {
        match step.action {
            Action::Print => {
                page.emulate_media(true);
            }
            Action::Screen => {
                page.emulate_media(false);
            }
            Action::Frame => {
                page.run_frame();
            }
            Action::Connect => page.connect(root, host).unwrap(),
            Action::Disconnect => page.disconnect(host).unwrap(),
        }

        let ctl = page.element(id).unwrap().controller();
        let doc = page.document();
        let toggled = ctl
            .markers()
            .iter()
            .copied()
            .chain(ctl.footnote_list().map(|list| list.nav));
        for node in toggled {
            assert_eq!(
                !doc.has_attr(node, "hidden"),
                step.visible,
                "[{name}] step {n} ({:?}) node {node:?}",
                step.action
            );
        }
    }
}

#[test]
fn print_scenarios() {
    let fixture = load_fixture();
    assert!(!fixture.scenario.is_empty());
    for scenario in &fixture.scenario {
        run(scenario);
    }
}
