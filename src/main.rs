use html::Document;
use print_footnotes::{OPT_OUT_ATTR, TAG_NAME};
use runtime::{Page, PageError};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const LINKS: &[(&str, &str, bool)] = &[
    ("the HTML standard", "https://html.spec.whatwg.org/", false),
    ("this page", "#top", true),
    ("MDN", "https://developer.mozilla.org/", false),
];

fn build_article(doc: &mut Document) -> Result<html::NodeKey, html::DomError> {
    let host = doc.create_element(TAG_NAME);
    let p = doc.create_element("p");
    doc.append_child(host, p)?;
    for (text, href, opt_out) in LINKS {
        doc.append_text(p, "Read ")?;
        let a = doc.create_element_with_attrs("a", &[("href", *href)]);
        if *opt_out {
            doc.toggle_attr(a, OPT_OUT_ATTR, true)?;
        }
        doc.append_text(a, text)?;
        doc.append_child(p, a)?;
        doc.append_text(p, ". ")?;
    }
    Ok(host)
}

fn print_lines(title: &str, lines: &[String]) {
    println!("== {title}");
    for line in lines {
        println!("{line}");
    }
}

fn main() -> Result<(), PageError> {
    let mut page = Page::new();
    let host = build_article(page.document_mut())?;
    let root = page.document().root();
    page.connect(root, host)?;
    page.define_elements()?;

    print_lines("screen", &page.outline()?);
    let printed = page.print()?;
    print_lines("print", &printed);
    print_lines("screen again", &page.outline()?);
    Ok(())
}
