#![no_main]

use html::{Document, SelectorList};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(selectors) = SelectorList::parse(input) else {
        return;
    };
    let mut doc = Document::new();
    let a = doc.create_element_with_attrs("a", &[("href", "x"), ("class", "a b")]);
    doc.append_child(doc.root(), a).unwrap();
    let _ = doc.query_all(doc.root(), &selectors);
});
