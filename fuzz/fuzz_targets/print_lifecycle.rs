#![no_main]

//! Random connect/disconnect/media/frame sequences. Generated nodes are never
//! rebuilt, and a settled hidden state means every generated node is hidden.

use libfuzzer_sys::fuzz_target;
use print_footnotes::{PrintState, TAG_NAME, Visibility};
use runtime::Page;

fuzz_target!(|data: &[u8]| {
    let Some((&links, ops)) = data.split_first() else {
        return;
    };
    let mut page = Page::new();
    let doc = page.document_mut();
    let host = doc.create_element(TAG_NAME);
    for i in 0..(links % 16) {
        let href = format!("https://{i}.example");
        let a = doc.create_element_with_attrs("a", &[("href", href.as_str())]);
        if i % 5 == 4 {
            doc.toggle_attr(a, "no-print-footnote", true).unwrap();
        }
        doc.append_child(host, a).unwrap();
    }
    let root = page.document().root();
    page.connect(root, host).unwrap();
    let id = page.define_elements().unwrap()[0];
    let expected = page.element(id).unwrap().controller().links().len();

    for op in ops.iter().take(256) {
        match op % 5 {
            0 => {
                page.emulate_media(true);
            }
            1 => {
                page.emulate_media(false);
            }
            2 => {
                page.run_frame();
            }
            3 => {
                let _ = page.disconnect(host);
            }
            _ => {
                if page.document().parent(host).is_none() {
                    page.connect(root, host).unwrap();
                }
            }
        }

        let ctl = page.element(id).unwrap().controller();
        assert_eq!(ctl.markers().len(), expected);
        assert_eq!(ctl.entries().len(), expected);
        if let PrintState::Ready(visibility) = ctl.state() {
            assert!(ctl.subscription().is_some());
            if visibility == Visibility::Hidden && ctl.pending_hide().is_none() {
                let doc = page.document();
                assert!(ctl.markers().iter().all(|m| doc.has_attr(*m, "hidden")));
            }
        }
    }
});
