use idl_ref::process;
use idl_ref::resolver::{Anchor, DocumentIndex};

fn main() {
    let mut index = DocumentIndex::new();
    let section = index.add_scope(index.root(), true).unwrap();
    index.declare_var(section, "request", Some("Request")).unwrap();
    index.define("signal", Some("AbortSignal"));

    match process("request.[[signal]].throwIfAborted()", &index, Some(Anchor(section))) {
        Ok(result) => {
            println!("HTML:\n{}\n", result.to_html());
            println!("JSON:\n{}", result.to_json().unwrap());
        }
        Err(e) => {
            eprintln!("Failed to process reference: {:?}", miette::Report::new(e));
        }
    }
}
