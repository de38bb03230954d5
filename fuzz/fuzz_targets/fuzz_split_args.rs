#![no_main]

use libfuzzer_sys::fuzz_target;
use sds::Sds;

// Any line either tokenizes or reports unbalanced quotes. Whatever it yields
// must survive a trip through `cat_repr` and back unchanged.
fn run(line: &[u8]) {
    let Ok(args) = sds::split_args(line) else {
        return;
    };

    let mut rendered = Sds::empty().unwrap();
    for (i, arg) in args.iter().enumerate() {
        arg.assert_invariants();
        if i > 0 {
            rendered.cat(" ").unwrap();
        }
        rendered.cat_repr(arg).unwrap();
    }

    let reparsed = sds::split_args(&rendered).unwrap();
    assert_eq!(reparsed, args);
}

fuzz_target!(|data: &[u8]| run(data));
