#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sds::{GrowthOptions, Sds};

#[derive(Debug, Arbitrary)]
enum Op {
    Cat(Vec<u8>),
    Cpy(Vec<u8>),
    Clear,
    MakeRoom { addlen: u16, max_prealloc: u16 },
    RemoveFreeSpace,
    GrowZero(u16),
    SpareWrite(u8),
    Shrink(u8),
    Trim(Vec<u8>),
    Range(i16, i16),
    UpdateLen,
    MapChars(Vec<u8>, Vec<u8>),
    CatRepr(Vec<u8>),
    Format(i64, u64),
}

#[derive(Debug, Arbitrary)]
struct Input {
    init: Vec<u8>,
    ops: Vec<Op>,
}

fn resolve(len: usize, idx: i16) -> usize {
    if idx < 0 {
        len.saturating_sub(usize::from(idx.unsigned_abs()))
    } else {
        usize::from(idx.unsigned_abs())
    }
}

fn run(input: Input) {
    let mut s = Sds::new_len(&input.init).unwrap();
    let mut model = input.init;

    for op in input.ops {
        match op {
            Op::Cat(bytes) => {
                s.cat(&bytes).unwrap();
                model.extend_from_slice(&bytes);
            }
            Op::Cpy(bytes) => {
                s.cpy(&bytes).unwrap();
                model = bytes;
            }
            Op::Clear => {
                s.clear();
                model.clear();
            }
            Op::MakeRoom {
                addlen,
                max_prealloc,
            } => {
                let opts = GrowthOptions::new(usize::from(max_prealloc));
                s.make_room_for_with(usize::from(addlen), &opts).unwrap();
                assert!(s.avail() >= usize::from(addlen));
            }
            Op::RemoveFreeSpace => {
                s.remove_free_space().unwrap();
                assert_eq!(s.avail(), 0);
            }
            Op::GrowZero(len) => {
                let len = usize::from(len);
                s.grow_zero(len).unwrap();
                if len > model.len() {
                    model.resize(len, 0);
                }
            }
            Op::SpareWrite(n) => {
                let n = usize::from(n);
                s.make_room_for(n).unwrap();
                s.spare_mut()[..n].fill(b'#');
                s.incr_len(isize::try_from(n).unwrap());
                model.resize(model.len() + n, b'#');
            }
            Op::Shrink(n) => {
                let n = usize::from(n).min(model.len());
                s.incr_len(-isize::try_from(n).unwrap());
                model.truncate(model.len() - n);
            }
            Op::Trim(cset) => {
                s.trim(&cset);
                let start = model.iter().position(|b| !cset.contains(b));
                let end = model.iter().rposition(|b| !cset.contains(b));
                model = match (start, end) {
                    (Some(start), Some(end)) => model[start..=end].to_vec(),
                    _ => Vec::new(),
                };
            }
            Op::Range(start, end) => {
                s.range(isize::from(start), isize::from(end));
                let len = model.len();
                if len > 0 {
                    let first = resolve(len, start);
                    let last = resolve(len, end).min(len - 1);
                    model = if first >= len || first > last {
                        Vec::new()
                    } else {
                        model[first..=last].to_vec()
                    };
                }
            }
            Op::UpdateLen => {
                s.update_len();
                if let Some(zero) = model.iter().position(|&b| b == 0) {
                    model.truncate(zero);
                }
            }
            Op::MapChars(from, to) => {
                s.map_chars(&from, &to);
                for byte in &mut model {
                    let current = *byte;
                    if let Some((_, &r)) = from.iter().zip(&to).find(|&(&f, _)| f == current) {
                        *byte = r;
                    }
                }
            }
            Op::CatRepr(bytes) => {
                let before = s.len();
                s.cat_repr(&bytes).unwrap();
                let args = sds::split_args(&s[before..]).unwrap();
                assert_eq!(args.len(), 1);
                assert_eq!(args[0].as_bytes(), bytes.as_slice());
                model.extend_from_slice(&s[before..]);
            }
            Op::Format(signed, unsigned) => {
                sds::cat_fmt!(s, "%I/%U%%", signed, unsigned).unwrap();
                model.extend_from_slice(format!("{signed}/{unsigned}%").as_bytes());
            }
        }
        s.assert_invariants();
        assert_eq!(s.as_bytes(), model.as_slice());
    }
}

fuzz_target!(|input: Input| run(input));
