#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonbind::{GenerateOptions, Mode, ParseOptions, dump, load};
use jsontree::{MutNode, MutObject, WriteFlags, write};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 1; // option flags

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static TRIVIA_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r", b"// c\n", b"/**/"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x0F);
        let mut prefix = HEADER;
        prefix += append_trivia(&mut data[prefix..], max_size - prefix);
        prefix += append_value(&mut data[prefix..], size, max_size - prefix);
        prefix += append_trivia(&mut data[prefix..], max_size - prefix);
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_trivia(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let mut written = 0;
        for _ in 0..rng.random_range(1..=limit.min(4)) {
            let t = TRIVIA_TABLE[rng.random_range(0..TRIVIA_TABLE.len())];
            if written + t.len() > limit {
                break;
            }
            buf[written..written + t.len()].copy_from_slice(t);
            written += t.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let node = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2 + 2));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(node) = ArbitraryNode::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break node;
        }
    };
    let flags = WriteFlags {
        allow_inf_and_nan: true,
        ..WriteFlags::default()
    };
    let Ok(serialized) = write(&node.0, flags) else {
        return 0;
    };
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryNode(MutNode);

impl<'a> Arbitrary<'a> for ArbitraryNode {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let node = match u.choose_index(21)? {
            0 => MutNode::Null,
            1 => MutNode::Bool(u.arbitrary()?),
            2 => MutNode::Sint(u.arbitrary()?),
            3 => MutNode::Uint(u.arbitrary()?),
            4 => MutNode::Real(u.arbitrary()?),
            5..=10 => MutNode::Str(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryNode> = u.arbitrary()?;
                MutNode::Arr(elems.into_iter().map(|n| n.0).collect())
            }
            _ => {
                let members: Vec<(String, ArbitraryNode)> = u.arbitrary()?;
                MutNode::Obj(members.into_iter().map(|(k, n)| (k, n.0)).collect::<MutObject>())
            }
        };
        Ok(ArbitraryNode(node))
    }
}

fn load_dump(data: &[u8]) {
    let Some((&flags, source)) = data.split_first() else {
        return;
    };
    let mode = match flags & 3 {
        0 => Mode::Strict,
        1 => Mode::Compat,
        2 => Mode::Rails,
        _ => Mode::Object,
    };
    let opts = ParseOptions::new().mode(mode).freeze(flags & 4 != 0);
    let Ok(value) = load(source, &opts) else {
        return;
    };

    // Anything within the read nesting limit can be written back.
    let out = GenerateOptions::new().pretty(flags & 8 != 0);
    let first = dump(&value, &out).expect("loaded value must dump");
    let again = load(&first, &ParseOptions::new()).expect("dumped text must load");
    let second = dump(&again, &out).expect("reloaded value must dump");
    assert_eq!(first, second);
}

fuzz_target!(|data: &[u8]| load_dump(data));
