use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::{MutNode, MutObject};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct FiniteReal(pub(crate) f64);

impl Arbitrary for FiniteReal {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }

        Self(value)
    }
}

impl Arbitrary for MutNode {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_scalar(g: &mut Gen) -> MutNode {
            match usize::arbitrary(g) % 6 {
                0 => MutNode::Null,
                1 => MutNode::Bool(bool::arbitrary(g)),
                2 => MutNode::Sint(i64::arbitrary(g)),
                // Anything at or below i64::MAX reads back as Sint.
                3 => MutNode::Uint(u64::arbitrary(g) | (1 << 63)),
                4 => MutNode::Real(FiniteReal::arbitrary(g).0),
                _ => MutNode::Str(String::arbitrary(g)),
            }
        }

        fn gen_val(g: &mut Gen, depth: usize) -> MutNode {
            if depth == 0 {
                return gen_scalar(g);
            }
            match usize::arbitrary(g) % 4 {
                0 | 1 => gen_scalar(g),
                2 => {
                    let len = usize::arbitrary(g) % 4;
                    let items: Vec<MutNode> = (0..len).map(|_| gen_val(g, depth - 1)).collect();
                    MutNode::Arr(items)
                }
                _ => {
                    let len = usize::arbitrary(g) % 4;
                    let mut obj = MutObject::with_capacity(len);
                    for _ in 0..len {
                        obj.insert(String::arbitrary(g), gen_val(g, depth - 1));
                    }
                    MutNode::Obj(obj)
                }
            }
        }

        let depth = usize::arbitrary(g) % 4;
        gen_val(g, depth)
    }
}
