//! Verifies that trees and contexts release everything they allocate.
//!
//! Runs without the libtest harness so no other thread allocates while the
//! counters are read.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicIsize, Ordering};

use optree_syntax::{ParseContext, ParserConfig, parse};

struct CountingAllocator;

static OUTSTANDING: AtomicIsize = AtomicIsize::new(0);

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            OUTSTANDING.fetch_add(1, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        OUTSTANDING.fetch_sub(1, Ordering::SeqCst);
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

const INPUTS: &[&str] = &[
    r"a[c \div 2b] = -(-5 + 1 - 3.14) + A \times x - 2ax",
    "a^{1 + 2}",
    r"\frac 12 a",
    "12 + x *{12}",
    r"\sqrt 12 + 3",
    r"\left | 1 - 2 \right|",
    "2(-3)(-4)",
];

const BROKEN: &[&str] = &[r"\left | 1 - 2", "(1 + (2 *", r"\frac{1}{", "1 + \\beta"];

fn outstanding() -> isize {
    OUTSTANDING.load(Ordering::SeqCst)
}

fn audit(name: &str, rounds: usize, work: impl Fn()) {
    // Warm up once so lazily initialized runtime state is not counted.
    work();
    let before = outstanding();
    for _ in 0..rounds {
        work();
    }
    let after = outstanding();
    assert_eq!(before, after, "{name}: {} allocations leaked", after - before);
    println!("{name}: ok");
}

fn main() {
    audit("trees", 100, || {
        let trees: Vec<_> = INPUTS.iter().map(|input| parse(input).unwrap()).collect();
        assert_eq!(trees.len(), INPUTS.len());
    });

    audit("failed parses", 100, || {
        for input in BROKEN {
            assert!(parse(input).is_err());
        }
    });

    audit("contexts", 50, || {
        let mut ctx = ParseContext::open(ParserConfig::default()).unwrap();
        for input in INPUTS.iter().chain(BROKEN) {
            let _ = ctx.parse(input);
        }
        ctx.close();
        ctx.close();
        assert!(ctx.parse("1").is_err());
    });
}
