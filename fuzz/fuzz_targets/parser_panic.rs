#![no_main]
use libfuzzer_sys::fuzz_target;
use optree_syntax::{ParseContext, ParserConfig, parse};

fuzz_target!(|data: &[u8]| {
    // The parser expects &str, so we convert lossily to stay close to text.
    let s = String::from_utf8_lossy(data);
    let direct = parse(&s);

    let Ok(mut ctx) = ParseContext::open(ParserConfig::default()) else {
        return;
    };
    let via_context = ctx.parse(&s);

    // Without NUL bytes and within the size limit both paths must agree.
    if !s.contains('\0') && s.len() <= ctx.config().max_input_len {
        assert_eq!(direct, via_context);
    }
});
