use optree_syntax::render::pretty;
use optree_syntax::{ErrorKind, ParseContext, ParserConfig, TextSize, parse};

#[test]
fn test_malformed_inputs_never_panic() {
    let inputs = [
        "",
        "(",
        ")",
        "{{{",
        "}}}",
        "\\",
        "\\left",
        "\\left|",
        "\\right|",
        "\\frac",
        "\\frac{",
        "\\sqrt[",
        "\\sqrt[]{}",
        "1..2",
        "^^",
        "*{",
        "*{}",
        "a = = b",
        "|||",
        "\\left( 1 \\right]",
        "é + 1",
        "\\frac 2.",
        "\\frac .5 1",
        "\\sqrt 1.",
    ];
    for input in inputs {
        // Should not panic.
        let result = parse(input);
        assert!(result.is_err(), "{input:?} should not parse");
    }
}

#[test]
fn test_error_kinds() {
    assert_eq!(parse("1 & 2").unwrap_err().kind, ErrorKind::Lexical);
    assert_eq!(parse("\\foo").unwrap_err().kind, ErrorKind::Lexical);
    assert_eq!(parse("3.").unwrap_err().kind, ErrorKind::Lexical);
    assert_eq!(parse("1 +").unwrap_err().kind, ErrorKind::Syntax);
    assert_eq!(parse("(1").unwrap_err().kind, ErrorKind::Syntax);
    assert_eq!(parse("1 2 )").unwrap_err().kind, ErrorKind::Syntax);
}

#[test]
fn test_deep_nesting_is_rejected_not_overflowed() {
    let depth = 100_000;
    let input = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let err = parse(&input).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resource);

    let signs = "-".repeat(depth);
    let err = parse(&signs).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resource);
}

#[test]
fn test_context_survives_a_mix_of_inputs() {
    let mut ctx = ParseContext::open(ParserConfig::default()).unwrap();
    let inputs = ["1 + 2", "(", "\\frac 12 a", "\\oops", "-2^2", ""];
    let ok: Vec<bool> = inputs.iter().map(|input| ctx.parse(input).is_ok()).collect();
    assert_eq!(ok, vec![true, false, true, false, true, false]);
    assert_eq!(ctx.parse_count(), inputs.len() as u64);
}

#[test]
fn test_decimal_remainder_in_every_argument_position() {
    let cases = [
        // \frac numerator leaves `.5` for the denominator
        (r"\frac 2.5 3", "(* (frac 2 0.5) 3)"),
        (r"\frac 1.5", "(frac 1 0.5)"),
        // \frac denominator leaves `.5` for the caller
        (r"\frac 1 2.5", "(* (frac 1 2) 0.5)"),
        (r"\frac 12.5", "(* (frac 1 2) 0.5)"),
        // \sqrt radicand
        (r"\sqrt 2.5", "(* (sqrt 2) 0.5)"),
        (r"\sqrt[3] 2.5", "(* (root 3 2) 0.5)"),
        // remainder handed back through a nested macro
        (r"\sqrt\frac 1.5", "(sqrt (frac 1 0.5))"),
        (r"\frac\sqrt 2.5 3", "(* (frac (sqrt 2) 0.5) 3)"),
        (r"\frac\frac 1.5 2", "(frac (frac 1 0.5) 2)"),
        // a bracketed index is a whole expression, not a single token
        (r"\sqrt[2.5] 3", "(root 2.5 3)"),
    ];
    let mut ctx = ParseContext::open(ParserConfig::default()).unwrap();
    for (input, expected) in cases {
        let tree = ctx
            .parse(input)
            .unwrap_or_else(|e| panic!("{input:?}: {e}"));
        assert_eq!(tree.to_string(), expected, "input {input:?}");
        assert_eq!(parse(input).unwrap(), tree);
    }
}

fn additive_chain(terms: usize) -> String {
    let mut input = "1+".repeat(terms - 1);
    input.push('1');
    input
}

#[test]
fn test_long_chain_within_tree_limit() {
    let config = ParserConfig::default();
    let terms = config.max_tree_depth;
    let input = additive_chain(terms);

    let mut ctx = ParseContext::open(config).unwrap();
    let tree = ctx.parse(&input).unwrap();
    assert_eq!(tree.depth(), terms);
    assert_eq!(tree.size(), 2 * terms - 1);
    assert!(tree.to_string().starts_with("(+ (+ (+ "));
    assert_eq!(pretty(&tree).lines().count(), 2 * terms - 1);
    drop(tree);

    let err = ctx.parse(&additive_chain(terms + 1)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resource);
}

#[test]
fn test_max_length_chain_is_rejected_not_overflowed() {
    let config = ParserConfig::default();
    let input = additive_chain(config.max_input_len / 2);
    assert_eq!(input.len(), config.max_input_len - 1);

    let mut ctx = ParseContext::open(config).unwrap();
    let err = ctx.parse(&input).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resource);
    assert_eq!(err.range.len(), TextSize::from(input.len() as u32));

    // Without the tree limit the chain is built, walked and dropped in full.
    let unlimited = ParserConfig {
        max_tree_depth: usize::MAX,
        ..ParserConfig::default()
    };
    let mut ctx = ParseContext::open(unlimited).unwrap();
    let tree = ctx.parse(&input).unwrap();
    assert_eq!(tree.depth(), input.len() / 2 + 1);
    assert_eq!(tree.to_string().matches('+').count(), input.len() / 2);
    drop(tree);
    assert!(ctx.parse("1 + 2").is_ok());
}
