//! tests/macro_expansion_tests.rs
//!
//! Macro system integration tests: matching, expansion cutoff, recursive
//! expansion, and registration priority. These tests register their own
//! macros rather than using the bundled packs; pack behavior is covered in
//! `engine_tests.rs`.

use graft::{parse, to_source, try_match, Engine, MacroExpander, Syntax};

fn expand_str(engine: &mut Engine, source: &str) -> String {
    let tree = parse(source).unwrap();
    to_source(&engine.macroexpand(&tree))
}

#[test]
fn match_captures_in_traversal_order() {
    let pattern = parse("f(_, _)").unwrap();
    let subject = parse("f(a + 1, b)").unwrap();
    let captures = try_match(&pattern, &subject).unwrap();
    assert_eq!(captures.len(), 2);
    assert_eq!(to_source(&captures[0]), "a + 1");
    assert_eq!(to_source(&captures[1]), "b");
}

#[test]
fn match_is_deterministic_and_non_destructive() {
    let pattern = parse("g(_)").unwrap();
    let subject = parse("g(x * 2)").unwrap();
    let first = try_match(&pattern, &subject).unwrap();
    let second = try_match(&pattern, &subject).unwrap();
    assert_eq!(first, second);
    assert_eq!(to_source(&subject), "g(x * 2)");
}

#[test]
fn match_rejects_structural_mismatches() {
    let pattern = parse("f(_)").unwrap();
    assert!(try_match(&pattern, &parse("g(x)").unwrap()).is_none());
    assert!(try_match(&pattern, &parse("f(x, y)").unwrap()).is_none());
    assert!(try_match(&pattern, &parse("f").unwrap()).is_none());
}

#[test]
fn template_macro_substitutes_captures() {
    let mut engine = Engine::new();
    engine.register_macro(
        parse("double[_]").unwrap(),
        MacroExpander::Template(parse("(_ + _)").unwrap()),
    );
    // one capture, two template slots: substitution cycles
    assert_eq!(expand_str(&mut engine, "double[x]"), "(x + x)");
}

#[test]
fn expansion_cutoff_prevents_runaway_rewriting() {
    // the replacement contains the pattern itself; if expansion descended
    // into replacements this would never terminate
    let mut engine = Engine::new();
    engine.register_macro(
        parse("loop").unwrap(),
        MacroExpander::Template(parse("(loop)").unwrap()),
    );
    assert_eq!(expand_str(&mut engine, "loop"), "(loop)");
    assert_eq!(expand_str(&mut engine, "loop + loop"), "(loop) + (loop)");
}

#[test]
fn unmatched_trees_come_back_unchanged_and_shared() {
    let mut engine = Engine::new();
    engine.register_macro(
        parse("nope[_]").unwrap(),
        MacroExpander::Template(parse("0").unwrap()),
    );
    let tree = parse("a + b * c").unwrap();
    let out = engine.macroexpand(&tree);
    assert!(std::sync::Arc::ptr_eq(&out, &tree));
}

#[test]
fn registration_order_is_priority_order() {
    let mut engine = Engine::new();
    engine
        .register_macro(
            parse("pick[_]").unwrap(),
            MacroExpander::Template(parse("first").unwrap()),
        )
        .register_macro(
            parse("pick[_]").unwrap(),
            MacroExpander::Template(parse("second").unwrap()),
        );
    assert_eq!(expand_str(&mut engine, "pick[x]"), "first");
}

#[test]
fn declining_expander_falls_through_to_later_macros() {
    let mut engine = Engine::new();
    engine
        .register_macro(
            Syntax::leaf("_"),
            MacroExpander::native(|_, captures| {
                let node = captures.first()?;
                if node.is_number() {
                    Some(Syntax::leaf("N"))
                } else {
                    None
                }
            }),
        )
        .register_macro(
            parse("tag[_]").unwrap(),
            MacroExpander::Template(parse("tagged").unwrap()),
        );
    // numbers hit the wildcard; the tag form falls through to the second rule
    assert_eq!(expand_str(&mut engine, "tag[7]"), "tagged");
    assert_eq!(expand_str(&mut engine, "x + 7"), "x + N");
}

#[test]
fn rmacro_output_is_expanded_to_a_fixed_point() {
    let mut engine = Engine::new();
    engine
        .register_rmacro(
            parse("twice[_]").unwrap(),
            MacroExpander::Template(parse("inc[inc[_]]").unwrap()),
        )
        .register_rmacro(
            parse("inc[_]").unwrap(),
            MacroExpander::Template(parse("(_ + 1)").unwrap()),
        );
    assert_eq!(expand_str(&mut engine, "twice[x]"), "((x + 1) + 1)");
}

#[test]
fn non_recursive_macro_leaves_its_output_unexpanded() {
    let mut engine = Engine::new();
    engine
        .register_macro(
            parse("once[_]").unwrap(),
            MacroExpander::Template(parse("inc[_]").unwrap()),
        )
        .register_macro(
            parse("inc[_]").unwrap(),
            MacroExpander::Template(parse("(_ + 1)").unwrap()),
        );
    assert_eq!(expand_str(&mut engine, "once[x]"), "inc[x]");
}

#[test]
fn native_expanders_can_use_engine_services() {
    let mut engine = Engine::new();
    engine.register_macro(
        parse("tmp").unwrap(),
        MacroExpander::native(|engine, _| Some(Syntax::leaf(engine.fresh_symbol()))),
    );
    let a = expand_str(&mut engine, "tmp");
    let b = expand_str(&mut engine, "tmp");
    assert!(a.starts_with("gensym_"));
    assert_ne!(a, b);
}

#[test]
fn expansion_reaches_into_block_bodies() {
    let mut engine = Engine::new();
    engine.register_macro(
        parse("it").unwrap(),
        MacroExpander::Template(parse("42").unwrap()),
    );
    assert_eq!(
        expand_str(&mut engine, "function f() {return it}"),
        "function f () {return 42}"
    );
}
