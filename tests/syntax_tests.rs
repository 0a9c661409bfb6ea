//! tests/syntax_tests.rs
//!
//! Tree-level operations: traversal, substitution, flattening, role
//! predicates, and literal accessors.

use graft::{flatten, parse, rmap, substitute, to_source, SynNode, Syntax};

fn names(node: &SynNode) -> Vec<String> {
    node.children.iter().map(|c| c.data.clone()).collect()
}

#[test]
fn substitute_cycles_through_replacements() {
    let template = parse("_ + _ + _").unwrap();
    let reps = [Syntax::leaf("a"), Syntax::leaf("b"), Syntax::leaf("c")];
    let filled = substitute(&template, "_", &reps);
    assert_eq!(to_source(&filled), "a + b + c");

    // three occurrences, two replacements: the third wraps around
    let filled = substitute(&template, "_", &reps[..2]);
    assert_eq!(to_source(&filled), "a + b + a");

    // a single replacement substitutes uniformly
    let filled = substitute(&template, "_", &reps[..1]);
    assert_eq!(to_source(&filled), "a + a + a");

    // the input tree is untouched
    assert_eq!(to_source(&template), "_ + _ + _");
}

#[test]
fn substitute_ignores_non_leaf_matches() {
    // only leaves are replaced; an interior node with matching data is kept
    let tree = Syntax::node("_", vec![Syntax::leaf("x")]);
    let out = substitute(&tree, "_", &[Syntax::leaf("y")]);
    assert_eq!(out.data, "_");
    assert_eq!(out.children[0].data, "x");
}

#[test]
fn rmap_does_not_descend_into_replacements() {
    let tree = parse("a + a").unwrap();
    let mut hits = 0;
    let out = rmap(&tree, &mut |n| {
        if n.children.is_empty() && n.data == "a" {
            hits += 1;
            // the replacement contains another `a`; descending into it would
            // rewrite forever
            Some(Syntax::node("wrap", vec![Syntax::leaf("a")]))
        } else {
            None
        }
    });
    assert_eq!(hits, 2);
    assert_eq!(out.children[0], Syntax::node("wrap", vec![Syntax::leaf("a")]));
}

#[test]
fn rmap_shares_unchanged_subtrees() {
    let tree = parse("a + b").unwrap();
    let out = rmap(&tree, &mut |_| None);
    assert!(std::sync::Arc::ptr_eq(&out, &tree));
}

#[test]
fn flatten_left_and_right_associative_chains_agree() {
    // `,` folds left-to-right, `=` folds right-to-left; flatten yields the
    // same source-ordered operand list for both
    let left = parse("a, b, c, d").unwrap();
    assert_eq!(names(&flatten(&left)), ["a", "b", "c", "d"]);

    let right = parse("a = b = c = d").unwrap();
    assert_eq!(right.data, "=");
    assert_eq!(names(&flatten(&right)), ["a", "b", "c", "d"]);
}

#[test]
fn flatten_stops_at_other_operators() {
    let tree = parse("a + b * c + d").unwrap();
    let flat = flatten(&tree);
    assert_eq!(flat.children.len(), 3);
    assert_eq!(flat.children[1].data, "*");
}

#[test]
fn role_predicates() {
    let string = parse("\"hi\"").unwrap();
    assert!(string.is_string() && string.is_constant());

    let number = parse("0.5").unwrap();
    assert!(number.is_number() && !number.is_string());

    let boolean = parse("true").unwrap();
    assert!(boolean.is_boolean());

    let regex = parse("x = /ab/g").unwrap().children[1].clone();
    assert!(regex.is_regex());

    let division = parse("a / b").unwrap();
    assert!(!division.is_regex());

    let block = parse("x = {a: 1}").unwrap().children[1].clone();
    assert!(block.is_block());

    let grouped = parse("({})").unwrap();
    assert!(grouped.has_grouped_block());

    assert!(parse("f(x)").unwrap().is_invocation());
    assert!(parse("a[0]").unwrap().is_dereference());
    assert!(parse("a.b(x)").unwrap().is_contextualized_invocation());
    assert!(!parse("f(x)").unwrap().is_contextualized_invocation());

    assert!(parse("name").unwrap().is_identifier());
    assert!(!parse("x = 1").unwrap().is_identifier());
}

#[test]
fn literal_accessors() {
    assert_eq!(parse("42").unwrap().as_number(), Some(42.0));
    assert_eq!(parse("0xff").unwrap().as_number(), Some(255.0));
    assert_eq!(parse("010").unwrap().as_number(), Some(8.0));
    assert_eq!(parse("1.5e2").unwrap().as_number(), Some(150.0));
    assert_eq!(parse(".5").unwrap().as_number(), Some(0.5));
    assert_eq!(parse("x").unwrap().as_number(), None);

    let string = parse(r#""a\n\"b""#).unwrap();
    assert_eq!(string.as_unescaped_string().unwrap(), "a\n\"b");

    let regex = parse("x = /a\\/b/gi").unwrap().children[1].clone();
    assert_eq!(regex.as_unescaped_regex().unwrap(), "a\\/b");
}

#[test]
fn shallow_traversal() {
    let tree = parse("a + b").unwrap();
    let mut seen = Vec::new();
    tree.each(|c| seen.push(c.data.clone()));
    assert_eq!(seen, ["a", "b"]);

    let upper = tree.map(|c| Syntax::leaf(c.data.to_uppercase()));
    assert_eq!(to_source(&upper), "A + B");
    // map is shallow and non-destructive
    assert_eq!(to_source(&tree), "a + b");
}

#[test]
fn reach_visits_every_node() {
    let tree = parse("f(a + b, c)").unwrap();
    let mut count = 0;
    tree.reach(&mut |_| count += 1);
    assert_eq!(count, 7); // (), f, `,`, +, a, b, c
}

#[test]
fn child_mutation_primitives() {
    let mut node = Syntax {
        data: "+".to_string(),
        children: vec![Syntax::leaf("a")],
    };
    node.push_child(Syntax::leaf("b"));
    assert_eq!(node.children.len(), 2);
    node.replace_child(1, Syntax::leaf("c"));
    assert_eq!(node.children[1].data, "c");
    assert_eq!(node.pop_child().unwrap().data, "c");
}

#[test]
#[should_panic]
fn replace_child_out_of_bounds_panics() {
    let mut node = Syntax {
        data: "+".to_string(),
        children: vec![],
    };
    node.replace_child(0, Syntax::leaf("x"));
}

#[test]
fn trees_serialize_through_serde() {
    let tree = parse("f(x + 1)").unwrap();
    let json = serde_json::to_string(&tree).unwrap();
    let back: SynNode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tree);
}
