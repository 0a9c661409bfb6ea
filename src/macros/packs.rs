//! Bundled macro packs, registered as opt-in named configurations.
//!
//! Every pack is a plain install function that parses its pattern text and
//! registers recursive macros on the engine; `std` is the union of the rest
//! in a canonical order. Pattern and template sources live here as string
//! literals so each pack reads as the rewrite it performs.

use crate::diagnostics::GraftError;
use crate::engine::{Configuration, Engine};
use crate::macros::expander::MacroExpander;
use crate::syntax::{flatten, parse, substitute, SynNode, Syntax};
use im::HashMap as ImHashMap;

/// The registry of bundled configurations a new engine starts with.
pub(crate) fn bundled_configurations() -> ImHashMap<String, Configuration> {
    let entries: [(&str, Configuration); 7] = [
        ("qs", Configuration::Install(install_quotation)),
        ("qg", Configuration::Install(install_grouping_guard)),
        ("fn", Configuration::Install(install_function_shorthand)),
        ("dfn", Configuration::Install(install_arrow)),
        ("defmacro", Configuration::Install(install_defmacro)),
        ("string", Configuration::Install(install_interpolation)),
        (
            "std",
            Configuration::Bundle(&["qs", "qg", "fn", "dfn", "defmacro", "string"]),
        ),
    ];
    entries
        .into_iter()
        .map(|(name, configuration)| (name.to_string(), configuration))
        .collect()
}

// ============================================================================
// qs: QUOTATION
// ============================================================================

/// `qs[expr]` becomes a fresh-symbol leaf; the engine's syntax-ref table
/// maps that symbol to the parsed tree of `expr`, and `compile` later binds
/// the symbol in the environment so the host receives the tree itself.
fn install_quotation(engine: &mut Engine) -> Result<(), GraftError> {
    engine.register_rmacro(
        parse("qs[_]")?,
        MacroExpander::native(|engine, captures| {
            let tree = captures.first()?.clone();
            let name = engine.fresh_symbol();
            engine.stash_syntax_ref(name.clone(), tree);
            Some(Syntax::leaf(name))
        }),
    );
    Ok(())
}

// ============================================================================
// qg: GROUPING GUARD
// ============================================================================

/// `qg[expr]` becomes `(expr)`: explicit parentheses that survive
/// serialization, defeating host constant-folding of the grouped form.
fn install_grouping_guard(engine: &mut Engine) -> Result<(), GraftError> {
    engine.register_rmacro(parse("qg[_]")?, MacroExpander::Template(parse("(_)")?));
    Ok(())
}

// ============================================================================
// fn: FUNCTION SHORTHANDS
// ============================================================================

fn install_function_shorthand(engine: &mut Engine) -> Result<(), GraftError> {
    engine.register_rmacro(
        parse("fn[_][_]")?,
        MacroExpander::Template(parse("(function (_) {return _})")?),
    );
    engine.register_rmacro(
        parse("fn_[_]")?,
        MacroExpander::Template(parse("(function () {return _})")?),
    );
    engine.register_rmacro(
        parse("let[_] in _")?,
        MacroExpander::native(|_, captures| {
            let (names, values) = split_bindings(captures.first()?);
            Some(immediate_call(names, values, captures.get(1)?))
        }),
    );
    engine.register_rmacro(
        parse("_, where[_]")?,
        MacroExpander::native(|_, captures| {
            let (names, values) = split_bindings(captures.get(1)?);
            Some(immediate_call(names, values, captures.first()?))
        }),
    );
    engine.register_rmacro(
        parse("_, when[_]")?,
        MacroExpander::native(|_, captures| {
            Some(guarded(captures.get(1)?, captures.first()?, false))
        }),
    );
    engine.register_rmacro(
        parse("_, unless[_]")?,
        MacroExpander::native(|_, captures| {
            Some(guarded(captures.get(1)?, captures.first()?, true))
        }),
    );
    Ok(())
}

// ============================================================================
// dfn: INFIX ARROW
// ============================================================================

/// `vars >$> body` is the infix spelling of `fn[vars][body]`.
fn install_arrow(engine: &mut Engine) -> Result<(), GraftError> {
    engine.register_rmacro(
        parse("_ >$> _")?,
        MacroExpander::Template(parse("(function (_) {return _})")?),
    );
    Ok(())
}

// ============================================================================
// defmacro: META-LEVEL REGISTRATION
// ============================================================================

fn install_defmacro(engine: &mut Engine) -> Result<(), GraftError> {
    // Registers pattern -> template as a recursive macro at expansion time;
    // the defmacro form itself lowers to an inert literal.
    engine.register_rmacro(
        parse("defmacro[_][_]")?,
        MacroExpander::native(|engine, captures| {
            let pattern = captures.first()?.clone();
            let template = captures.get(1)?.clone();
            engine.register_rmacro(pattern, MacroExpander::Template(template));
            Some(Syntax::leaf("null"))
        }),
    );
    engine.register_rmacro(
        parse("with_gensyms[_][_]")?,
        MacroExpander::native(|engine, captures| {
            let names = comma_operands(captures.first()?);
            let mut body = captures.get(1)?.clone();
            for name in names {
                let fresh = Syntax::leaf(engine.fresh_symbol());
                body = substitute(&body, &name.data, &[fresh]);
            }
            Some(body)
        }),
    );
    Ok(())
}

// ============================================================================
// string: INTERPOLATION
// ============================================================================

/// Any string literal containing `#{expr}` lowers to a parenthesized,
/// flattened `+` of the literal pieces and the parsed expressions.
fn install_interpolation(engine: &mut Engine) -> Result<(), GraftError> {
    engine.register_rmacro(
        Syntax::leaf("_"),
        MacroExpander::native(|_, captures| {
            let node = captures.first()?;
            if !node.is_string() || !node.data.contains("#{") {
                return None;
            }
            interpolate(node)
        }),
    );
    Ok(())
}

fn interpolate(node: &SynNode) -> Option<SynNode> {
    let data = node.data.as_str();
    let quote = &data[..1];
    let body = &data[1..data.len() - 1];
    let bytes = body.as_bytes();

    let mut pieces: Vec<SynNode> = Vec::new();
    let mut interpolated = false;
    let mut literal_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i = (i + 2).min(bytes.len());
            continue;
        }
        if bytes[i] == b'#' && bytes.get(i + 1) == Some(&b'{') {
            if literal_start < i {
                pieces.push(string_literal(quote, &body[literal_start..i]));
            }
            let mut depth = 1;
            let mut j = i + 2;
            while j < bytes.len() && depth > 0 {
                match bytes[j] {
                    b'{' => depth += 1,
                    b'}' => depth -= 1,
                    _ => {}
                }
                j += 1;
            }
            if depth != 0 {
                return None;
            }
            let expression = parse(&body[i + 2..j - 1]).ok()?;
            pieces.push(Syntax::node("(", vec![expression]));
            interpolated = true;
            i = j;
            literal_start = j;
        } else {
            i += 1;
        }
    }
    if literal_start < bytes.len() {
        pieces.push(string_literal(quote, &body[literal_start..]));
    }
    // every `#{` was escaped or unbalanced: decline, or this rule would
    // refire on its own output forever
    if !interpolated {
        return None;
    }
    // concatenation must start from a string so + coerces instead of adding
    if !pieces[0].is_string() {
        pieces.insert(0, string_literal(quote, ""));
    }
    Some(Syntax::node("(", vec![Syntax::node("+", pieces)]))
}

fn string_literal(quote: &str, text: &str) -> SynNode {
    Syntax::leaf(format!("{quote}{text}{quote}"))
}

// ============================================================================
// TREE CONSTRUCTION HELPERS
// ============================================================================

fn paren(child: SynNode) -> SynNode {
    Syntax::node("(", vec![child])
}

/// Splits a binding list (`a = 1, b = 2`) into names and values. An entry
/// without `=` binds the name to `undefined`.
fn split_bindings(bindings: &SynNode) -> (Vec<SynNode>, Vec<SynNode>) {
    let mut names = Vec::new();
    let mut values = Vec::new();
    for entry in comma_operands(bindings) {
        if entry.data == "=" && entry.children.len() == 2 {
            names.push(entry.children[0].clone());
            values.push(entry.children[1].clone());
        } else {
            names.push(entry.clone());
            values.push(Syntax::leaf("undefined"));
        }
    }
    (names, values)
}

fn comma_operands(node: &SynNode) -> Vec<SynNode> {
    if node.data == "," {
        flatten(node).children.clone()
    } else {
        vec![node.clone()]
    }
}

fn comma_join(items: Vec<SynNode>) -> Option<SynNode> {
    match items.len() {
        0 => None,
        1 => items.into_iter().next(),
        _ => Some(Syntax::node(",", items)),
    }
}

fn function_literal(parameters: Vec<SynNode>, body: SynNode) -> SynNode {
    let parameter_group = match comma_join(parameters) {
        Some(list) => paren(list),
        None => Syntax::node("(", vec![]),
    };
    let return_body = Syntax::node("{", vec![Syntax::node("return", vec![body])]);
    paren(Syntax::node("function", vec![parameter_group, return_body]))
}

/// `(function (names) {return body})(values)`
fn immediate_call(names: Vec<SynNode>, values: Vec<SynNode>, body: &SynNode) -> SynNode {
    let callee = function_literal(names, body.clone());
    match comma_join(values) {
        Some(arguments) => Syntax::node("()", vec![callee, arguments]),
        None => Syntax::node("()", vec![callee]),
    }
}

/// `((condition) && (expression))`, negating the condition for `unless`.
fn guarded(condition: &SynNode, expression: &SynNode, negate: bool) -> SynNode {
    let mut guard = paren(condition.clone());
    if negate {
        guard = paren(Syntax::node("u!", vec![guard]));
    }
    paren(Syntax::node("&&", vec![guard, paren(expression.clone())]))
}
