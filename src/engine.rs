//! The engine: the crate's single configurable front door.
//!
//! An [`Engine`] owns the macro registry, the quotation syntax-ref table,
//! the configuration registry, and a symbol generator. All of its state
//! lives in persistent collections, so cloning an engine is cheap and the
//! clone relates to its parent exactly as the attribute behaviors require:
//! registries are shared copy-on-write (a macro registered on either side
//! after the clone is invisible to the other), while the symbol generator is
//! re-seeded so the two instances can never hand out colliding names.

use crate::compile::{assemble, Binding, Bindings, CompiledSource};
use crate::diagnostics::GraftError;
use crate::err_msg;
use crate::gensym::SymbolGenerator;
use crate::macros::expander::{expand, Macro, MacroExpander};
use crate::macros::packs::bundled_configurations;
use crate::macros::pattern::try_match;
use crate::syntax::{self, to_source, SynNode};
use im::{HashMap as ImHashMap, HashSet as ImHashSet, Vector};

/// A named, opt-in bundle of engine setup.
#[derive(Debug, Clone)]
pub enum Configuration {
    /// Applies other configurations by name, in order.
    Bundle(&'static [&'static str]),
    /// Runs an install function against the engine.
    Install(fn(&mut Engine) -> Result<(), GraftError>),
}

/// A syntax engine instance.
#[derive(Debug)]
pub struct Engine {
    macros: Vector<Macro>,
    syntax_refs: ImHashMap<String, SynNode>,
    configurations: ImHashMap<String, Configuration>,
    applied: ImHashSet<String>,
    gensym: SymbolGenerator,
}

impl Engine {
    /// An engine with the bundled configurations registered but none of them
    /// applied.
    pub fn new() -> Self {
        Self {
            macros: Vector::new(),
            syntax_refs: ImHashMap::new(),
            configurations: bundled_configurations(),
            applied: ImHashSet::new(),
            gensym: SymbolGenerator::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Parsing and serialization
    // ------------------------------------------------------------------------

    /// Parses source text into a tree. O(n) in the input length.
    pub fn parse(&self, text: &str) -> Result<SynNode, GraftError> {
        syntax::parse(text)
    }

    /// Serializes a tree back to source text.
    pub fn serialize(&self, tree: &SynNode) -> String {
        to_source(tree)
    }

    // ------------------------------------------------------------------------
    // Pattern matching and macros
    // ------------------------------------------------------------------------

    /// Matches `pattern` against `subject`, returning wildcard captures in
    /// traversal order.
    pub fn match_pattern(&self, pattern: &SynNode, subject: &SynNode) -> Option<Vec<SynNode>> {
        try_match(pattern, subject)
    }

    /// Registers a non-recursive macro. Earlier registrations win.
    pub fn register_macro(&mut self, pattern: SynNode, expander: MacroExpander) -> &mut Self {
        self.macros.push_back(Macro {
            pattern,
            expander,
            recursive: false,
        });
        self
    }

    /// Registers a recursive macro: its output is re-expanded before being
    /// spliced into the tree.
    pub fn register_rmacro(&mut self, pattern: SynNode, expander: MacroExpander) -> &mut Self {
        self.macros.push_back(Macro {
            pattern,
            expander,
            recursive: true,
        });
        self
    }

    /// One expansion pass over the registered macros.
    ///
    /// A successful replacement is not descended into; recursion into a
    /// replacement happens only for macros registered with
    /// [`register_rmacro`](Self::register_rmacro).
    pub fn macroexpand(&mut self, tree: &SynNode) -> SynNode {
        expand(self, tree)
    }

    /// Returns a new unique identifier from this engine's generator.
    pub fn fresh_symbol(&mut self) -> String {
        self.gensym.fresh()
    }

    pub(crate) fn macro_snapshot(&self) -> Vector<Macro> {
        self.macros.clone()
    }

    pub(crate) fn stash_syntax_ref(&mut self, name: String, tree: SynNode) {
        self.syntax_refs.insert(name, tree);
    }

    // ------------------------------------------------------------------------
    // Compilation
    // ------------------------------------------------------------------------

    /// Assembles environment-capturing source for a host interpreter.
    ///
    /// The engine's syntax refs (from quotation) are merged into the
    /// environment so quoted trees reach the host alongside the caller's own
    /// bindings.
    pub fn compile(
        &mut self,
        tree: &SynNode,
        mut environment: Bindings,
    ) -> Result<CompiledSource, GraftError> {
        let formal = self.gensym.fresh();
        for (name, quoted) in self.syntax_refs.iter() {
            environment.insert(name.clone(), Binding::Syntax(quoted.clone()));
        }
        let source = assemble(tree, &formal, &environment);
        Ok(CompiledSource {
            source,
            formal,
            environment,
        })
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Applies the named configuration packs, in order. Each pack is applied
    /// at most once per engine; an unknown name is fatal.
    pub fn configure(&mut self, names: &[&str]) -> Result<&mut Self, GraftError> {
        for &name in names {
            self.apply_configuration(name)?;
        }
        Ok(self)
    }

    fn apply_configuration(&mut self, name: &str) -> Result<(), GraftError> {
        if self.applied.contains(name) {
            return Ok(());
        }
        let Some(configuration) = self.configurations.get(name).cloned() else {
            return Err(err_msg!(Config, "no configuration named '{}'", name));
        };
        self.applied.insert(name.to_string());
        match configuration {
            Configuration::Bundle(members) => {
                for &member in members {
                    self.apply_configuration(member)?;
                }
            }
            Configuration::Install(install) => install(self)?,
        }
        Ok(())
    }

    /// Registers a configuration under a name for later [`configure`](Self::configure).
    pub fn register_configuration(&mut self, name: &str, configuration: Configuration) -> &mut Self {
        self.configurations.insert(name.to_string(), configuration);
        self
    }
}

impl Clone for Engine {
    /// Registries are shared copy-on-write with the parent; the symbol
    /// generator is freshly seeded so parent and clone never collide.
    fn clone(&self) -> Self {
        Self {
            macros: self.macros.clone(),
            syntax_refs: self.syntax_refs.clone(),
            configurations: self.configurations.clone(),
            applied: self.applied.clone(),
            gensym: SymbolGenerator::new(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
