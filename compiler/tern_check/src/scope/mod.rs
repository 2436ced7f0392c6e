//! Lexical scopes for local bindings.
//!
//! A [`Scope`] is a chain of reference-counted frames. Cloning a scope is
//! O(1) and shares every frame; mutation goes through `Rc::make_mut`, so a
//! clone taken for speculative checking never observes later bindings and
//! never needs to be rolled back.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tern_ir::Span;
use tern_types::Type;

/// A local variable or parameter.
#[derive(Clone, Debug)]
pub struct Binding {
    pub ty: Type,
    pub mutable: bool,
    /// Declaration site.
    pub site: Span,
}

#[derive(Clone, Debug, Default)]
struct Frame {
    bindings: FxHashMap<String, Binding>,
    return_type: Option<Type>,
    type_args: Option<Rc<FxHashMap<String, Type>>>,
    always_returns: bool,
    parent: Option<Scope>,
}

#[derive(Clone, Debug, Default)]
pub struct Scope(Rc<Frame>);

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Root scope of an instance: named type arguments are visible to every
    /// nested frame.
    pub fn with_type_args(type_args: FxHashMap<String, Type>) -> Self {
        Scope(Rc::new(Frame {
            type_args: Some(Rc::new(type_args)),
            ..Frame::default()
        }))
    }

    /// A nested block frame.
    #[must_use]
    pub fn child(&self) -> Self {
        Scope(Rc::new(Frame {
            parent: Some(self.clone()),
            ..Frame::default()
        }))
    }

    /// A nested function frame; `return` inside it checks against `return_type`.
    #[must_use]
    pub fn function(&self, return_type: Type) -> Self {
        Scope(Rc::new(Frame {
            return_type: Some(return_type),
            parent: Some(self.clone()),
            ..Frame::default()
        }))
    }

    /// Bind `name` in this frame, shadowing outer bindings.
    pub fn bind(&mut self, name: impl Into<String>, binding: Binding) {
        Rc::make_mut(&mut self.0)
            .bindings
            .insert(name.into(), binding);
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        let mut frame = &self.0;
        loop {
            if let Some(binding) = frame.bindings.get(name) {
                return Some(binding);
            }
            frame = &frame.parent.as_ref()?.0;
        }
    }

    /// Return type of the innermost enclosing function.
    pub fn return_type(&self) -> Option<&Type> {
        let mut frame = &self.0;
        loop {
            if let Some(ty) = &frame.return_type {
                return Some(ty);
            }
            frame = &frame.parent.as_ref()?.0;
        }
    }

    pub fn type_args(&self) -> Option<&FxHashMap<String, Type>> {
        let mut frame = &self.0;
        loop {
            if let Some(args) = &frame.type_args {
                return Some(args);
            }
            frame = &frame.parent.as_ref()?.0;
        }
    }

    pub fn type_arg(&self, name: &str) -> Option<&Type> {
        self.type_args()?.get(name)
    }

    /// Whether every path through this frame so far has returned.
    pub fn always_returns(&self) -> bool {
        self.0.always_returns
    }

    pub fn mark_returns(&mut self) {
        if !self.0.always_returns {
            Rc::make_mut(&mut self.0).always_returns = true;
        }
    }
}
