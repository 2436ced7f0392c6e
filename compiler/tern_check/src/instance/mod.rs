//! Instance records and their arena.
//!
//! An [`Instance`] is one monomorphized realization of a symbol for a
//! concrete type-argument tuple. Instances are created lazily on first
//! reference, inserted before their body is checked, and never removed.

use rustc_hash::FxHashMap;
use tern_diagnostic::Message;
use tern_types::Type;

use crate::symbols::SymbolId;
use crate::tir;

/// Index of an instance in its [`InstanceArena`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct InstanceId(u32);

impl InstanceId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stamp placed on typed-IR nodes that reference an instance.
///
/// `ordinal` numbers the instances of one symbol in creation order; backends
/// combine it with the symbol path to name monomorphized output.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct InstanceRef {
    pub id: InstanceId,
    pub ordinal: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamInstance {
    pub name: String,
    /// For a variadic parameter, the full `List[T]` type.
    pub ty: Type,
    pub variadic: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Signature resolved, body still being checked.
    Pending,
    Block(Vec<tir::Stmt>),
    External(String),
    /// Checking the body reported an error.
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionInstance {
    pub params: Vec<ParamInstance>,
    pub ret: Type,
    pub body: Body,
}

impl FunctionInstance {
    pub fn variadic(&self) -> Option<&ParamInstance> {
        self.params.last().filter(|param| param.variadic)
    }

    /// Function type of this instance, as seen by a caller.
    pub fn signature(&self, origin: tern_ir::Span) -> Type {
        let params = self.params.iter().map(|param| param.ty.clone()).collect();
        Type::function(params, self.ret.clone(), origin)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum VariableValue {
    Expr(tir::Expr),
    External(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableInstance {
    pub ty: Type,
    pub mutable: bool,
    pub init: VariableValue,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InstanceData {
    /// Inserted, kind-specific resolution not finished yet.
    Pending,
    Struct { members: Vec<(String, Type)> },
    Enum { variants: Vec<(String, Type)> },
    Function(FunctionInstance),
    Variable(VariableInstance),
}

#[derive(Clone, Debug)]
pub struct Instance {
    pub symbol: SymbolId,
    pub path: String,
    /// Canonical display of `type_args`; see [`tern_types::instance_key`].
    pub key: String,
    pub ordinal: u32,
    pub type_args: Vec<Type>,
    pub data: InstanceData,
    /// Error that prevented resolving this instance's signature or value.
    pub(crate) failure: Option<Message>,
    /// Diagnostics produced while creating the instance, reported on first use.
    pub(crate) pending: Vec<Message>,
    pub(crate) used: bool,
}

impl Instance {
    pub fn reference(&self, id: InstanceId) -> InstanceRef {
        InstanceRef {
            id,
            ordinal: self.ordinal,
        }
    }

    pub fn failure(&self) -> Option<&Message> {
        self.failure.as_ref()
    }

    /// Whether the instance is reachable from a root through checked code.
    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn function(&self) -> Option<&FunctionInstance> {
        match &self.data {
            InstanceData::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn variable(&self) -> Option<&VariableInstance> {
        match &self.data {
            InstanceData::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn members(&self) -> Option<&[(String, Type)]> {
        match &self.data {
            InstanceData::Struct { members } => Some(members),
            _ => None,
        }
    }

    pub fn variants(&self) -> Option<&[(String, Type)]> {
        match &self.data {
            InstanceData::Enum { variants } => Some(variants),
            _ => None,
        }
    }

    /// Declaration index and payload type of a variant.
    pub fn variant(&self, name: &str) -> Option<(usize, &Type)> {
        self.variants()?
            .iter()
            .enumerate()
            .find(|(_, (variant, _))| variant == name)
            .map(|(tag, (_, ty))| (tag, ty))
    }
}

/// Owner of every instance, keyed by symbol and instance key.
#[derive(Clone, Debug, Default)]
pub struct InstanceArena {
    instances: Vec<Instance>,
    index: FxHashMap<(SymbolId, String), InstanceId>,
    ordinals: FxHashMap<SymbolId, u32>,
}

impl InstanceArena {
    pub fn get(&self, id: InstanceId) -> &Instance {
        &self.instances[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: InstanceId) -> &mut Instance {
        &mut self.instances[id.index()]
    }

    pub fn find(&self, symbol: SymbolId, key: &str) -> Option<InstanceId> {
        self.index.get(&(symbol, key.to_string())).copied()
    }

    /// Insert a pending record, assigning the next ordinal of `symbol`.
    pub(crate) fn insert(
        &mut self,
        symbol: SymbolId,
        path: String,
        key: String,
        type_args: Vec<Type>,
    ) -> InstanceId {
        let id = InstanceId(u32::try_from(self.instances.len()).unwrap_or(u32::MAX));
        let counter = self.ordinals.entry(symbol).or_default();
        let ordinal = *counter;
        *counter += 1;
        self.index.insert((symbol, key.clone()), id);
        self.instances.push(Instance {
            symbol,
            path,
            key,
            ordinal,
            type_args,
            data: InstanceData::Pending,
            failure: None,
            pending: Vec::new(),
            used: false,
        });
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.instances
            .iter()
            .enumerate()
            .map(|(i, instance)| (InstanceId(u32::try_from(i).unwrap_or(u32::MAX)), instance))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests;
