use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::{EnumDef, FunctionDef, ImplDef, StructDef, TraitDef, VariantDef},
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
};

/// Dispatch key of the method table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    /// Runtime type name of the receiver.
    pub type_name: String,
    /// Method name.
    pub method:    String,
    /// Number of arguments, not counting `self`.
    pub arity:     usize,
}

impl MethodKey {
    /// Builds a key from borrowed parts.
    #[must_use]
    pub fn new(type_name: &str, method: &str, arity: usize) -> Self {
        Self { type_name: type_name.to_string(),
               method: method.to_string(),
               arity }
    }
}

/// Key of a trait implementation record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImplKey {
    /// The implementing type.
    pub type_name:  String,
    /// The implemented trait.
    pub trait_name: String,
    /// The trait's type arguments as written, e.g. `["int"]`.
    pub type_args:  Vec<String>,
}

/// Every declaration a run has reached so far.
///
/// Declarations are held by `Rc` so the same declaration can be reached
/// again, for instance inside a loop body, without counting as a redefinition.
#[derive(Debug, Default)]
pub struct Registry {
    functions: HashMap<String, Rc<FunctionDef>>,
    structs:   HashMap<String, Rc<StructDef>>,
    enums:     HashMap<String, Rc<EnumDef>>,
    traits:    HashMap<String, Rc<TraitDef>>,
    impls:     HashMap<ImplKey, Rc<ImplDef>>,
    methods:   HashMap<MethodKey, Rc<FunctionDef>>,
}

/// Inserts `def` under `key`, accepting the identical declaration again.
///
/// # Returns
/// `Ok(true)` if the entry is new, `Ok(false)` if the same declaration was
/// already present, `Err(())` for a different declaration under the key.
fn insert_once<K, V>(map: &mut HashMap<K, Rc<V>>, key: K, def: &Rc<V>) -> Result<bool, ()>
    where K: Eq + std::hash::Hash
{
    match map.get(&key) {
        Some(existing) if Rc::ptr_eq(existing, def) => Ok(false),
        Some(_) => Err(()),
        None => {
            map.insert(key, Rc::clone(def));
            Ok(true)
        },
    }
}

impl Registry {
    /// Looks up a free function.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Rc<FunctionDef>> {
        self.functions.get(name)
    }

    /// Looks up a struct declaration.
    #[must_use]
    pub fn struct_def(&self, name: &str) -> Option<&Rc<StructDef>> {
        self.structs.get(name)
    }

    /// Looks up an enum declaration.
    #[must_use]
    pub fn enum_def(&self, name: &str) -> Option<&Rc<EnumDef>> {
        self.enums.get(name)
    }

    /// Looks up a variant of a declared enum.
    #[must_use]
    pub fn variant(&self, enum_name: &str, variant: &str) -> Option<&VariantDef> {
        self.enums
            .get(enum_name)?
            .variants
            .iter()
            .find(|v| v.name == variant)
    }

    /// Returns `true` if `name` is a declared struct or enum.
    #[must_use]
    pub fn is_type(&self, name: &str) -> bool {
        self.structs.contains_key(name) || self.enums.contains_key(name)
    }

    /// Looks up a method by its dispatch key.
    #[must_use]
    pub fn method(&self, type_name: &str, method: &str, arity: usize) -> Option<&Rc<FunctionDef>> {
        self.methods.get(&MethodKey::new(type_name, method, arity))
    }

    /// Registers a free function.
    ///
    /// # Errors
    /// `DuplicateDefinition` if a different function already has the name.
    pub fn register_function(&mut self, def: &Rc<FunctionDef>) -> EvalResult<()> {
        match insert_once(&mut self.functions, def.name.clone(), def) {
            Ok(true) => {
                debug!(name = %def.name, params = def.params.len(), "registered function");
                Ok(())
            },
            Ok(false) => Ok(()),
            Err(()) => Err(RuntimeError::DuplicateDefinition { name: def.name.clone(),
                                                               line: def.line, }),
        }
    }

    /// Registers a method of `type_name` under (type, name, arity).
    ///
    /// # Errors
    /// `AmbiguousMethod` if a different body is already registered under the
    /// same key.
    pub fn register_method(&mut self,
                           type_name: &str,
                           def: &Rc<FunctionDef>,
                           line: usize)
                           -> EvalResult<()> {
        let key = MethodKey::new(type_name, &def.name, def.arity());
        match insert_once(&mut self.methods, key, def) {
            Ok(true) => {
                debug!(type_name, method = %def.name, arity = def.arity(), "registered method");
                Ok(())
            },
            Ok(false) => Ok(()),
            Err(()) => Err(RuntimeError::AmbiguousMethod { type_name: type_name.to_string(),
                                                           method: def.name.clone(),
                                                           arity: def.arity(),
                                                           line }),
        }
    }

    /// Registers a struct type.
    ///
    /// # Errors
    /// `DuplicateDefinition` if a different struct or any enum has the name.
    pub fn register_struct(&mut self, def: &Rc<StructDef>) -> EvalResult<()> {
        let duplicate = || RuntimeError::DuplicateDefinition { name: def.name.clone(),
                                                               line: def.line, };
        if self.enums.contains_key(&def.name) {
            return Err(duplicate());
        }
        match insert_once(&mut self.structs, def.name.clone(), def) {
            Ok(true) => {
                debug!(name = %def.name, fields = def.fields.len(), "registered struct");
                Ok(())
            },
            Ok(false) => Ok(()),
            Err(()) => Err(duplicate()),
        }
    }

    /// Registers an enum type.
    ///
    /// # Errors
    /// `DuplicateDefinition` if a different enum or any struct has the name.
    pub fn register_enum(&mut self, def: &Rc<EnumDef>) -> EvalResult<()> {
        let duplicate = || RuntimeError::DuplicateDefinition { name: def.name.clone(),
                                                               line: def.line, };
        if self.structs.contains_key(&def.name) {
            return Err(duplicate());
        }
        match insert_once(&mut self.enums, def.name.clone(), def) {
            Ok(true) => {
                debug!(name = %def.name, variants = def.variants.len(), "registered enum");
                Ok(())
            },
            Ok(false) => Ok(()),
            Err(()) => Err(duplicate()),
        }
    }

    /// Registers a trait.
    ///
    /// # Errors
    /// - `UnknownType` if the parent trait has not been declared.
    /// - `DuplicateDefinition` if a different trait has the name.
    pub fn register_trait(&mut self, def: &Rc<TraitDef>) -> EvalResult<()> {
        if let Some(parent) = &def.parent
           && !self.traits.contains_key(parent)
        {
            return Err(RuntimeError::UnknownType { name: parent.clone(),
                                                   line: def.line, });
        }
        match insert_once(&mut self.traits, def.name.clone(), def) {
            Ok(true) => {
                debug!(name = %def.name, parent = ?def.parent, "registered trait");
                Ok(())
            },
            Ok(false) => Ok(()),
            Err(()) => Err(RuntimeError::DuplicateDefinition { name: def.name.clone(),
                                                               line: def.line, }),
        }
    }

    /// The trait and its ancestors, nearest first.
    fn trait_chain(&self, name: &str) -> Vec<Rc<TraitDef>> {
        let mut chain: Vec<Rc<TraitDef>> = Vec::new();
        let mut current = self.traits.get(name).cloned();
        while let Some(def) = current {
            if chain.iter().any(|seen| Rc::ptr_eq(seen, &def)) {
                break;
            }
            current = def.parent.as_ref().and_then(|p| self.traits.get(p)).cloned();
            chain.push(def);
        }
        chain
    }

    /// Registers an impl block.
    ///
    /// An inherent impl registers its methods. A trait impl first checks that
    /// every method required by the trait or an ancestor is supplied, either
    /// by the impl or by a default body, then records the impl and registers
    /// the supplied methods followed by the inherited defaults. Nothing is
    /// registered when the check fails.
    ///
    /// # Errors
    /// - `UnknownType` for an undeclared trait.
    /// - `TraitConformance` listing the missing method names.
    /// - `DuplicateDefinition` for a second, different impl of the same trait
    ///   with the same type arguments for the same type.
    /// - `AmbiguousMethod` if a method collides with one already registered.
    pub fn register_impl(&mut self, def: &Rc<ImplDef>) -> EvalResult<()> {
        let Some(trait_name) = &def.trait_name else {
            for method in &def.methods {
                self.register_method(&def.type_name, method, method.line)?;
            }
            return Ok(());
        };

        if !self.traits.contains_key(trait_name) {
            return Err(RuntimeError::UnknownType { name: trait_name.clone(),
                                                   line: def.line, });
        }
        let chain = self.trait_chain(trait_name);

        let supplied = |name: &str| {
            def.methods.iter().any(|m| m.name == name)
            || chain.iter()
                    .any(|t| t.provided.iter().any(|p| p.name == name))
        };
        let mut missing = chain.iter()
                               .flat_map(|t| t.required.iter())
                               .filter(|name| !supplied(name.as_str()))
                               .cloned()
                               .collect::<Vec<_>>();
        missing.sort();
        missing.dedup();
        if !missing.is_empty() {
            return Err(RuntimeError::TraitConformance { trait_name: trait_name.clone(),
                                                        type_name: def.type_name.clone(),
                                                        missing,
                                                        line: def.line });
        }

        let key = ImplKey { type_name:  def.type_name.clone(),
                            trait_name: trait_name.clone(),
                            type_args:  def.trait_args.iter().map(ToString::to_string).collect(), };
        match insert_once(&mut self.impls, key, def) {
            Ok(true) => {
                debug!(type_name = %def.type_name, trait_name = %trait_name, "registered impl");
            },
            Ok(false) => return Ok(()),
            Err(()) => {
                return Err(RuntimeError::DuplicateDefinition { name: format!("impl {trait_name} for {}",
                                                                             def.type_name),
                                                               line: def.line, });
            },
        }

        for method in &def.methods {
            self.register_method(&def.type_name, method, method.line)?;
        }
        let mut inherited: Vec<&str> = def.methods.iter().map(|m| m.name.as_str()).collect();
        for ancestor in &chain {
            for default in &ancestor.provided {
                if inherited.contains(&default.name.as_str()) {
                    continue;
                }
                inherited.push(&default.name);
                self.register_method(&def.type_name, default, def.line)?;
            }
        }
        Ok(())
    }
}
