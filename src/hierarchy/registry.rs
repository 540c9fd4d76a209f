// Thu Oct 15 2026 - Alex

use crate::error::{ModelError, ModelResult};
use crate::hierarchy::{BaseRef, ClassBuilder, ClassDef, ClassId, MethodDecl};
use indexmap::IndexMap;
use log::debug;
use std::collections::{HashSet, VecDeque};

/// Arena of class definitions referenced by [`ClassId`].
///
/// The registry is always acyclic: `define` rejects a definition that would
/// close a cycle through forward-declared classes before committing it.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: Vec<ClassDef>,
    names: IndexMap<String, ClassId>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward-declare a class, returning the existing id if the name is known.
    pub fn declare(&mut self, name: &str) -> ClassId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = ClassId::new(self.classes.len());
        self.classes.push(ClassDef::forward(id, name));
        self.names.insert(name.to_string(), id);
        id
    }

    /// Define a class. Fails without touching the registry if the definition is malformed.
    pub fn define(&mut self, builder: ClassBuilder) -> ModelResult<ClassId> {
        let existing = self.names.get(&builder.name).copied();
        if let Some(id) = existing {
            if self.classes[id.index()].is_defined() {
                return Err(ModelError::DuplicateClass(builder.name));
            }
        }

        let mut seen = HashSet::new();
        for &(base, _) in &builder.bases {
            let base_def = self.get(base)?;
            if !seen.insert(base) {
                return Err(ModelError::DuplicateBase {
                    class: builder.name.clone(),
                    base: base_def.name.clone(),
                });
            }
        }

        let dependencies: Vec<ClassId> = builder
            .bases
            .iter()
            .map(|(class, _)| *class)
            .chain(builder.members.iter().filter_map(|m| m.object_class()))
            .collect();
        for &dep in &dependencies {
            self.get(dep)?;
        }

        if let Some(id) = existing {
            for &dep in &dependencies {
                if let Some(path) = self.find_path(dep, id) {
                    let mut names = vec![builder.name.clone()];
                    names.extend(path.iter().map(|c| self.name_of(*c)));
                    return Err(ModelError::Cycle(names));
                }
            }
        }

        for method in builder.methods.iter().filter(|m| m.is_override) {
            let mut overrides = false;
            for &(base, _) in &builder.bases {
                if self.declares_virtual_at_or_above(base, &method.name)? {
                    overrides = true;
                    break;
                }
            }
            if !overrides {
                return Err(ModelError::UnresolvedOverride {
                    class: builder.name.clone(),
                    method: method.name.clone(),
                });
            }
        }

        let id = match existing {
            Some(id) => id,
            None => self.declare(&builder.name),
        };

        let def = &mut self.classes[id.index()];
        def.bases = builder
            .bases
            .iter()
            .enumerate()
            .map(|(order, &(class, is_virtual))| BaseRef { class, is_virtual, order })
            .collect();
        def.methods = builder
            .methods
            .into_iter()
            .map(|m| MethodDecl {
                name: m.name,
                is_virtual: m.is_virtual,
                is_override: m.is_override,
                owner: id,
            })
            .collect();
        def.members = builder.members;
        def.defined = true;

        debug!("defined class {} as {}", def.name, id);
        Ok(id)
    }

    pub fn get(&self, id: ClassId) -> ModelResult<&ClassDef> {
        self.classes
            .get(id.index())
            .ok_or_else(|| ModelError::UnknownClass(id.to_string()))
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.names.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> ModelResult<ClassId> {
        self.lookup(name).ok_or_else(|| ModelError::UnknownClass(name.to_string()))
    }

    pub fn name_of(&self, id: ClassId) -> String {
        self.get(id).map(|c| c.name.clone()).unwrap_or_else(|_| id.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.iter()
    }

    pub fn ids(&self) -> Vec<ClassId> {
        self.names.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Check that every class reachable from `id` through bases or embedded
    /// members is defined, acyclic, and free of duplicate direct bases.
    pub fn ensure_complete(&self, id: ClassId) -> ModelResult<()> {
        let mut done = HashSet::new();
        let mut stack = Vec::new();
        self.visit_complete(id, id, &mut done, &mut stack)
    }

    fn visit_complete(
        &self,
        root: ClassId,
        id: ClassId,
        done: &mut HashSet<ClassId>,
        stack: &mut Vec<ClassId>,
    ) -> ModelResult<()> {
        if let Some(pos) = stack.iter().position(|c| *c == id) {
            let mut names: Vec<String> = stack[pos..].iter().map(|c| self.name_of(*c)).collect();
            names.push(self.name_of(id));
            return Err(ModelError::Cycle(names));
        }
        if done.contains(&id) {
            return Ok(());
        }

        let def = self.get(id)?;
        if !def.is_defined() {
            return Err(ModelError::IncompleteClass {
                class: self.name_of(root),
                incomplete: def.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for base in &def.bases {
            if !seen.insert(base.class) {
                return Err(ModelError::DuplicateBase {
                    class: def.name.clone(),
                    base: self.name_of(base.class),
                });
            }
        }

        stack.push(id);
        for dep in def.dependencies() {
            self.visit_complete(root, dep, done, stack)?;
        }
        stack.pop();
        done.insert(id);
        Ok(())
    }

    /// Path of classes from `from` to `to` following bases and embedded members.
    fn find_path(&self, from: ClassId, to: ClassId) -> Option<Vec<ClassId>> {
        let mut visited = HashSet::new();
        self.find_path_from(from, to, &mut visited)
    }

    fn find_path_from(&self, from: ClassId, to: ClassId, visited: &mut HashSet<ClassId>) -> Option<Vec<ClassId>> {
        if from == to {
            return Some(vec![from]);
        }
        if !visited.insert(from) {
            return None;
        }
        let def = self.get(from).ok()?;
        for dep in def.dependencies() {
            if let Some(mut path) = self.find_path_from(dep, to, visited) {
                path.insert(0, from);
                return Some(path);
            }
        }
        None
    }

    fn declares_virtual_at_or_above(&self, id: ClassId, name: &str) -> ModelResult<bool> {
        let def = self.get(id)?;
        if def.method(name).map(|m| m.is_virtual).unwrap_or(false) {
            return Ok(true);
        }
        self.inherits_virtual(id, name)
    }

    /// Whether a proper ancestor of `id` declares `name` virtual.
    pub fn inherits_virtual(&self, id: ClassId, name: &str) -> ModelResult<bool> {
        for ancestor in self.ancestors(id)? {
            if self.get(ancestor)?.method(name).map(|m| m.is_virtual).unwrap_or(false) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether `id` declares `name` and the declaration is virtual, either
    /// explicitly or because it overrides an inherited virtual.
    pub fn is_virtual_method(&self, id: ClassId, name: &str) -> ModelResult<bool> {
        match self.get(id)?.method(name) {
            None => Ok(false),
            Some(m) if m.is_virtual => Ok(true),
            Some(_) => self.inherits_virtual(id, name),
        }
    }

    /// Effectively virtual methods declared by `id`, in declaration order.
    pub fn virtual_methods(&self, id: ClassId) -> ModelResult<Vec<&MethodDecl>> {
        let mut out = Vec::new();
        for method in &self.get(id)?.methods {
            if self.is_virtual_method(id, &method.name)? {
                out.push(method);
            }
        }
        Ok(out)
    }

    /// Whether `id` declares at least one effectively virtual method.
    pub fn declares_virtuals(&self, id: ClassId) -> ModelResult<bool> {
        for method in &self.get(id)?.methods {
            if self.is_virtual_method(id, &method.name)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether the non-virtual part of `id` holds a vtable pointer, either its
    /// own or one inherited through a chain of non-virtual bases. Virtual bases
    /// bring their own pointers and do not count.
    pub fn has_vptr(&self, id: ClassId) -> ModelResult<bool> {
        let mut visited = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if self.declares_virtuals(current)? {
                return Ok(true);
            }
            stack.extend(self.get(current)?.non_virtual_bases().map(|b| b.class));
        }
        Ok(false)
    }

    /// First non-virtual base in declaration order that holds a vtable
    /// pointer; `id` shares that pointer instead of adding its own.
    pub fn primary_base(&self, id: ClassId) -> ModelResult<Option<ClassId>> {
        for base in self.get(id)?.non_virtual_bases() {
            if self.has_vptr(base.class)? {
                return Ok(Some(base.class));
            }
        }
        Ok(None)
    }

    /// A class adds a vtable pointer slot when it declares virtual methods
    /// and no non-virtual base already provides one.
    pub fn owns_vptr(&self, id: ClassId) -> ModelResult<bool> {
        Ok(self.primary_base(id)?.is_none() && self.declares_virtuals(id)?)
    }

    /// Direct virtual bases in declaration order. Each gets a
    /// virtual-base-pointer slot in the class's own part.
    pub fn direct_virtual_bases(&self, id: ClassId) -> ModelResult<Vec<ClassId>> {
        Ok(self.get(id)?.bases.iter().filter(|b| b.is_virtual).map(|b| b.class).collect())
    }

    /// Distinct virtual bases reachable from `id`, in pre-order of a
    /// left-to-right depth-first walk. This is the allocation order.
    pub fn virtual_bases(&self, id: ClassId) -> ModelResult<Vec<ClassId>> {
        let mut out = Vec::new();
        self.collect_virtual_bases(id, &mut out, &mut HashSet::new(), false)?;
        Ok(out)
    }

    /// Same set as [`virtual_bases`](Self::virtual_bases) in post-order, the order
    /// virtual bases are constructed in.
    pub fn virtual_bases_postorder(&self, id: ClassId) -> ModelResult<Vec<ClassId>> {
        let mut out = Vec::new();
        self.collect_virtual_bases(id, &mut out, &mut HashSet::new(), true)?;
        Ok(out)
    }

    /// A class already walked has contributed all of its virtual bases, so
    /// later paths to it are skipped.
    fn collect_virtual_bases(
        &self,
        id: ClassId,
        out: &mut Vec<ClassId>,
        walked: &mut HashSet<ClassId>,
        postorder: bool,
    ) -> ModelResult<()> {
        for base in &self.get(id)?.bases {
            if !postorder && base.is_virtual && !out.contains(&base.class) {
                out.push(base.class);
            }
            if walked.insert(base.class) {
                self.collect_virtual_bases(base.class, out, walked, postorder)?;
            }
            if postorder && base.is_virtual && !out.contains(&base.class) {
                out.push(base.class);
            }
        }
        Ok(())
    }

    /// Get all ancestors of a class, nearest first
    pub fn ancestors(&self, id: ClassId) -> ModelResult<Vec<ClassId>> {
        let mut out: Vec<ClassId> = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for base in &self.get(current)?.bases {
                if seen.insert(base.class) {
                    out.push(base.class);
                    queue.push_back(base.class);
                }
            }
        }
        Ok(out)
    }

    pub fn is_base_of(&self, base: ClassId, derived: ClassId) -> ModelResult<bool> {
        Ok(self.ancestors(derived)?.contains(&base))
    }
}
