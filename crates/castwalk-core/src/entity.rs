//! Entities: the lexical units (files, types, functions, scripts, fields) a
//! translator produces, each with its own table of nested, scoped entities.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::node::{Node, NodeId};

// ============================================================================
// Entity Kinds
// ============================================================================

/// The kind of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    File,
    Type,
    Function,
    Script,
    Field,
    /// A front-end specific kind, identified by name.
    Custom(&'static str),
}

impl EntityKind {
    /// Returns the name used in diagnostics and traces.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::File => "file",
            EntityKind::Type => "type",
            EntityKind::Function => "function",
            EntityKind::Script => "script",
            EntityKind::Field => "field",
            EntityKind::Custom(name) => name,
        }
    }

    /// Returns true for kinds whose body is executable code.
    pub fn is_code(&self) -> bool {
        matches!(self, EntityKind::Function | EntityKind::Script)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Identity and Scope Keys
// ============================================================================

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn fresh() -> Self {
        EntityId(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Where a nested entity is declared within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// Scoped to the entity as a whole.
    Global,
    /// Scoped to a specific node of the entity's body. The walker visits such
    /// entities right after that node has been processed.
    Node(NodeId),
}

// ============================================================================
// Entity
// ============================================================================

/// A lexical unit with an optional body and a table of scoped entities.
///
/// Equality is identity. Scopes keep their insertion order, and entities
/// within a scope keep binding order.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    name: String,
    ast: Option<Node>,
    scopes: Vec<(ScopeKey, Vec<Entity>)>,
}

impl Entity {
    /// Create an entity of any kind.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Entity {
            id: EntityId::fresh(),
            kind,
            name: name.into(),
            ast: None,
            scopes: Vec::new(),
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Entity::new(EntityKind::File, name)
    }

    pub fn type_entity(name: impl Into<String>) -> Self {
        Entity::new(EntityKind::Type, name)
    }

    pub fn function(name: impl Into<String>) -> Self {
        Entity::new(EntityKind::Function, name)
    }

    pub fn script(name: impl Into<String>) -> Self {
        Entity::new(EntityKind::Script, name)
    }

    pub fn field(name: impl Into<String>) -> Self {
        Entity::new(EntityKind::Field, name)
    }

    pub fn custom(kind: &'static str, name: impl Into<String>) -> Self {
        Entity::new(EntityKind::Custom(kind), name)
    }

    /// Attach the executable body.
    pub fn with_ast(mut self, ast: Node) -> Self {
        self.ast = Some(ast);
        self
    }

    /// Add a nested entity under `key`, returning `self` for chaining.
    pub fn with_scoped(mut self, key: ScopeKey, entity: Entity) -> Self {
        self.add_scoped(key, entity);
        self
    }

    /// Add a nested entity to the global scope.
    pub fn with_global_scoped(self, entity: Entity) -> Self {
        self.with_scoped(ScopeKey::Global, entity)
    }

    /// Add a nested entity scoped to the node identified by `node`.
    pub fn with_node_scoped(self, node: NodeId, entity: Entity) -> Self {
        self.with_scoped(ScopeKey::Node(node), entity)
    }

    /// Add a nested entity under `key`.
    pub fn add_scoped(&mut self, key: ScopeKey, entity: Entity) {
        match self.scopes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, entities)) => entities.push(entity),
            None => self.scopes.push((key, vec![entity])),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ast(&self) -> Option<&Node> {
        self.ast.as_ref()
    }

    /// Entities declared under one scope key, in binding order.
    pub fn scoped_entities(&self, key: ScopeKey) -> &[Entity] {
        self.scopes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, entities)| entities.as_slice())
            .unwrap_or(&[])
    }

    /// Entities of every scope, scope by scope in insertion order.
    pub fn all_scoped_entities(&self) -> impl Iterator<Item = &Entity> {
        self.scopes.iter().flat_map(|(_, entities)| entities.iter())
    }

    /// The scope table as (key, entities) pairs.
    pub fn scopes(&self) -> impl Iterator<Item = (ScopeKey, &[Entity])> {
        self.scopes
            .iter()
            .map(|(key, entities)| (*key, entities.as_slice()))
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
