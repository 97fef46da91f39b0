// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The walker: owner of one visitor, its extensions, options and parent table.

use castwalk_core::{Entity, WalkError};

use super::extension::Extensions;
use super::parents::ParentMap;
use super::traits::Visitor;
use crate::options::WalkOptions;

/// Drives a [`Visitor`] over an entity tree.
///
/// The recursion itself lives in the walker's public operations
/// ([`visit_entities`](Self::visit_entities), [`visit`](Self::visit),
/// [`dispatch_assign_target`](Self::dispatch_assign_target) and friends) so
/// extension handlers can call back into the same traversal.
///
/// # Example
///
/// ```
/// use castwalk_core::{Entity, Node, NodeKind};
/// use castwalk_visit::{EntityContext, EventRecorder, Walker};
///
/// let function = Entity::function("f").with_ast(Node::new(
///     NodeKind::Return,
///     vec![Node::var("x")],
/// ));
/// let mut walker = Walker::new(EventRecorder::new());
/// walker.walk(&function, &EntityContext::new(&function)).unwrap();
///
/// let trace = walker.into_visitor().trace();
/// assert_eq!(trace[0], "enter_entity f");
/// ```
pub struct Walker<'a, V: Visitor<'a>> {
    pub(crate) visitor: V,
    pub(crate) parents: ParentMap<'a>,
    pub(crate) extensions: Extensions<'a, V>,
    pub(crate) options: WalkOptions,
}

impl<'a, V: Visitor<'a>> Walker<'a, V> {
    /// A walker with default options and no extensions.
    pub fn new(visitor: V) -> Self {
        Walker {
            visitor,
            parents: ParentMap::new(),
            extensions: Extensions::new(),
            options: WalkOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions<'a, V>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    /// Consume the walker, returning the visitor and whatever it accumulated.
    pub fn into_visitor(self) -> V {
        self.visitor
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    pub fn extensions(&self) -> &Extensions<'a, V> {
        &self.extensions
    }

    /// The parent table of the walk in progress.
    pub fn parents(&self) -> &ParentMap<'a> {
        &self.parents
    }

    /// The recorded parent of `entity` in the walk in progress.
    pub fn parent_of(&self, entity: &Entity) -> Option<&'a Entity> {
        self.parents.get(entity)
    }

    /// Walk `root` and everything nested in it, starting from `context`.
    ///
    /// Each call starts a fresh parent table and returns it on success.
    ///
    /// # Errors
    ///
    /// Returns the first [`WalkError`] raised anywhere in the tree. The walk
    /// stops at that point; hooks already called are not undone.
    pub fn walk(&mut self, root: &'a Entity, context: &V::Context) -> Result<ParentMap<'a>, WalkError> {
        let span = tracing::debug_span!("walk", root = root.name(), kind = %root.kind());
        let _guard = span.enter();

        self.parents = ParentMap::new();
        self.visit_entities(root, context)?;
        tracing::debug!(parents = self.parents.len(), "walk complete");
        Ok(std::mem::take(&mut self.parents))
    }
}
