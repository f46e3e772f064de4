//! Visitor-based traversal of model trees
//!
//! Every model type implements [`Visitable`]. `accept` walks a node and its children in
//! declared element order; list elements are visited with their index. A [`Visitor`]
//! decides how deep to go: returning `false` from [`Visitor::pre_visit`] skips a node
//! entirely, returning `false` from [`Visitor::visit`] skips only its children.

use super::datatypes::Reference;
use crate::error::Result;
use rust_decimal::Decimal;
use std::any::Any;

/// Value carried by a primitive node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveValue<'a> {
    Boolean(bool),
    Integer(i64),
    Decimal(&'a Decimal),
    String(&'a str),
}

impl std::fmt::Display for PrimitiveValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimitiveValue::Boolean(value) => write!(f, "{value}"),
            PrimitiveValue::Integer(value) => write!(f, "{value}"),
            PrimitiveValue::Decimal(value) => write!(f, "{value}"),
            PrimitiveValue::String(value) => write!(f, "{value}"),
        }
    }
}

/// Upcast helper so visitors can downcast nodes to their concrete type
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A node of the model tree
pub trait Visitable: AsAny {
    /// FHIR type name; BackboneElements use their element path (e.g. `Specimen.collection`)
    fn type_name(&self) -> &'static str;

    /// Whether any child element is present
    fn has_children(&self) -> bool;

    /// Walk this node and its children
    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor);

    /// Checks this node's own rules; children are checked by their own `validate`
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// The value of a primitive node
    fn primitive_value(&self) -> Option<PrimitiveValue<'_>> {
        None
    }
}

impl<'a> dyn Visitable + 'a {
    /// Downcast to a concrete model type
    pub fn downcast_ref<T: Visitable + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

pub trait Visitor {
    fn pre_visit(&mut self, _node: &dyn Visitable) -> bool {
        true
    }

    fn visit_start(&mut self, _element_name: &str, _element_index: Option<usize>, _node: &dyn Visitable) {}

    fn visit(&mut self, _element_name: &str, _element_index: Option<usize>, _node: &dyn Visitable) -> bool {
        true
    }

    fn visit_end(&mut self, _element_name: &str, _element_index: Option<usize>, _node: &dyn Visitable) {}

    fn post_visit(&mut self, _node: &dyn Visitable) {}

    fn visit_list_start(&mut self, _element_name: &str, _len: usize) {}

    fn visit_list_end(&mut self, _element_name: &str, _len: usize) {}
}

/// Standard traversal of one node; `children` is only invoked when the visitor asks for it
pub(crate) fn walk<T: Visitable>(
    node: &T,
    element_name: &str,
    element_index: Option<usize>,
    visitor: &mut dyn Visitor,
    children: impl FnOnce(&mut dyn Visitor),
) {
    if visitor.pre_visit(node) {
        visitor.visit_start(element_name, element_index, node);
        if visitor.visit(element_name, element_index, node) {
            children(&mut *visitor);
        }
        visitor.visit_end(element_name, element_index, node);
        visitor.post_visit(node);
    }
}

pub(crate) fn accept_optional<T: Visitable>(
    element: Option<&T>,
    element_name: &str,
    visitor: &mut dyn Visitor,
) {
    if let Some(element) = element {
        element.accept(element_name, None, visitor);
    }
}

pub(crate) fn accept_list<T: Visitable>(elements: &[T], element_name: &str, visitor: &mut dyn Visitor) {
    if elements.is_empty() {
        return;
    }
    visitor.visit_list_start(element_name, elements.len());
    for (index, element) in elements.iter().enumerate() {
        element.accept(element_name, Some(index), visitor);
    }
    visitor.visit_list_end(element_name, elements.len());
}

/// Collects the FHIRPath-style location of every visited node,
/// e.g. `Specimen.container[0].device`
#[derive(Debug, Default)]
pub struct PathCollector {
    stack: Vec<String>,
    paths: Vec<String>,
}

impl PathCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected paths in visiting order
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<String> {
        self.paths
    }

    /// Path of the node currently being visited
    pub(crate) fn current(&self) -> String {
        self.stack.join(".")
    }

    pub(crate) fn push(&mut self, element_name: &str, element_index: Option<usize>) {
        match element_index {
            Some(index) => self.stack.push(format!("{element_name}[{index}]")),
            None => self.stack.push(element_name.to_string()),
        }
    }

    pub(crate) fn pop(&mut self) {
        self.stack.pop();
    }
}

impl Visitor for PathCollector {
    fn visit_start(&mut self, element_name: &str, element_index: Option<usize>, _node: &dyn Visitable) {
        self.push(element_name, element_index);
        self.paths.push(self.current());
    }

    fn visit_end(&mut self, _element_name: &str, _element_index: Option<usize>, _node: &dyn Visitable) {
        self.pop();
    }
}

/// Collects the literal `Reference.reference` values of a tree
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    references: Vec<String>,
    include_contained: bool,
}

impl ReferenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also report `#id` references to contained resources
    pub fn include_contained(mut self, include: bool) -> Self {
        self.include_contained = include;
        self
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn into_references(self) -> Vec<String> {
        self.references
    }
}

impl Visitor for ReferenceCollector {
    fn visit(&mut self, _element_name: &str, _element_index: Option<usize>, node: &dyn Visitable) -> bool {
        if let Some(reference) = node.downcast_ref::<Reference>().and_then(Reference::reference) {
            if self.include_contained || !reference.starts_with('#') {
                self.references.push(reference.to_string());
            }
        }
        true
    }
}
