//! selectors crate Element implementation for the arena [`Document`].
//!
//! This is what lets a [`SelectionPath`](super::SelectionPath) run against
//! parsed documents. Matching can be scoped: ancestor traversal stops at the
//! scope node, so a path evaluated relative to one context node can never
//! reach siblings or ancestors of that context.

use std::fmt;

use html5ever::{LocalName, Namespace};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::MatchingContext;
use selectors::matching::ElementSelectorFlags;
use selectors::parser::SelectorParseErrorKind;
use selectors::{OpaqueElement, SelectorImpl};

use crate::dom::{Document, NodeData, NodeId};

/// Selector implementation for the selectors crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiftSelectors;

/// Identifier string type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct IdentStr(pub String);

impl precomputed_hash::PrecomputedHash for IdentStr {
    fn precomputed_hash(&self) -> u32 {
        let mut h: u32 = 0;
        for byte in self.0.bytes() {
            h = h.wrapping_mul(31).wrapping_add(byte as u32);
        }
        h
    }
}

/// Wrapper type for LocalName that implements ToCss.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CssLocalName(pub LocalName);

impl precomputed_hash::PrecomputedHash for CssLocalName {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl cssparser::ToCss for CssLocalName {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.0.as_ref())
    }
}

impl From<String> for CssLocalName {
    fn from(s: String) -> Self {
        Self(LocalName::from(s))
    }
}

impl<'a> From<&'a str> for CssLocalName {
    fn from(s: &'a str) -> Self {
        Self(LocalName::from(s))
    }
}

impl AsRef<str> for CssLocalName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

/// Wrapper type for Namespace that implements ToCss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CssNamespace(pub Namespace);

impl precomputed_hash::PrecomputedHash for CssNamespace {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl cssparser::ToCss for CssNamespace {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.0.as_ref())
    }
}

impl From<String> for CssNamespace {
    fn from(s: String) -> Self {
        Self(Namespace::from(s))
    }
}

impl<'a> From<&'a str> for CssNamespace {
    fn from(s: &'a str) -> Self {
        Self(Namespace::from(s))
    }
}

impl<'i> selectors::parser::Parser<'i> for SiftSelectors {
    type Impl = SiftSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

impl AsRef<str> for IdentStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for IdentStr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'a> From<&'a str> for IdentStr {
    fn from(s: &'a str) -> Self {
        Self(s.to_string())
    }
}

impl cssparser::ToCss for IdentStr {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.0)
    }
}

/// Pseudo-element type. Selection paths are structural only, so this is
/// uninhabited; using one in a path is a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoElement {}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = SiftSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        match *self {}
    }

    fn valid_after_slotted(&self) -> bool {
        match *self {}
    }
}

/// Non-tree-structural pseudo-class type, also uninhabited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NonTSPseudoClass {}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = SiftSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl SelectorImpl for SiftSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = IdentStr;
    type Identifier = IdentStr;
    type LocalName = CssLocalName;
    type NamespaceUrl = CssNamespace;
    type NamespacePrefix = IdentStr;
    type BorrowedLocalName = CssLocalName;
    type BorrowedNamespaceUrl = CssNamespace;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// Reference to one element of a [`Document`] for selector matching.
///
/// `scope` bounds ancestor traversal: `parent_element` returns `None` once
/// the scope node is reached, making the scope behave as the matching root.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    pub doc: &'a Document,
    pub id: NodeId,
    scope: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn new(doc: &'a Document, id: NodeId, scope: NodeId) -> Self {
        Self { doc, id, scope }
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.doc.element_name(self.id))
            .finish()
    }
}

impl<'a> selectors::Element for ElementRef<'a> {
    type Impl = SiftSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self)
    }

    fn parent_element(&self) -> Option<Self> {
        let node = self.doc.get(self.id)?;
        if node.parent.is_none() || node.parent == self.scope {
            return None;
        }
        if self.doc.is_element(node.parent) {
            Some(Self::new(self.doc, node.parent, self.scope))
        } else {
            None
        }
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let node = self.doc.get(self.id)?;
        let mut current = node.prev_sibling;
        while current.is_some() {
            if self.doc.is_element(current) {
                return Some(Self::new(self.doc, current, self.scope));
            }
            current = self.doc.get(current)?.prev_sibling;
        }
        None
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let node = self.doc.get(self.id)?;
        let mut current = node.next_sibling;
        while current.is_some() {
            if self.doc.is_element(current) {
                return Some(Self::new(self.doc, current, self.scope));
            }
            current = self.doc.get(current)?.next_sibling;
        }
        None
    }

    fn first_element_child(&self) -> Option<Self> {
        for child in self.doc.children(self.id) {
            if self.doc.is_element(child) {
                return Some(Self::new(self.doc, child, self.scope));
            }
        }
        None
    }

    fn is_html_element_in_html_document(&self) -> bool {
        // Drives case-insensitive tag matching for HTML documents
        self.doc.is_html()
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.doc
            .element_name(self.id)
            .is_some_and(|n| n == &name.0)
    }

    fn has_namespace(&self, ns: &CssNamespace) -> bool {
        self.doc.get(self.id).is_some_and(|n| match &n.data {
            NodeData::Element { name, .. } => name.ns == ns.0,
            _ => false,
        })
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.doc.element_name(self.id) == other.doc.element_name(other.id)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssNamespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&IdentStr>,
    ) -> bool {
        let node = match self.doc.get(self.id) {
            Some(n) => n,
            None => return false,
        };

        let attrs = match &node.data {
            NodeData::Element { attrs, .. } => attrs,
            _ => return false,
        };

        for attr in attrs {
            let ns_match = match ns {
                NamespaceConstraint::Any => true,
                NamespaceConstraint::Specific(ns) => attr.name.ns == ns.0,
            };
            if !ns_match {
                continue;
            }

            if attr.name.local != local_name.0 {
                continue;
            }

            return operation.eval_str(&attr.value);
        }
        false
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn is_link(&self) -> bool {
        false
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        let elem_id = match self.doc.element_id(self.id) {
            Some(i) => i,
            None => return false,
        };
        case_sensitivity.eq(elem_id.as_bytes(), id.0.as_bytes())
    }

    fn has_class(&self, name: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .element_classes(self.id)
            .iter()
            .any(|c| case_sensitivity.eq(c.as_bytes(), name.0.as_bytes()))
    }

    fn imported_part(&self, _name: &IdentStr) -> Option<IdentStr> {
        None
    }

    fn is_part(&self, _name: &IdentStr) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        for child in self.doc.children(self.id) {
            let node = match self.doc.get(child) {
                Some(n) => n,
                None => continue,
            };
            match &node.data {
                NodeData::Element { .. } => return false,
                NodeData::Text(t) if !t.trim().is_empty() => return false,
                _ => {}
            }
        }
        true
    }

    fn is_root(&self) -> bool {
        let parent = self.doc.get(self.id).map(|n| n.parent);
        if let Some(parent) = parent
            && let Some(parent_node) = self.doc.get(parent)
        {
            return matches!(parent_node.data, NodeData::Document);
        }
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }

    fn has_custom_state(&self, _name: &IdentStr) -> bool {
        false
    }
}
