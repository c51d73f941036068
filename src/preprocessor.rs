use tracing::debug;

use crate::error::XppResult;
use crate::parser;
use crate::runtime::RuntimeValues;
use crate::tree::Document;

/// Namespace of the conditional attribute.
pub const NAMESPACE: &str = "http://writer.live.com/xmlpp/2007";

/// Local name of the conditional attribute.
pub const CONDITION_ATTRIBUTE: &str = "if";

/// Operations the preprocessor needs from a host element tree.
pub trait ConditionalTree {
    type Node: Copy;

    fn is_element(&self, node: Self::Node) -> bool;

    fn attribute(&self, node: Self::Node, namespace: &str, name: &str) -> Option<String>;

    fn remove_attribute(&mut self, node: Self::Node, namespace: &str, name: &str);

    /// Snapshot of the node's children, unaffected by later mutation.
    fn child_nodes(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Removes the node from its parent.
    fn detach(&mut self, node: Self::Node);
}

/// Evaluates conditional expressions against a fixed set of runtime values and strips
/// elements whose condition is false.
pub struct XmlPreprocessor {
    values: RuntimeValues,
}

impl XmlPreprocessor {
    pub fn new(values: RuntimeValues) -> Self {
        XmlPreprocessor { values }
    }

    pub fn values(&self) -> &RuntimeValues {
        &self.values
    }

    /// Parses and evaluates a single expression.
    pub fn test(&self, expression: &str) -> XppResult<bool> {
        parser::parse(expression)?.evaluate(&self.values)
    }

    /// Processes `element` and its descendants in place. An element whose condition is false
    /// is detached together with its subtree; surviving elements lose the condition attribute.
    ///
    /// An error stops processing. Removals made before the failing element stay in place.
    pub fn munge<T: ConditionalTree>(&self, tree: &mut T, element: T::Node) -> XppResult<()> {
        if let Some(expression) = tree.attribute(element, NAMESPACE, CONDITION_ATTRIBUTE) {
            let keep = self.test(&expression)?;
            debug!(expression = %expression, keep, "evaluated condition");
            if !keep {
                tree.detach(element);
                return Ok(())
            }
            tree.remove_attribute(element, NAMESPACE, CONDITION_ATTRIBUTE);
        }

        for child in tree.child_nodes(element) {
            if tree.is_element(child) {
                self.munge(tree, child)?;
            }
        }
        Ok(())
    }

    /// Processes the root element of `document`.
    pub fn munge_document(&self, document: &mut Document) -> XppResult<()> {
        match document.root_element() {
            Some(root) => self.munge(document, root),
            None => Ok(()),
        }
    }
}
