use super::{JavaParser, node_text, range_from_ts};
use crate::model::{JavaClassDecl, JavaMethodDecl};
use shadowscope_api::ClassKind;
use tree_sitter::Node;

fn class_kind(node_kind: &str) -> Option<ClassKind> {
    match node_kind {
        "class_declaration" => Some(ClassKind::Class),
        "interface_declaration" => Some(ClassKind::Interface),
        "enum_declaration" => Some(ClassKind::Enum),
        "annotation_type_declaration" => Some(ClassKind::Annotation),
        "record_declaration" => Some(ClassKind::Record),
        _ => None,
    }
}

impl JavaParser {
    /// Collects the type declarations directly under `parent`, then recurses
    /// into their bodies. Local and anonymous classes are not visited.
    pub(super) fn collect_type_declarations(
        &self,
        parent: Node,
        source: &str,
        package: Option<&str>,
        enclosing: &[String],
        out: &mut Vec<JavaClassDecl>,
    ) {
        let mut cursor = parent.walk();
        for child in parent.children(&mut cursor) {
            if child.kind() == "enum_body_declarations" {
                self.collect_type_declarations(child, source, package, enclosing, out);
                continue;
            }
            let Some(kind) = class_kind(child.kind()) else {
                continue;
            };
            let Some(name_node) = child.child_by_field_name("name") else {
                continue;
            };
            let name = node_text(name_node, source).to_string();
            let fqn = match (enclosing.first(), package) {
                (Some(outer), _) => format!("{}.{}", outer, name),
                (None, Some(pkg)) if !pkg.is_empty() => format!("{}.{}", pkg, name),
                _ => name.clone(),
            };

            let body = child.child_by_field_name("body");
            let methods = body
                .map(|b| self.collect_methods(b, source))
                .unwrap_or_default();

            out.push(JavaClassDecl {
                fqn: fqn.clone(),
                name,
                kind,
                annotations: self.extract_annotations(child, source),
                type_parameters: self.extract_type_parameters(child, source),
                methods,
                enclosing: enclosing.to_vec(),
                range: range_from_ts(child.range()),
                name_range: range_from_ts(name_node.range()),
            });

            if let Some(body) = body {
                let mut nested_enclosing = Vec::with_capacity(enclosing.len() + 1);
                nested_enclosing.push(fqn);
                nested_enclosing.extend_from_slice(enclosing);
                self.collect_type_declarations(body, source, package, &nested_enclosing, out);
            }
        }
    }

    fn collect_methods(&self, body: Node, source: &str) -> Vec<JavaMethodDecl> {
        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                "method_declaration" | "constructor_declaration" => {
                    if let Some(method) = self.parse_method(member, source) {
                        methods.push(method);
                    }
                }
                "enum_body_declarations" => methods.extend(self.collect_methods(member, source)),
                _ => {}
            }
        }
        methods
    }

    fn parse_method(&self, node: Node, source: &str) -> Option<JavaMethodDecl> {
        let name_node = node.child_by_field_name("name")?;
        Some(JavaMethodDecl {
            name: node_text(name_node, source).to_string(),
            parameters: self.extract_method_parameters(node, source),
            type_parameters: self.extract_type_parameters(node, source),
            annotations: self.extract_annotations(node, source),
            is_constructor: node.kind() == "constructor_declaration",
            name_range: range_from_ts(name_node.range()),
        })
    }
}
