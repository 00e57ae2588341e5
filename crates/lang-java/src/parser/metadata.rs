use super::types::find_child;
use super::{JavaParser, node_text, range_from_ts};
use crate::model::{JavaAnnotation, JavaImport, JavaTypeRef};
use tree_sitter::Node;

impl JavaParser {
    pub(super) fn extract_package_and_imports(
        &self,
        root: Node,
        source: &str,
    ) -> (Option<String>, Vec<JavaImport>) {
        let mut package = None;
        let mut imports = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "package_declaration" => {
                    package = qualified_name_child(child, source);
                }
                "import_declaration" => {
                    let Some(path) = qualified_name_child(child, source) else {
                        continue;
                    };
                    imports.push(JavaImport {
                        path,
                        is_wildcard: find_child(child, "asterisk").is_some(),
                        is_static: find_child(child, "static").is_some(),
                    });
                }
                _ => {}
            }
        }
        (package, imports)
    }

    /// Annotations in the `modifiers` of a declaration.
    pub(super) fn extract_annotations(&self, declaration: Node, source: &str) -> Vec<JavaAnnotation> {
        let Some(mods_node) = find_child(declaration, "modifiers") else {
            return vec![];
        };

        let mut annotations = Vec::new();
        let mut cursor = mods_node.walk();
        for child in mods_node.children(&mut cursor) {
            if matches!(child.kind(), "marker_annotation" | "annotation") {
                if let Some(annotation) = self.parse_annotation(child, source) {
                    annotations.push(annotation);
                }
            }
        }
        annotations
    }

    fn parse_annotation(&self, node: Node, source: &str) -> Option<JavaAnnotation> {
        let name_node = node.child_by_field_name("name")?;
        let name = node_text(name_node, source).trim_start_matches('@').trim().to_string();
        let mut annotation = JavaAnnotation {
            name,
            class_value: None,
            class_name: None,
            range: range_from_ts(node.range()),
        };

        let Some(args) = node.child_by_field_name("arguments") else {
            return Some(annotation);
        };
        let mut cursor = args.walk();
        for arg in args.named_children(&mut cursor) {
            if arg.kind() == "element_value_pair" {
                let key = arg.child_by_field_name("key").map(|k| node_text(k, source));
                let Some(value) = arg.child_by_field_name("value") else {
                    continue;
                };
                match key {
                    Some("value") => annotation.class_value = self.class_literal_type(value, source),
                    Some("className") => annotation.class_name = string_value(value, source),
                    _ => {}
                }
            } else {
                // A lone positional argument is the `value` element.
                annotation.class_value = self.class_literal_type(arg, source);
            }
        }
        Some(annotation)
    }

    /// `Foo.class` -> `Foo`, generic arguments dropped.
    fn class_literal_type(&self, value: Node, source: &str) -> Option<String> {
        if value.kind() != "class_literal" {
            return None;
        }
        let type_node = value.named_child(0)?;
        match self.parse_type_node(type_node, source) {
            JavaTypeRef::Raw(name) => Some(name),
            JavaTypeRef::Generic { base, .. } => match *base {
                JavaTypeRef::Raw(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }
}

fn qualified_name_child(node: Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let name = node
        .named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))?;
    Some(node_text(name, source).chars().filter(|c| !c.is_whitespace()).collect())
}

fn string_value(node: Node, source: &str) -> Option<String> {
    if node.kind() != "string_literal" {
        return None;
    }
    let text = node_text(node, source);
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    Some(inner.to_string())
}
