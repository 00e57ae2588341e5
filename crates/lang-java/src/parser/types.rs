use super::{JavaParser, node_text};
use crate::model::{JavaParameter, JavaTypeRef};
use tree_sitter::Node;

impl JavaParser {
    pub fn parse_type_node(&self, node: Node, source: &str) -> JavaTypeRef {
        match node.kind() {
            "generic_type" => {
                let base = node
                    .named_child(0)
                    .map(|b| self.parse_type_node(b, source))
                    .unwrap_or(JavaTypeRef::Unknown);

                let mut args = Vec::new();
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.kind() == "type_arguments" {
                        let mut args_cursor = child.walk();
                        for arg in child.named_children(&mut args_cursor) {
                            args.push(self.parse_type_node(arg, source));
                        }
                    }
                }

                JavaTypeRef::Generic {
                    base: Box::new(base),
                    args,
                }
            }
            "array_type" => {
                let element = node
                    .child_by_field_name("element")
                    .or_else(|| node.named_child(0))
                    .map(|e| self.parse_type_node(e, source))
                    .unwrap_or(JavaTypeRef::Unknown);

                let dimensions = node
                    .child_by_field_name("dimensions")
                    .map(|d| dimension_count(d, source))
                    .unwrap_or(1);

                wrap_array(element, dimensions)
            }
            "wildcard" => {
                let mut bound = None;
                let mut is_upper_bound = true;

                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    match child.kind() {
                        "super" => is_upper_bound = false,
                        "extends" | "?" | "marker_annotation" | "annotation" => {}
                        _ if child.is_named() => {
                            bound = Some(Box::new(self.parse_type_node(child, source)));
                        }
                        _ => {}
                    }
                }

                JavaTypeRef::Wildcard {
                    bound,
                    is_upper_bound,
                }
            }
            // `@NonNull String`: annotations on a type use are not part of it.
            "annotated_type" => {
                let mut cursor = node.walk();
                let inner = node
                    .named_children(&mut cursor)
                    .filter(|c| !matches!(c.kind(), "marker_annotation" | "annotation"))
                    .last();
                inner
                    .map(|n| self.parse_type_node(n, source))
                    .unwrap_or(JavaTypeRef::Unknown)
            }
            "scoped_type_identifier" => {
                // Annotations may sit between the segments (`Outer.@A Inner`).
                let mut segments = Vec::new();
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "marker_annotation" | "annotation" => {}
                        "scoped_type_identifier" | "generic_type" => {
                            segments.push(compact(node_text(child, source)))
                        }
                        _ => segments.push(node_text(child, source).to_string()),
                    }
                }
                if segments.is_empty() {
                    JavaTypeRef::Unknown
                } else {
                    JavaTypeRef::Raw(segments.join("."))
                }
            }
            _ => {
                let text = compact(node_text(node, source));
                if text.is_empty() {
                    JavaTypeRef::Unknown
                } else {
                    JavaTypeRef::Raw(text)
                }
            }
        }
    }

    /// Parameters of a method, constructor or record declaration.
    ///
    /// C-style array dimensions on the name (`int a[]`) fold into the type.
    pub fn extract_method_parameters(&self, declaration_node: Node, source: &str) -> Vec<JavaParameter> {
        let Some(params_node) = declaration_node.child_by_field_name("parameters") else {
            return vec![];
        };

        let mut result = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            match child.kind() {
                "formal_parameter" => {
                    let Some(type_node) = child.child_by_field_name("type") else {
                        continue;
                    };
                    let mut type_ref = self.parse_type_node(type_node, source);
                    if let Some(dims) = child.child_by_field_name("dimensions") {
                        type_ref = wrap_array(type_ref, dimension_count(dims, source));
                    }
                    let name = child
                        .child_by_field_name("name")
                        .map(|n| node_text(n, source))
                        .unwrap_or("arg")
                        .to_string();

                    result.push(JavaParameter {
                        name,
                        type_ref,
                        is_varargs: false,
                    });
                }
                "spread_parameter" => {
                    let mut type_ref = JavaTypeRef::Unknown;
                    let mut name = "arg".to_string();

                    let mut inner_cursor = child.walk();
                    for gc in child.named_children(&mut inner_cursor) {
                        match gc.kind() {
                            "variable_declarator" => {
                                if let Some(n) = gc.child_by_field_name("name") {
                                    name = node_text(n, source).to_string();
                                }
                            }
                            "modifiers" | "marker_annotation" | "annotation" => {}
                            _ => type_ref = self.parse_type_node(gc, source),
                        }
                    }

                    result.push(JavaParameter {
                        name,
                        type_ref: JavaTypeRef::Varargs(Box::new(type_ref)),
                        is_varargs: true,
                    });
                }
                _ => {}
            }
        }
        result
    }

    /// Names declared by a `type_parameters` child of `node`.
    pub(crate) fn extract_type_parameters(&self, node: Node, source: &str) -> Vec<String> {
        let Some(params) = node
            .child_by_field_name("type_parameters")
            .or_else(|| find_child(node, "type_parameters"))
        else {
            return vec![];
        };

        let mut names = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() != "type_parameter" {
                continue;
            }
            if let Some(name) = find_child(param, "type_identifier").or_else(|| find_child(param, "identifier")) {
                names.push(node_text(name, source).to_string());
            }
        }
        names
    }
}

pub(crate) fn find_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

fn dimension_count(node: Node, source: &str) -> usize {
    node_text(node, source).matches('[').count().max(1)
}

fn wrap_array(element: JavaTypeRef, dimensions: usize) -> JavaTypeRef {
    match element {
        JavaTypeRef::Array {
            element,
            dimensions: inner,
        } => JavaTypeRef::Array {
            element,
            dimensions: inner + dimensions,
        },
        element => JavaTypeRef::Array {
            element: Box::new(element),
            dimensions,
        },
    }
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
