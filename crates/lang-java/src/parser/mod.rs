use crate::error::{JavaError, Result};
use crate::model::JavaFileModel;
use shadowscope_api::Range;
use std::path::Path;
use tree_sitter::{Node, Tree};

mod entities;
mod metadata;
mod types;

#[derive(Clone)]
pub struct JavaParser {
    pub language: tree_sitter::Language,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_java::LANGUAGE.into();
        // Fail early on an ABI mismatch rather than on the first file.
        tree_sitter::Parser::new()
            .set_language(&language)
            .map_err(|e| JavaError::Language(e.to_string()))?;
        Ok(Self { language })
    }

    pub fn parse_tree(&self, source: &str, path: Option<&Path>) -> Result<Tree> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| JavaError::Language(e.to_string()))?;
        parser
            .parse(source, None)
            .ok_or_else(|| JavaError::Parse(path.map(Path::to_path_buf).unwrap_or_default()))
    }

    /// Extracts package, imports and every type declaration, nested ones
    /// included, from one compilation unit.
    pub fn parse_file(&self, source: &str, path: Option<&Path>) -> Result<JavaFileModel> {
        let tree = self.parse_tree(source, path)?;
        Ok(self.analyze(&tree, source))
    }

    pub(crate) fn analyze(&self, tree: &Tree, source: &str) -> JavaFileModel {
        let root = tree.root_node();
        let (package, imports) = self.extract_package_and_imports(root, source);
        let mut classes = Vec::new();
        self.collect_type_declarations(root, source, package.as_deref(), &[], &mut classes);
        JavaFileModel {
            package,
            imports,
            classes,
        }
    }
}

pub(crate) fn range_from_ts(range: tree_sitter::Range) -> Range {
    Range {
        start_line: range.start_point.row,
        start_col: range.start_point.column,
        end_line: range.end_point.row,
        end_col: range.end_point.column,
    }
}

pub(crate) fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}
