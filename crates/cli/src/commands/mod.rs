mod watch;

pub use watch::watch;

use crate::CliResult;
use crate::context::ProjectContext;
use crate::view::{IndexEntry, MarkerEntry, Output, QueryResult, SdkRow, SourceRow};
use shadowscope_api::{ApiError, ClassModel, MethodInfo, MethodSelector};
use shadowscope_core::{SourceElement, query::sort_for_presentation};
use shadowscope_sdk::navigation_target;
use std::path::Path;

pub fn index(root: &Path, api_level: Option<u32>, output: &Output) -> CliResult<()> {
    let ctx = ProjectContext::open(root, api_level)?;
    let index = ctx.resolver.index();
    let entries: Vec<IndexEntry> = index
        .entries()
        .map(|(framework, shadows)| IndexEntry {
            framework: framework.to_string(),
            shadows: shadows.iter().map(|h| h.fqn.clone()).collect(),
        })
        .collect();
    output.emit(entries.iter().map(IndexEntry::row).collect(), &entries)
}

pub fn framework(
    root: &Path,
    api_level: Option<u32>,
    selector: &str,
    output: &Output,
) -> CliResult<()> {
    let ctx = ProjectContext::open(root, api_level)?;
    let results: Vec<QueryResult> = ctx
        .select(selector)?
        .into_iter()
        .map(|query| {
            let targets = ctx.resolver.framework(&query);
            QueryResult { query, targets }
        })
        .collect();
    emit_results(&results, output)
}

pub fn shadows(
    root: &Path,
    api_level: Option<u32>,
    selector: &str,
    output: &Output,
) -> CliResult<()> {
    let ctx = ProjectContext::open(root, api_level)?;
    let results: Vec<QueryResult> = ctx
        .select(selector)?
        .into_iter()
        .map(|query| {
            let mut targets = ctx.resolver.shadows(&query);
            sort_for_presentation(&mut targets);
            QueryResult { query, targets }
        })
        .collect();
    emit_results(&results, output)
}

fn emit_results(results: &[QueryResult], output: &Output) -> CliResult<()> {
    let rows = results.iter().flat_map(QueryResult::rows).collect();
    output.emit(rows, results)
}

pub fn markers(root: &Path, api_level: Option<u32>, file: &Path, output: &Output) -> CliResult<()> {
    let ctx = ProjectContext::open(root, api_level)?;
    let path = ctx.source_file(file)?;
    let handles = ctx.project.classes_in_file(&path);
    if handles.is_empty() {
        return Err(format!("no classes declared in {}", path.display()).into());
    }

    let mut entries = Vec::new();
    for handle in handles {
        let Some(class) = ctx.project.class(&handle) else {
            continue;
        };
        for marker in ctx.resolver.markers(&class) {
            let (_, targets) = ctx
                .resolver
                .navigate(SourceElement::Method(marker.target.clone()));
            entries.push(MarkerEntry { marker, targets });
        }
    }
    entries.sort_by_key(|e| e.marker.range.map(|r| (r.start_line, r.start_col)));
    output.emit(entries.iter().map(MarkerEntry::row).collect(), &entries)
}

pub fn sdks(root: &Path, api_level: Option<u32>, output: &Output) -> CliResult<()> {
    let ctx = ProjectContext::open(root, api_level)?;
    let active = ctx.sdk.active();
    let rows: Vec<SdkRow> = ctx
        .catalog
        .sdks()
        .iter()
        .map(|sdk| SdkRow {
            api: sdk.api_level,
            version: sdk.version(),
            coordinates: sdk.coordinates(),
            installed: ctx.catalog.exists(sdk),
            active: active.as_ref() == Some(sdk),
        })
        .collect();
    output.emit(rows.clone(), &rows)
}

/// Locates a class, or its methods, preferring the active SDK's sources.
pub fn source(
    root: &Path,
    api_level: Option<u32>,
    class: &str,
    method: Option<&str>,
    output: &Output,
) -> CliResult<()> {
    let ctx = ProjectContext::open(root, api_level)?;
    let info = ctx
        .model
        .find_class(class)
        .ok_or_else(|| ApiError::NotFound(format!("class {}", class)))?;

    let rows = match method {
        None => vec![SourceRow::new(info.fqn().to_string(), info.location.as_ref())],
        Some(tail) => {
            let selector: MethodSelector = format!("{}#{}", class, tail).parse()?;
            let targets = match &selector.signature {
                Some(signature) => {
                    let wanted = if selector.selects_constructor() {
                        MethodInfo::constructor(info.name(), signature.clone())
                    } else {
                        MethodInfo::new(&selector.name, signature.clone())
                    };
                    navigation_target(ctx.model.as_ref(), info.fqn(), &wanted)
                        .into_iter()
                        .collect()
                }
                None => ctx.select(&selector.to_string())?,
            };
            if targets.is_empty() {
                return Err(ApiError::NotFound(format!("method {}", selector)).into());
            }
            targets
                .iter()
                .map(|t| SourceRow::new(t.display_name(), t.method.location.as_ref()))
                .collect()
        }
    };
    output.emit(rows.clone(), &rows)
}
