use serde::Serialize;
use shadowscope_api::{Location, MethodTarget};
use shadowscope_core::{LineMarker, MarkerDirection};
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub struct Output {
    pub json: bool,
}

impl Output {
    /// Prints `rows` as a table, or `value` as pretty JSON.
    pub fn emit<R: Tabled, V: Serialize + ?Sized>(&self, rows: Vec<R>, value: &V) -> crate::CliResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else if rows.is_empty() {
            println!("(none)");
        } else {
            println!("{}", Table::new(rows).with(Style::psql()));
        }
        Ok(())
    }
}

fn short_location(location: Option<&Location>) -> String {
    match location {
        Some(loc) => {
            let name = loc
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{}:{}", name, loc.range.start_line + 1)
        }
        None => "-".to_string(),
    }
}

#[derive(Tabled)]
pub struct IndexRow {
    pub framework: String,
    pub count: usize,
    pub shadows: String,
}

#[derive(Serialize)]
pub struct IndexEntry {
    pub framework: String,
    pub shadows: Vec<String>,
}

impl IndexEntry {
    pub fn row(&self) -> IndexRow {
        IndexRow {
            framework: self.framework.clone(),
            count: self.shadows.len(),
            shadows: self.shadows.join(", "),
        }
    }
}

#[derive(Tabled)]
pub struct TargetRow {
    pub from: String,
    pub to: String,
    pub location: String,
}

#[derive(Serialize)]
pub struct QueryResult {
    pub query: MethodTarget,
    pub targets: Vec<MethodTarget>,
}

impl QueryResult {
    pub fn rows(&self) -> Vec<TargetRow> {
        self.targets
            .iter()
            .map(|t| TargetRow {
                from: self.query.display_name(),
                to: t.display_name(),
                location: short_location(t.method.location.as_ref()),
            })
            .collect()
    }
}

#[derive(Tabled)]
pub struct MarkerRow {
    pub line: String,
    pub direction: &'static str,
    pub method: String,
    pub targets: String,
}

#[derive(Serialize)]
pub struct MarkerEntry {
    pub marker: LineMarker,
    pub targets: Vec<MethodTarget>,
}

impl MarkerEntry {
    pub fn row(&self) -> MarkerRow {
        MarkerRow {
            line: self
                .marker
                .range
                .map(|r| (r.start_line + 1).to_string())
                .unwrap_or_else(|| "-".to_string()),
            direction: match self.marker.direction {
                MarkerDirection::ToFramework => "-> framework",
                MarkerDirection::ToShadows => "<- shadows",
            },
            method: self.marker.target.method.to_string(),
            targets: self
                .targets
                .iter()
                .map(MethodTarget::display_name)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SdkRow {
    pub api: u32,
    pub version: String,
    pub coordinates: String,
    pub installed: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SourceRow {
    pub element: String,
    pub location: String,
}

impl SourceRow {
    pub fn new(element: String, location: Option<&Location>) -> Self {
        Self {
            element,
            location: location
                .map(Location::to_string)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}
