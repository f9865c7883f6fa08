//! Error kind registry listing.

use std::fmt::Write;

use herrs::ErrorKind;
use herrs::kind::tag_of;
use herrs::status::status_of;
use serde::Serialize;

/// One row of the registry, as printed by `herrs kinds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindInfo {
    pub code: u8,
    pub name: String,
    pub tag: &'static str,
    pub status: u16,
}

impl KindInfo {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            code: kind.code(),
            name: format!("{kind:?}"),
            tag: kind.tag(),
            status: kind.http_status().as_u16(),
        }
    }
}

/// Every registered kind in code order.
pub fn kind_infos() -> Vec<KindInfo> {
    ErrorKind::all().map(KindInfo::new).collect()
}

/// Fixed-width table of the registry.
pub fn render_table() -> String {
    let infos = kind_infos();
    let name_width = infos.iter().map(|info| info.name.len()).max().unwrap_or(0);
    let tag_width = infos.iter().map(|info| info.tag.len()).max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<name_width$}  {:<tag_width$}  STATUS",
        "CODE", "NAME", "TAG"
    );
    for info in &infos {
        let _ = writeln!(
            out,
            "{:>4}  {:<name_width$}  {:<tag_width$}  {}",
            info.code, info.name, info.tag, info.status
        );
    }
    out
}

/// The registry as a JSON array.
pub fn render_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&kind_infos())
}

/// Tag and status for a persisted numeric code. `0` and unknown codes fall
/// back to the unexpected tag and 500.
pub fn lookup(code: u8) -> String {
    let kind = ErrorKind::from_code(code);
    let status = status_of(kind);
    format!(
        "{code} {} {} {}",
        tag_of(kind),
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    )
}
