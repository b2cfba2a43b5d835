//! Output formatting utilities for the CLI
//!
//! Provides table and JSON formatting with colors.

use colored::*;
use silverline_core::api::IpObject;
use silverline_core::types::PagingData;
use tabled::{builder::Builder, settings::Style};

/// Column headers of the IP-object table, in display order.
pub const TABLE_HEADERS: [&str; 6] = [
    "ID",
    "IP",
    "Expires At",
    "List Target",
    "Created At",
    "Updated At",
];

/// Guidance shown when a paged fetch comes back empty.
pub const NO_RESULTS_WITH_PAGING: &str = "No results were found. Please try to run the command \
     without page_number and page_size to get all existing IP objects.";

fn object_row(object: &IpObject) -> [Option<String>; 6] {
    [
        Some(object.id.clone()),
        Some(object.attributes.ip.clone()),
        object.attributes.expires_at.clone(),
        object.attributes.list_target.clone(),
        object.meta.created_at.clone(),
        object.meta.updated_at.clone(),
    ]
}

/// Render IP objects as a table, omitting columns that are null everywhere.
pub fn format_ip_objects_table(objects: &[IpObject]) -> String {
    if objects.is_empty() {
        return format!("{}\nNo entries.", "F5 Silverline IP Objects".bold());
    }

    let rows: Vec<[Option<String>; 6]> = objects.iter().map(object_row).collect();

    // A column survives if any row has a value for it
    let kept: Vec<usize> = (0..TABLE_HEADERS.len())
        .filter(|&col| rows.iter().any(|row| row[col].is_some()))
        .collect();

    let mut builder = Builder::default();
    builder.push_record(kept.iter().map(|&col| TABLE_HEADERS[col].to_string()));
    for row in &rows {
        builder.push_record(kept.iter().map(|&col| {
            let value = row[col].clone().unwrap_or_default();
            match TABLE_HEADERS[col] {
                "ID" => value.cyan().to_string(),
                "IP" => value.green().to_string(),
                _ => value,
            }
        }));
    }

    let table = builder.build().with(Style::rounded()).to_string();
    format!("{}\n{}", "F5 Silverline IP Objects".bold(), table)
}

/// Render the paging summary block appended to paged list output.
pub fn format_paging(paging: &PagingData) -> String {
    format!(
        "Current page number: {}\nLast page number: {}\nCurrent page size: {}",
        paging.current_page_number, paging.last_page_number, paging.current_page_size
    )
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}
