//! Share display formatting
//!
//! Formats shares for terminal output in table and detail views.

use tabled::{settings::Style, Table, Tabled};

use crate::models::{ExportMode, SecurityMode, ShareRecord};

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Export")]
    export: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Format a list of shares as a table, in document order
pub fn format_share_list(shares: &[ShareRecord]) -> String {
    if shares.is_empty() {
        return "No shares defined.".to_string();
    }

    let rows = shares.iter().enumerate().map(|(i, share)| ShareRow {
        index: i + 1,
        name: share.name.clone(),
        path: share.path.clone(),
        export: export_label(share),
        security: security_label(share),
        status: if share.enabled { "Enabled" } else { "Disabled" },
    });

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format a single share with all of its settings
pub fn format_share_details(share: &ShareRecord) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    let mut output = String::new();
    output.push_str(&format!("Share: {}\n", share.name));
    output.push_str(&format!("  Path:           {}\n", share.path));
    output.push_str(&format!("  Comment:        {}\n", optional(&share.comment)));
    output.push_str(&format!(
        "  Status:         {}\n",
        if share.enabled { "Enabled" } else { "Disabled" }
    ));
    output.push_str(&format!("  Export:         {}\n", export_label(share)));
    output.push_str(&format!("  Security:       {}\n", security_label(share)));
    output.push_str(&format!("  Create mask:    {}\n", optional(&share.create_mask)));
    output.push_str(&format!("  Directory mask: {}\n", optional(&share.directory_mask)));
    output.push_str(&format!("  Hosts allow:    {}\n", optional(&share.hosts_allow)));
    output.push_str(&format!("  Hosts deny:     {}\n", optional(&share.hosts_deny)));
    output.push_str(&format!("  Valid users:    {}\n", optional(&share.valid_users)));
    output.push_str(&format!("  Write list:     {}\n", optional(&share.write_list)));
    output.push_str(&format!(
        "  macOS support:  {}\n",
        if share.fruit { "Yes" } else { "No" }
    ));
    output
}

fn export_label(share: &ShareRecord) -> String {
    share
        .export_mode()
        .map(|m: ExportMode| m.to_string())
        .unwrap_or_else(|| format!("invalid ({})", share.export))
}

fn security_label(share: &ShareRecord) -> String {
    share
        .security_mode()
        .map(|m: SecurityMode| m.to_string())
        .unwrap_or_else(|| format!("invalid ({})", share.security))
}
