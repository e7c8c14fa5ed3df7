//! HTML fragments of the admin console.
//!
//! Every text value is escaped before it is placed into markup, including
//! values read from the host's own store. The embedding page supplies the
//! script that wires clicks and fetches to [`super::TableController`].

use crate::models::{inventory::InventoryEntry, tenant::Tenant};

use super::{
    sort::{SortDirection, SortKey, SortState},
    strings::Strings,
};

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub fn render_loading(strings: &Strings) -> String {
    format!(
        r#"<div class="inventory-loading"><p>{}</p></div>"#,
        escape_html(&strings.loading_pdfs)
    )
}

pub fn render_error(message: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, escape_html(message))
}

pub fn render_no_pdfs(strings: &Strings) -> String {
    format!(r#"<p class="no-pdfs">{}</p>"#, escape_html(&strings.no_pdfs))
}

/// Export control plus the sortable table.
///
/// Without a sort state the table is in server order, newest upload first,
/// which the Upload Date header shows as descending.
pub fn render_table(
    tenant_id: i64,
    entries: &[InventoryEntry],
    sort: Option<SortState>,
    exporting: bool,
    strings: &Strings,
) -> String {
    let mut html = String::new();

    html.push_str(r#"<div class="inventory-controls">"#);
    html.push_str(&format!(
        r#"<button type="button" class="inventory-download-csv" data-tenant-id="{}"{}>{}</button>"#,
        tenant_id,
        if exporting { " disabled" } else { "" },
        escape_html(if exporting {
            &strings.downloading
        } else {
            &strings.download_csv
        })
    ));
    html.push_str("</div>");

    let active = sort.unwrap_or(SortState {
        key: SortKey::UploadDate,
        direction: SortDirection::Desc,
    });
    let indicator = |key: SortKey| {
        if key == active.key {
            active.direction.indicator()
        } else {
            ""
        }
    };

    html.push_str(r#"<table class="inventory-table"><thead><tr>"#);
    html.push_str(&format!(
        r#"<th data-sort="{}">Filename <span class="sort-indicator">{}</span></th>"#,
        SortKey::Filename.attr(),
        indicator(SortKey::Filename)
    ));
    html.push_str("<th>Direct Link</th>");
    html.push_str(&format!(
        r#"<th data-sort="{}">Upload Date <span class="sort-indicator">{}</span></th>"#,
        SortKey::UploadDate.attr(),
        indicator(SortKey::UploadDate)
    ));
    html.push_str(&format!(
        r#"<th data-sort="{}" class="file-size">File Size <span class="sort-indicator">{}</span></th>"#,
        SortKey::FileSizeRaw.attr(),
        indicator(SortKey::FileSizeRaw)
    ));
    html.push_str("</tr></thead><tbody>");
    html.push_str(&render_rows(entries, strings));
    html.push_str("</tbody></table>");

    html
}

/// Table body rows.
pub fn render_rows(entries: &[InventoryEntry], strings: &Strings) -> String {
    let mut html = String::new();
    for entry in entries {
        html.push_str("<tr>");
        html.push_str(&format!(
            r#"<td class="filename">{}</td>"#,
            escape_html(&entry.filename)
        ));
        html.push_str(&format!(
            r#"<td class="url"><a href="{}" target="_blank" rel="noopener">{}</a></td>"#,
            escape_html(&entry.url),
            escape_html(&strings.view_pdf)
        ));
        html.push_str(&format!(
            r#"<td class="upload-date">{}</td>"#,
            escape_html(&entry.upload_date)
        ));
        html.push_str(&format!(
            r#"<td class="file-size" data-size-raw="{}">{}</td>"#,
            entry.file_size_raw,
            escape_html(&entry.file_size)
        ));
        html.push_str("</tr>");
    }
    html
}

/// The admin page: one collapsed section per tenant.
pub fn render_admin_page(tenants: &[Tenant], strings: &Strings) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{}</title></head><body>", escape_html(&strings.page_title)));
    html.push_str(r#"<div class="wrap">"#);
    html.push_str(&format!("<h1>{}</h1>", escape_html(&strings.page_title)));
    html.push_str(&format!("<p>{}</p>", escape_html(&strings.page_intro)));
    html.push_str(r#"<div id="inventory-accordion" class="inventory-accordion">"#);

    for tenant in tenants {
        html.push_str(&format!(
            r#"<div class="inventory-site" data-tenant-id="{}">"#,
            tenant.id
        ));
        html.push_str(r#"<button class="inventory-site-toggle" type="button" aria-expanded="false">"#);
        html.push_str(r#"<span class="toggle-icon"></span>"#);
        html.push_str(&format!(
            r#"<span class="site-name">{}</span>"#,
            escape_html(&tenant.name)
        ));
        html.push_str(&format!(
            r#"<span class="site-url">{}</span>"#,
            escape_html(&tenant.site_url())
        ));
        html.push_str("</button>");
        html.push_str(r#"<div class="inventory-site-content" style="display: none;">"#);
        html.push_str(&render_loading(strings));
        html.push_str("</div></div>");
    }

    html.push_str("</div></div></body></html>\n");
    html
}
