//! Per-tenant section state of the admin console.
//!
//! The controller never performs I/O. Actions return a [`Command`] for the
//! embedding page to run; results are fed back through
//! [`TableController::inventory_loaded`] and
//! [`TableController::export_finished`].

use std::collections::HashMap;
use tracing::debug;

use crate::models::{
    inventory::{ExportResponse, InventoryEntry, ListInventoryResponse},
    tenant::TenantId,
};

use super::{
    markup,
    sort::{self, SortKey, SortState},
    strings::Strings,
};

pub const CSV_MIME: &str = "text/csv;charset=utf-8";

/// Requests the page must send to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchInventory { tenant_id: TenantId },
    FetchExport { tenant_id: TenantId },
}

/// Outcomes the page must present to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Offer `content` as a file download.
    Save {
        filename: String,
        content: String,
        mime: &'static str,
    },
    /// Show a blocking message.
    Alert(String),
}

/// Why a request did not produce a usable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No response arrived at all.
    Transport,
    /// The server answered with an error status.
    Status { status: u16, message: Option<String> },
    /// The response body could not be understood.
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Never expanded; nothing fetched yet.
    Idle,
    /// A listing request is in flight.
    Loading,
    Loaded,
    /// The listing failed; the error stays in place of the table.
    Failed,
}

/// One tenant's collapsible section.
#[derive(Debug, Clone)]
pub struct Section {
    tenant_id: TenantId,
    expanded: bool,
    phase: Phase,
    entries: Vec<InventoryEntry>,
    sort: Option<SortState>,
    exporting: bool,
    markup: String,
}

impl Section {
    fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            expanded: false,
            phase: Phase::Idle,
            entries: Vec::new(),
            sort: None,
            exporting: false,
            markup: String::new(),
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// True while a listing request is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Rows in display order.
    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Current content of the section body.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    fn render(&mut self, strings: &Strings) {
        if self.phase == Phase::Loaded {
            self.markup = if self.entries.is_empty() {
                markup::render_no_pdfs(strings)
            } else {
                markup::render_table(
                    self.tenant_id,
                    &self.entries,
                    self.sort,
                    self.exporting,
                    strings,
                )
            };
        }
    }
}

#[derive(Debug, Default)]
pub struct TableController {
    strings: Strings,
    sections: HashMap<TenantId, Section>,
}

impl TableController {
    pub fn new(strings: Strings) -> Self {
        Self {
            strings,
            sections: HashMap::new(),
        }
    }

    pub fn section(&self, tenant_id: TenantId) -> Option<&Section> {
        self.sections.get(&tenant_id)
    }

    /// Expand or collapse a section.
    ///
    /// The first expand starts the listing fetch. Expanding again while that
    /// fetch is in flight only shows the section.
    pub fn toggle(&mut self, tenant_id: TenantId) -> Option<Command> {
        let strings = &self.strings;
        let section = self
            .sections
            .entry(tenant_id)
            .or_insert_with(|| Section::new(tenant_id));

        if section.expanded {
            section.expanded = false;
            return None;
        }

        section.expanded = true;
        match section.phase {
            Phase::Idle => {
                section.phase = Phase::Loading;
                section.markup = markup::render_loading(strings);
                debug!(tenant = tenant_id, "fetching inventory");
                Some(Command::FetchInventory { tenant_id })
            }
            Phase::Loading | Phase::Loaded | Phase::Failed => None,
        }
    }

    /// Settle a listing request. Always clears the loading state.
    pub fn inventory_loaded(
        &mut self,
        tenant_id: TenantId,
        result: Result<ListInventoryResponse, FetchError>,
    ) {
        let strings = &self.strings;
        let Some(section) = self.sections.get_mut(&tenant_id) else {
            debug!(tenant = tenant_id, "inventory for unknown section ignored");
            return;
        };

        match result {
            Ok(payload) => {
                section.phase = Phase::Loaded;
                section.entries = payload.pdfs;
                section.sort = None;
                section.render(strings);
            }
            Err(err) => {
                section.phase = Phase::Failed;
                section.entries.clear();
                let message = match &err {
                    FetchError::Transport => strings.network_error.as_str(),
                    FetchError::Status { status: 403, .. } => strings.permission_denied.as_str(),
                    FetchError::Status {
                        message: Some(message),
                        ..
                    } => message.as_str(),
                    FetchError::Status { message: None, .. } => strings.error_loading.as_str(),
                    FetchError::Malformed => strings.invalid_response.as_str(),
                };
                section.markup = markup::render_error(message);
            }
        }
    }

    /// Re-sort the displayed rows of a loaded section by `key`.
    ///
    /// Returns false when the section has no table to sort.
    pub fn sort(&mut self, tenant_id: TenantId, key: SortKey) -> bool {
        let strings = &self.strings;
        let Some(section) = self.sections.get_mut(&tenant_id) else {
            return false;
        };
        if section.phase != Phase::Loaded || section.entries.is_empty() {
            return false;
        }

        let state = SortState::after_click(section.sort, key);
        sort::sort_entries(&mut section.entries, state);
        section.sort = Some(state);
        section.render(strings);
        true
    }

    /// Start an export; the export control stays disabled until it settles.
    pub fn request_export(&mut self, tenant_id: TenantId) -> Option<Command> {
        let strings = &self.strings;
        let section = self.sections.get_mut(&tenant_id)?;
        if section.phase != Phase::Loaded || section.entries.is_empty() || section.exporting {
            return None;
        }
        section.exporting = true;
        section.render(strings);
        Some(Command::FetchExport { tenant_id })
    }

    /// Settle an export request and re-enable the export control.
    pub fn export_finished(
        &mut self,
        tenant_id: TenantId,
        result: Result<ExportResponse, FetchError>,
    ) -> Effect {
        let strings = &self.strings;
        if let Some(section) = self.sections.get_mut(&tenant_id) {
            section.exporting = false;
            section.render(strings);
        }

        match result {
            Ok(export) if !export.content.is_empty() => Effect::Save {
                filename: export.filename,
                content: export.content,
                mime: CSV_MIME,
            },
            Ok(_) | Err(FetchError::Malformed) => Effect::Alert(strings.invalid_response.clone()),
            Err(FetchError::Status { status: 403, .. }) => {
                Effect::Alert(strings.permission_denied.clone())
            }
            Err(_) => Effect::Alert(strings.error_generating.clone()),
        }
    }
}
