//! User-facing text of the admin console.

/// Every message the console can show. Replace the defaults to localize.
#[derive(Debug, Clone)]
pub struct Strings {
    pub page_title: String,
    pub page_intro: String,
    pub loading_pdfs: String,
    pub no_pdfs: String,
    pub download_csv: String,
    pub downloading: String,
    pub view_pdf: String,
    pub error_loading: String,
    pub error_generating: String,
    pub network_error: String,
    pub invalid_response: String,
    pub permission_denied: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            page_title: "PDF Inventory".into(),
            page_intro: "Scan your network for PDFs. Click to expand a site and view its PDF inventory."
                .into(),
            loading_pdfs: "Loading PDFs...".into(),
            no_pdfs: "No PDFs found in this site.".into(),
            download_csv: "Download CSV for this site".into(),
            downloading: "Generating...".into(),
            view_pdf: "View PDF".into(),
            error_loading: "Error loading PDFs".into(),
            error_generating: "Error generating CSV".into(),
            network_error: "Network error. Please check your connection and try again.".into(),
            invalid_response: "Invalid response from server. Please try again.".into(),
            permission_denied: "You do not have permission to perform this action.".into(),
        }
    }
}
