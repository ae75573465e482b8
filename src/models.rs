use serde::Serialize;

use crate::auth::Session;

/// One navigable section of the GreazeBook panel.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PanelPage {
    pub path: &'static str,
    pub section: &'static str,
    pub title: &'static str,
}

const fn page(path: &'static str, section: &'static str, title: &'static str) -> PanelPage {
    PanelPage {
        path,
        section,
        title,
    }
}

/// Every page the panel serves. Lookups are longest-prefix, so order does not matter.
pub const PANEL_PAGES: &[PanelPage] = &[
    page("/company/dashboard", "company", "Dashboard"),
    page("/company/people", "company", "People"),
    page("/company/invitations", "company", "Invitations"),
    page("/master-data/accounts", "master-data", "Accounts"),
    page("/master-data/products", "master-data", "Products"),
    page("/operations/bookings", "operations", "Bookings"),
    page("/operations/orders", "operations", "Orders"),
    page("/operations/invoices", "operations", "Invoices"),
    page("/operations/accounts-receivables", "operations", "Accounts Receivables"),
    page("/operations/payments", "operations", "Payments"),
    page("/operations/sales", "operations", "Sales"),
    page("/forms", "forms", "Forms"),
    page("/super-admin/companies", "super-admin", "Companies"),
];

/// Resolves the catalog entry for a request path. `/operations/bookings/123` resolves to
/// the bookings page; a match must end on a segment boundary.
pub fn find_page(path: &str) -> Option<&'static PanelPage> {
    PANEL_PAGES
        .iter()
        .filter(|page| match path.strip_prefix(page.path) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        })
        .max_by_key(|page| page.path.len())
}

/// Response body of a rendered panel page.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: &'static PanelPage,
    pub requested: String,
    pub role: Option<String>,
    pub subject: Option<String>,
}

impl PageView {
    pub fn new(page: &'static PanelPage, requested: &str, session: Option<&Session>) -> Self {
        Self {
            page,
            requested: requested.to_string(),
            role: session.map(|s| s.role.as_str().to_string()),
            subject: session.and_then(|s| s.subject.clone()),
        }
    }
}

/// Response body of the login page.
#[derive(Debug, Serialize)]
pub struct LoginView {
    pub page: &'static str,
    pub title: &'static str,
}
