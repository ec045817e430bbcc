//! Navigation filter: prunes the static menu to entries the session may see.
//!
//! The menu is defined at build time and never mutated. Filtering keeps the
//! original order, drops sections with no surviving items, and is fully
//! deterministic for a given permission set.

use crate::auth::session::Session;

/// A single navigable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub title: &'static str,
    pub path: &'static str,
    pub permission: &'static str,
}

/// A titled group of entries.
#[derive(Debug, Clone, Copy)]
pub struct NavSection {
    pub title: &'static str,
    pub items: &'static [NavItem],
}

/// The full static menu tree.
pub const MENU: &[NavSection] = &[
    NavSection {
        title: "General",
        items: &[NavItem {
            title: "Dashboard",
            path: "/dashboard",
            permission: "dashboard.read",
        }],
    },
    NavSection {
        title: "Human Resources",
        items: &[
            NavItem {
                title: "Employees",
                path: "/hr/employees",
                permission: "hr.employees.read",
            },
            NavItem {
                title: "Leave Board",
                path: "/hr/leave",
                permission: "hr.leave.read",
            },
        ],
    },
    NavSection {
        title: "Customer Relations",
        items: &[
            NavItem {
                title: "Customers",
                path: "/crm/customers",
                permission: "crm.customers.read",
            },
            NavItem {
                title: "Sales Leads",
                path: "/crm/leads",
                permission: "crm.leads.read",
            },
            NavItem {
                title: "Opportunities",
                path: "/crm/opportunities",
                permission: "crm.opportunities.read",
            },
        ],
    },
    NavSection {
        title: "Inventory",
        items: &[NavItem {
            title: "Products",
            path: "/inventory",
            permission: "inv.products.read",
        }],
    },
    NavSection {
        title: "System",
        items: &[
            NavItem {
                title: "User Access",
                path: "/users",
                permission: "users.read",
            },
            NavItem {
                title: "Audit Logs",
                path: "/audit-log",
                permission: "audit.read",
            },
        ],
    },
];

/// A section after filtering, holding only the visible items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSection {
    pub title: &'static str,
    pub items: Vec<NavItem>,
}

/// Prune the static menu to the entries this session is permitted to see.
pub fn visible_menu(session: &Session) -> Vec<VisibleSection> {
    MENU.iter()
        .filter_map(|section| {
            let items: Vec<NavItem> = section
                .items
                .iter()
                .filter(|item| session.has_permission(item.permission))
                .copied()
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(VisibleSection {
                    title: section.title,
                    items,
                })
            }
        })
        .collect()
}
