//! Navegación por tipo de interfaz (admin, camarero, cocina, cliente).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Admin,
    Waiter,
    Kitchen,
    Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub key: &'static str,
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(key: &'static str, label: &'static str, path: &'static str) -> NavItem {
    NavItem { key, label, path }
}

const ADMIN: &[NavItem] = &[
    item("dashboard", "Dashboard", "/"),
    item("menu", "Menu", "/menu"),
    item("inventory", "Inventory", "/inventory"),
    item("staff", "Staff", "/staff"),
    item("tables", "Tables", "/tables"),
    item("rooms", "Rooms", "/rooms"),
    item("orders", "Orders", "/orders"),
    item("finance", "Finance", "/finance"),
];

const WAITER: &[NavItem] = &[
    item("tables", "Tables", "/tables"),
    item("orders", "Orders", "/orders"),
    item("menu", "Menu", "/menu"),
];

const KITCHEN: &[NavItem] = &[
    item("orders", "Orders", "/kitchen/orders"),
    item("inventory", "Inventory", "/inventory"),
];

const CUSTOMER: &[NavItem] = &[
    item("menu", "Menu", "/menu"),
    item("order", "My order", "/order"),
];

impl InterfaceKind {
    pub fn navigation(self) -> &'static [NavItem] {
        match self {
            InterfaceKind::Admin => ADMIN,
            InterfaceKind::Waiter => WAITER,
            InterfaceKind::Kitchen => KITCHEN,
            InterfaceKind::Customer => CUSTOMER,
        }
    }
}

impl FromStr for InterfaceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(InterfaceKind::Admin),
            "waiter" => Ok(InterfaceKind::Waiter),
            "kitchen" => Ok(InterfaceKind::Kitchen),
            "customer" => Ok(InterfaceKind::Customer),
            other => Err(AppError::NotFound(format!("Unknown interface '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_interface_has_its_own_menu() {
        assert_eq!(InterfaceKind::Admin.navigation().len(), 8);
        assert!(InterfaceKind::Kitchen
            .navigation()
            .iter()
            .all(|i| i.key != "finance"));
        assert_eq!("Waiter".parse::<InterfaceKind>().unwrap(), InterfaceKind::Waiter);
        assert!("robot".parse::<InterfaceKind>().is_err());
    }
}
