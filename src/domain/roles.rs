//! Closed role model for the portal.
//!
//! Access checks go through `Role::can` so no view compares raw role codes;
//! the shell builds its navigation from the same capability table.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Staff,
    Customer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    ManageOrders,
    ManageProducts,
    ManagePricing,
    ManageSettings,
    BrowseCatalog,
    Checkout,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Owner => "Store Owner",
            Role::Staff => "Store Staff",
            Role::Customer => "Customer",
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        match self {
            Role::Owner => !matches!(capability, Capability::BrowseCatalog | Capability::Checkout),
            Role::Staff => matches!(
                capability,
                Capability::ManageOrders | Capability::ManageProducts | Capability::ManagePricing
            ),
            Role::Customer => matches!(capability, Capability::BrowseCatalog | Capability::Checkout),
        }
    }

    /// Dashboard roles land on the orders page, customers on the catalog.
    pub fn is_store_side(&self) -> bool {
        matches!(self, Role::Owner | Role::Staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owners_manage_everything_store_side() {
        assert!(Role::Owner.can(Capability::ManageOrders));
        assert!(Role::Owner.can(Capability::ManageSettings));
        assert!(!Role::Owner.can(Capability::Checkout));
    }

    #[test]
    fn staff_cannot_touch_settings() {
        assert!(Role::Staff.can(Capability::ManagePricing));
        assert!(!Role::Staff.can(Capability::ManageSettings));
    }

    #[test]
    fn customers_only_shop() {
        assert!(Role::Customer.can(Capability::BrowseCatalog));
        assert!(Role::Customer.can(Capability::Checkout));
        assert!(!Role::Customer.can(Capability::ManageOrders));
    }
}
