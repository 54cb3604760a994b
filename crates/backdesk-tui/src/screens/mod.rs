//! Screen components, one per primary view.

mod compliance;
mod customers;
mod list_screen;
mod rewards;

pub use compliance::ComplianceScreen;
pub use customers::CustomersScreen;
pub use rewards::RewardsScreen;
