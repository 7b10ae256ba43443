pub mod list_autos;
pub mod renewal_alerts;
