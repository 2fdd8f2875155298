mod order;
mod payment;
mod solar;

pub use order::{Customer, OrderRecord, OrderRequest, ReportKind, ReportSummary};
pub use payment::{CardBrand, PaymentCard};
pub use solar::SolarEstimate;
