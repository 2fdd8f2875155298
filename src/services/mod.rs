mod order;
mod report;

pub use order::{OrderService, PlacedOrder};
pub use report::{LookupOutcome, ReportAssets, ReportImage, ReportResults, ReportService};
