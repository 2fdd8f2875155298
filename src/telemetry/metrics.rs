use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("solar-report-portal"));

pub static ORDERS_PLACED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("orders.placed")
        .with_description("Total report orders accepted by EagleView")
        .build()
});

pub static ORDERS_DUPLICATE: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("orders.duplicate")
        .with_description("Orders rejected because the address already has a report")
        .build()
});

pub static INVOICES_GENERATED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("invoices.generated")
        .with_description("Total PDF invoices generated")
        .build()
});

pub static SOLAR_ESTIMATES_STORED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("solar_estimates.stored")
        .with_description("PVWatts estimates persisted for ordered addresses")
        .build()
});

pub static SOLAR_ESTIMATES_FAILED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("solar_estimates.failed")
        .with_description("PVWatts lookups or inserts that failed after an order")
        .build()
});

pub static REPORT_LOOKUPS: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("reports.lookups")
        .with_description("Report number lookups by outcome")
        .build()
});

pub static REPORT_ASSET_FAILURES: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("reports.asset_failures")
        .with_description("Report images or deliverables that could not be fetched")
        .build()
});

pub static REPORT_PAGE_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("reports.page.duration")
        .with_description("Time to gather all assets for the results page")
        .with_unit("ms")
        .build()
});

pub static UPSTREAM_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("upstream.request.duration")
        .with_description("EagleView and NREL request duration in milliseconds")
        .with_unit("ms")
        .build()
});

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.requests.total")
        .with_description("Total number of HTTP requests")
        .with_unit("{request}")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.request.duration")
        .with_description("HTTP request duration in milliseconds")
        .with_unit("ms")
        .with_boundaries(vec![
            1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0,
        ])
        .build()
});
