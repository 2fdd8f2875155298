use std::fmt::Write as _;

use html_escape::encode_text;

use super::layout;
use crate::services::ReportResults;

fn figure(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.2} {unit}"),
        None => "Not available".to_string(),
    }
}

fn orientation(azimuth: Option<f64>, tilt: Option<f64>) -> String {
    match (azimuth, tilt) {
        (Some(azimuth), Some(tilt)) => format!("{azimuth:.0}° azimuth, {tilt:.0}° tilt"),
        _ => "Not available".to_string(),
    }
}

fn download(ready: bool) -> &'static str {
    if ready {
        r#"<form method="post" action="/reportDisplay">
<button type="submit">Download full report (PDF)</button>
</form>"#
    } else {
        r#"<p class="pending">The full report PDF is still being prepared.</p>"#
    }
}

pub fn report_page(results: &ReportResults) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<section class="card report-summary">
<h1>Advanced solar report</h1>
<dl>
<dt>Address</dt><dd>{address}</dd>
<dt>Report number</dt><dd>{report_id}</dd>
<dt>Annual solar radiation</dt><dd>{annual}</dd>
<dt>Estimated annual AC output</dt><dd>{ac}</dd>
<dt>Modelled array</dt><dd>{array}</dd>
</dl>
{download}
</section>
<section class="card report-images">
<h2>Aerial views</h2>
<div class="image-grid">
"#,
        address = encode_text(&results.address),
        report_id = results.report_id,
        annual = encode_text(&figure(results.annual_solar, "kWh/m²")),
        ac = encode_text(&figure(results.ac_annual, "kWh")),
        array = encode_text(&orientation(results.azimuth, results.tilt)),
        download = download(results.document_ready),
    );

    for image in &results.images {
        let label = image.view.label();
        match &image.png_base64 {
            Some(data) => {
                let _ = write!(
                    body,
                    r#"<figure><img src="data:image/png;base64,{data}" alt="{label} view"><figcaption>{label}</figcaption></figure>
"#
                );
            }
            None => {
                let _ = write!(
                    body,
                    r#"<figure class="unavailable"><div class="placeholder">Image unavailable</div><figcaption>{label}</figcaption></figure>
"#
                );
            }
        }
    }
    body.push_str("</div>\n</section>\n");

    body.push_str(r#"<section class="card report-roofs">
<h2>Roof facets</h2>
"#);
    if results.roofs.is_empty() {
        body.push_str("<p>Roof measurements are not available for this report yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Facet</th><th>Size (sq ft)</th><th>Pitch</th><th>Pitch (deg)</th>\
             <th>Orientation</th><th>TSRF</th><th>Solar access</th><th>Sun hours</th></tr></thead>\n<tbody>\n",
        );
        for roof in &results.roofs {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                encode_text(&roof.designator),
                encode_text(&roof.size),
                encode_text(&roof.pitch),
                encode_text(&roof.pitch_deg),
                encode_text(&roof.orientation),
                encode_text(&roof.tsrf),
                encode_text(&roof.solar_access),
                encode_text(&roof.sun_hours),
            );
        }
        body.push_str("</tbody>\n</table>\n");
    }
    body.push_str("</section>");

    layout("Advanced solar report", None, &body)
}
