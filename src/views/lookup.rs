use super::{Notice, layout};

/// Report lookup form. The report number field keeps its historical name `address`.
pub fn lookup_page(notice: Option<&Notice>) -> String {
    let body = r#"<section class="card">
<h1>Find your report</h1>
<form method="post" action="/formpage">
<label for="address">Report number</label>
<input id="address" name="address" type="text" inputmode="numeric" pattern="[0-9]+" required>
<button type="submit">Look up</button>
</form>
<p>Need a new report? <a href="/payment">Order one here.</a></p>
</section>"#;
    layout("Find your report", notice, body)
}
