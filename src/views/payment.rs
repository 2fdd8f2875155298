use html_escape::encode_double_quoted_attribute as attr;

use super::{Notice, layout};

/// Values echoed back into the form after a failed submission. Card details are never echoed.
#[derive(Debug, Clone, Default)]
pub struct PaymentPrefill {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub report_type: String,
}

pub fn payment_page(notice: Option<&Notice>, prefill: &PaymentPrefill) -> String {
    let checked = |kind: &str| {
        if prefill.report_type.eq_ignore_ascii_case(kind) {
            " checked"
        } else {
            ""
        }
    };

    let body = format!(
        r#"<section class="card">
<h1>Order a solar report</h1>
<form method="post" action="/payment" autocomplete="on">
<fieldset>
<legend>Billing</legend>
<label for="firstname">First name</label>
<input id="firstname" name="firstname" type="text" value="{first_name}" required>
<label for="lastname">Last name</label>
<input id="lastname" name="lastname" type="text" value="{last_name}" required>
<label for="email">Email</label>
<input id="email" name="email" type="email" value="{email}" onkeyup="validate()" required>
<label for="street">Street address</label>
<input id="street" name="address" type="text" value="{street}" required>
<label for="city">City</label>
<input id="city" name="city" type="text" value="{city}" required>
<label for="state">State</label>
<input id="state" name="state" type="text" value="{state}" required>
<label for="zip">Zip</label>
<input id="zip" name="zip" type="text" value="{zip}" required>
</fieldset>
<fieldset>
<legend>Report</legend>
<label><input type="radio" name="Report Type" value="basic"{basic}> Basic ($75)</label>
<label><input type="radio" name="Report Type" value="advanced"{advanced}> Advanced ($100)</label>
</fieldset>
<fieldset>
<legend>Payment</legend>
<label for="cardnum">Card number</label>
<input id="cardnum" name="cardnumber" type="text" inputmode="numeric" autocomplete="cc-number" required>
<label for="expmonth">Expiry month</label>
<input id="expmonth" name="expmonth" type="text" inputmode="numeric" placeholder="MM" required>
<label for="expyear">Expiry year</label>
<input id="expyear" name="expyear" type="text" inputmode="numeric" placeholder="YYYY" required>
</fieldset>
<button type="submit">Place order</button>
</form>
</section>"#,
        first_name = attr(&prefill.first_name),
        last_name = attr(&prefill.last_name),
        email = attr(&prefill.email),
        street = attr(&prefill.street),
        city = attr(&prefill.city),
        state = attr(&prefill.state),
        zip = attr(&prefill.zip),
        basic = checked("basic"),
        advanced = checked("advanced"),
    );

    layout("Order a solar report", notice, &body)
}
