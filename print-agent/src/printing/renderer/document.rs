//! HTML layouts for the browser runtime

use super::{
    REPRINT_BANNER, RenderContext, RenderSettings, format_quantity, kitchen_subtitle, round_amount,
    server_line,
};
use comanda_printer::truncate_width;
use shared::{KitchenTicket, ReceiptTicket};
use std::fmt::Write;

const STYLES: &str = r#"<style>
@page { size: 80mm auto; margin: 0; }
body { font-family: 'Courier New', monospace; font-size: 12px; margin: 0; padding: 5px; width: 80mm; color: #000; }
.center { text-align: center; }
.bold { font-weight: bold; }
.big { font-size: 18px; }
.total { font-size: 20px; font-weight: bold; margin: 8px 0; }
.small { font-size: 10px; }
.sep { border-top: 1px dashed #000; margin: 6px 0; }
.row { display: flex; justify-content: space-between; }
.note { padding-left: 2em; font-style: italic; }
</style>"#;

pub(super) fn receipt(settings: &RenderSettings, ticket: &ReceiptTicket, ctx: &RenderContext<'_>) -> String {
    let money = &settings.money;
    let store = ctx.store;
    let mut body = String::new();

    if ticket.reprint {
        div(&mut body, "center bold big", REPRINT_BANNER);
    }

    // Header
    div(&mut body, "center bold big", store.name());
    if let Some(tax_id) = store.tax_id() {
        div(&mut body, "center small", &format!("Tax ID: {}", tax_id));
    }
    if let Some(address) = store.address() {
        div(&mut body, "center small", address);
    }
    if let Some(phone) = store.phone() {
        div(&mut body, "center small", &format!("Tel: {}", phone));
    }
    sep(&mut body);

    // Order metadata
    row(&mut body, "", "Order:", &format!("#{}", ticket.order_id));
    if let Some(timestamp) = ctx.timestamp() {
        row(&mut body, "", "Date:", &timestamp);
    }
    if let Some(server) = server_line(ticket, ctx) {
        row(&mut body, "", "Server:", server);
    }
    sep(&mut body);

    // Items
    for line in &ticket.lines {
        let label = format!(
            "{} x {}",
            format_quantity(line.quantity),
            truncate_width(&line.description, settings.item_name_width)
        );
        row(&mut body, "", &label, &money.format(line.quantity * line.unit_price));
    }
    sep(&mut body);

    // Totals
    row(&mut body, "", "Subtotal:", &money.format(ticket.subtotal));
    if round_amount(ticket.discount) > 0 {
        row(&mut body, "", "Discount:", &format!("-{}", money.format(ticket.discount)));
    }
    if round_amount(ticket.tip) > 0 {
        row(&mut body, "", "Tip:", &format!("+{}", money.format(ticket.tip)));
    }
    row(&mut body, "total", "TOTAL:", &money.format(ticket.total));

    // Payments
    let show_change = round_amount(ticket.change_due) > 0;
    if !ticket.payments.is_empty() || show_change {
        sep(&mut body);
        for payment in &ticket.payments {
            row(
                &mut body,
                "",
                &format!("{}:", payment.method_name),
                &money.format(payment.amount),
            );
        }
        if show_change {
            row(&mut body, "", "Change:", &money.format(ticket.change_due));
        }
    }

    // Footer
    sep(&mut body);
    div(&mut body, "center", store.footer());

    page(&format!("Order #{}", ticket.order_id), &body)
}

pub(super) fn kitchen(ticket: &KitchenTicket) -> String {
    let mut body = String::new();

    if !ticket.title.trim().is_empty() {
        div(&mut body, "center bold big", &ticket.title);
    }
    if !ticket.table.trim().is_empty() {
        div(&mut body, "center bold big", &ticket.table);
    }
    if let Some(subtitle) = kitchen_subtitle(ticket.preparer.as_deref(), ticket.timestamp.as_deref()) {
        div(&mut body, "center", &subtitle);
    }
    sep(&mut body);

    for item in &ticket.items {
        div(
            &mut body,
            "bold big",
            &format!("{} x {}", format_quantity(item.quantity), item.item_name),
        );
        if let Some(note) = item.note() {
            div(&mut body, "note", &format!("*** {} ***", note));
        }
    }

    page(&ticket.title, &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title>{}</head><body>\n{}</body></html>\n",
        escape_html(title),
        STYLES,
        body
    )
}

fn div(out: &mut String, class: &str, text: &str) {
    let _ = writeln!(out, "<div class=\"{}\">{}</div>", class, escape_html(text));
}

fn row(out: &mut String, class: &str, left: &str, right: &str) {
    let class = if class.is_empty() {
        "row".to_string()
    } else {
        format!("row {}", class)
    };
    let _ = writeln!(
        out,
        "<div class=\"{}\"><span>{}</span><span>{}</span></div>",
        class,
        escape_html(left),
        escape_html(right)
    );
}

fn sep(out: &mut String) {
    out.push_str("<div class=\"sep\"></div>\n");
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::super::tests::{kitchen as kitchen_ticket, printed_at, receipt as receipt_ticket, store};
    use super::*;

    #[test]
    fn test_page_has_print_styles() {
        let config = store();
        let ctx = RenderContext::new(&config, printed_at());
        let html = receipt(&RenderSettings::default(), &receipt_ticket(), &ctx);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("@page { size: 80mm auto; margin: 0; }"));
        assert!(html.contains("monospace"));
        assert!(html.contains("<div class=\"row total\"><span>TOTAL:</span><span>$21.428</span></div>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut config = store();
        config.name = Some("Fish & <Chips>".into());
        let ctx = RenderContext::new(&config, printed_at());
        let mut ticket = receipt_ticket();
        ticket.lines[1].description = "<script>x</script>".into();

        let html = receipt(&RenderSettings::default(), &ticket, &ctx);
        assert!(html.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_kitchen_document_note() {
        let html = kitchen(&kitchen_ticket());
        let item = html.find("2 x Burger").unwrap();
        let note = html.find("*** no onion ***").unwrap();
        assert!(item < note);
        assert_eq!(html.matches("class=\"note\"").count(), 1);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a&b "c" 'd'"#), "a&amp;b &quot;c&quot; &#39;d&#39;");
    }
}
