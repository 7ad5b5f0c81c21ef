//! ESC/POS layouts

use super::{
    REPRINT_BANNER, RenderContext, RenderSettings, format_quantity, kitchen_subtitle, round_amount,
    server_line,
};
use comanda_printer::{EscPosBuilder, truncate_width};
use shared::{KitchenTicket, ReceiptTicket};

pub(super) fn receipt(settings: &RenderSettings, ticket: &ReceiptTicket, ctx: &RenderContext<'_>) -> Vec<u8> {
    let money = &settings.money;
    let store = ctx.store;
    let mut b = EscPosBuilder::new(settings.paper_width);

    if ticket.reprint {
        b.center();
        b.double_size();
        b.bold();
        b.line(REPRINT_BANNER);
        b.bold_off();
        b.reset_size();
        b.newline();
    }

    // Header
    b.center();
    b.bold();
    b.line(store.name());
    b.bold_off();
    if let Some(tax_id) = store.tax_id() {
        b.line(&format!("Tax ID: {}", tax_id));
    }
    if let Some(address) = store.address() {
        b.line(address);
    }
    if let Some(phone) = store.phone() {
        b.line(&format!("Tel: {}", phone));
    }
    b.sep_single();

    // Order metadata
    b.left();
    b.line_lr("Order:", &format!("#{}", ticket.order_id));
    if let Some(timestamp) = ctx.timestamp() {
        b.line_lr("Date:", &timestamp);
    }
    if let Some(server) = server_line(ticket, ctx) {
        b.line_lr("Server:", server);
    }
    b.sep_single();

    // Items
    for line in &ticket.lines {
        let label = format!(
            "{} x {}",
            format_quantity(line.quantity),
            truncate_width(&line.description, settings.item_name_width)
        );
        b.line_lr(&label, &money.format(line.quantity * line.unit_price));
    }
    b.sep_single();

    // Totals
    b.line_lr("Subtotal:", &money.format(ticket.subtotal));
    if round_amount(ticket.discount) > 0 {
        b.line_lr("Discount:", &format!("-{}", money.format(ticket.discount)));
    }
    if round_amount(ticket.tip) > 0 {
        b.line_lr("Tip:", &format!("+{}", money.format(ticket.tip)));
    }
    b.bold();
    b.double_size();
    b.line_lr_within("TOTAL:", &money.format(ticket.total), settings.paper_width / 2);
    b.reset_size();
    b.bold_off();

    // Payments
    let show_change = round_amount(ticket.change_due) > 0;
    if !ticket.payments.is_empty() || show_change {
        b.sep_single();
        for payment in &ticket.payments {
            b.line_lr(&format!("{}:", payment.method_name), &money.format(payment.amount));
        }
        if show_change {
            b.line_lr("Change:", &money.format(ticket.change_due));
        }
    }

    // Footer
    b.newline();
    b.center();
    b.line(store.footer());

    b.feed(3);
    b.cut();
    b.build()
}

pub(super) fn kitchen(settings: &RenderSettings, ticket: &KitchenTicket) -> Vec<u8> {
    let mut b = EscPosBuilder::new(settings.paper_width);

    b.center();
    b.bold();
    b.double_size();
    if !ticket.title.trim().is_empty() {
        b.line(&ticket.title);
    }
    if !ticket.table.trim().is_empty() {
        b.line(&ticket.table);
    }
    b.reset_size();
    b.bold_off();

    if let Some(subtitle) = kitchen_subtitle(ticket.preparer.as_deref(), ticket.timestamp.as_deref()) {
        b.line(&subtitle);
    }
    b.sep_single();
    b.left();

    for item in &ticket.items {
        b.bold();
        b.double_size();
        b.line(&format!("{} x {}", format_quantity(item.quantity), item.item_name));
        b.reset_size();
        b.bold_off();
        if let Some(note) = item.note() {
            b.line(&format!("   *** {} ***", note));
        }
        b.newline();
    }

    b.feed(3);
    b.cut();
    b.build()
}

#[cfg(test)]
mod tests {
    use super::super::tests::{kitchen as kitchen_ticket, printed_at, receipt as receipt_ticket, store, text_of};
    use super::*;

    #[test]
    fn test_receipt_starts_with_init_and_codepage() {
        let config = store();
        let ctx = RenderContext::new(&config, printed_at());
        let bytes = receipt(&RenderSettings::default(), &receipt_ticket(), &ctx);
        assert_eq!(&bytes[..5], &[0x1B, 0x40, 0x1B, 0x74, 0x10]);
        // GS V 0 closes the ticket
        assert_eq!(&bytes[bytes.len() - 3..], &[0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_receipt_block_order() {
        let config = store();
        let ctx = RenderContext::new(&config, printed_at());
        let text = text_of(&receipt(&RenderSettings::default(), &receipt_ticket(), &ctx));

        let positions: Vec<usize> = [
            "La Picada",
            "Av. Central 100",
            "Tel: 555-0100",
            "#1001",
            "17-10-2026 20:15",
            "Ana",
            "Bebida",
            "Subtotal:",
            "Tip:",
            "TOTAL:",
            "Cash:",
            "Change:",
            "Thank you for your visit!",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
    }

    #[test]
    fn test_item_names_truncated() {
        let config = store();
        let ctx = RenderContext::new(&config, printed_at());
        let text = text_of(&receipt(&RenderSettings::default(), &receipt_ticket(), &ctx));

        assert!(text.contains("2 x Lomo a lo pobre con  "));
        assert!(!text.contains("huevo"));
    }

    #[test]
    fn test_conditional_totals() {
        let config = store();
        let ctx = RenderContext::new(&config, printed_at());
        let mut ticket = receipt_ticket();
        ticket.tip = 0.4;
        ticket.change_due = 0.0;

        let text = text_of(&receipt(&RenderSettings::default(), &ticket, &ctx));
        assert!(!text.contains("Discount:"));
        assert!(!text.contains("Tip:"));
        assert!(!text.contains("Change:"));
        assert!(text.contains("Cash:"));
    }

    #[test]
    fn test_total_and_line_rounding() {
        let config = store();
        let ctx = RenderContext::new(&config, printed_at());
        let mut ticket = receipt_ticket();
        ticket.lines = vec![shared::ReceiptLine {
            description: "Cafe".into(),
            quantity: 3.0,
            unit_price: 0.5,
        }];
        ticket.total = 1234.5;

        let text = text_of(&receipt(&RenderSettings::default(), &ticket, &ctx));
        assert!(text.contains("$2\n"));
        assert!(text.contains("$1.235"));
        assert!(!text.contains(",5"));
    }

    #[test]
    fn test_reprint_banner_and_hidden_server() {
        let mut config = store();
        config.options.show_server = false;
        let ctx = RenderContext::new(&config, printed_at());
        let mut ticket = receipt_ticket();
        ticket.reprint = true;

        let text = text_of(&receipt(&RenderSettings::default(), &ticket, &ctx));
        assert!(text.starts_with(REPRINT_BANNER));
        assert!(!text.contains("Server:"));
    }

    #[test]
    fn test_kitchen_note_follows_its_item() {
        let text = text_of(&kitchen(&RenderSettings::default(), &kitchen_ticket()));
        let expected = "2 x Burger\n   *** no onion ***\n";
        assert!(text.contains(expected), "{}", text);
        assert!(text.contains("Ana - 20:15"));
        assert!(!text.contains("Fries\n   ***"));
    }

    #[test]
    fn test_kitchen_items_double_size_bold() {
        let bytes = kitchen(&RenderSettings::default(), &kitchen_ticket());
        let item = b"2 x Burger";
        let at = bytes
            .windows(item.len())
            .position(|w| w == item)
            .unwrap();
        // ESC E 1 then GS ! 0x11 right before the item text
        assert_eq!(&bytes[at - 6..at], &[0x1B, 0x45, 0x01, 0x1D, 0x21, 0x11]);
    }
}
