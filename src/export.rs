//! Exportación a CSV y documentos HTML para imprimir.

use chrono::DateTime;

use crate::db::models::{FoodItem, MenuCategory, Order};

/// Registro que se puede volcar como fila CSV
pub trait CsvRecord {
    const HEADERS: &'static [&'static str];

    fn csv_row(&self) -> Vec<String>;
}

/// Entrecomilla el campo si contiene separador, comillas o saltos de línea
pub fn escape_csv_field(field: &str) -> String {
    if field.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn to_csv<R: CsvRecord>(records: &[R]) -> String {
    let mut out = csv_line(R::HEADERS);
    out.push('\n');
    for record in records {
        out.push_str(&csv_line(&record.csv_row()));
        out.push('\n');
    }
    out
}

pub fn escape_html(text: &str) -> String {
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

fn html_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>body{{font-family:sans-serif}}table{{border-collapse:collapse;width:100%}}\
         td,th{{border-bottom:1px solid #ccc;padding:4px;text-align:left}}.num{{text-align:right}}</style>\n\
         </head>\n<body onload=\"window.print()\">\n<h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = escape_html(title),
        body = body
    )
}

/// Ticket de un pedido
pub fn order_receipt(order: &Order, table_label: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(table) = table_label {
        body.push_str(&format!("<p>Table: {}</p>\n", escape_html(table)));
    }
    if let Some(created) = DateTime::from_timestamp(order.created_at, 0) {
        body.push_str(&format!("<p>Date: {}</p>\n", created.format("%Y-%m-%d %H:%M")));
    }

    body.push_str("<table>\n<tr><th>Item</th><th class=\"num\">Qty</th><th class=\"num\">Price</th><th class=\"num\">Subtotal</th></tr>\n");
    for item in &order.items {
        body.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{:.2}</td><td class=\"num\">{}</td></tr>\n",
            escape_html(&item.name),
            item.quantity,
            item.unit_price,
            item.subtotal().map(|s| format!("{:.2}", s)).unwrap_or_default()
        ));
    }
    body.push_str(&format!(
        "<tr><th colspan=\"3\">Total</th><th class=\"num\">{:.2}</th></tr>\n</table>\n",
        order.total
    ));
    body.push_str(&format!("<p>Status: {}</p>\n", order.status));

    html_page(&format!("Order {}", short_id(&order.id)), &body)
}

/// Carta imprimible agrupada por categoría; los platos sin categoría van al final
pub fn menu_document(categories: &[MenuCategory], items: &[FoodItem]) -> String {
    let mut body = String::new();

    let mut section = |title: &str, dishes: Vec<&FoodItem>| {
        if dishes.is_empty() {
            return;
        }
        body.push_str(&format!("<h2>{}</h2>\n<table>\n", escape_html(title)));
        for dish in dishes {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td class=\"num\">{:.2}</td></tr>\n",
                escape_html(&dish.name),
                escape_html(dish.description.as_deref().unwrap_or("")),
                dish.price
            ));
        }
        body.push_str("</table>\n");
    };

    for category in categories {
        let dishes = items
            .iter()
            .filter(|i| i.available && i.category_id.as_deref() == Some(category.id.as_str()))
            .collect();
        section(&category.name, dishes);
    }

    let uncategorised = items
        .iter()
        .filter(|i| {
            i.available
                && !categories
                    .iter()
                    .any(|c| i.category_id.as_deref() == Some(c.id.as_str()))
        })
        .collect();
    section("Other", uncategorised);

    html_page("Menu", &body)
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderItem, OrderStatus};
    use rust_decimal::Decimal;

    struct Line(&'static str, &'static str);

    impl CsvRecord for Line {
        const HEADERS: &'static [&'static str] = &["name", "note"];

        fn csv_row(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let csv = to_csv(&[Line("Paella", "rice, seafood"), Line("Agua", "")]);
        assert_eq!(csv, "name,note\nPaella,\"rice, seafood\"\nAgua,\n");
    }

    fn dish(id: &str, name: &str, category: Option<&str>, available: bool) -> FoodItem {
        FoodItem {
            id: id.into(),
            name: name.into(),
            description: None,
            price: Decimal::new(950, 2),
            category_id: category.map(Into::into),
            available,
            created_at: 0,
        }
    }

    #[test]
    fn menu_groups_available_dishes() {
        let categories = vec![MenuCategory {
            id: "c1".into(),
            name: "Starters".into(),
            description: None,
            sort_order: 0,
            created_at: 0,
        }];
        let items = vec![
            dish("f1", "Croquetas", Some("c1"), true),
            dish("f2", "Sold out", Some("c1"), false),
            dish("f3", "Bread & <oil>", None, true),
        ];

        let html = menu_document(&categories, &items);
        assert!(html.contains("<h2>Starters</h2>"));
        assert!(html.contains("Croquetas"));
        assert!(!html.contains("Sold out"));
        assert!(html.contains("<h2>Other</h2>"));
        assert!(html.contains("Bread &amp; &lt;oil&gt;"));
    }

    #[test]
    fn receipt_lists_items_and_total() {
        let order = Order {
            id: "0123456789abcdef".into(),
            table_id: None,
            items: vec![OrderItem {
                food_item_id: "f1".into(),
                name: "Paella".into(),
                quantity: 2,
                unit_price: Decimal::new(1450, 2),
            }],
            status: OrderStatus::Paid,
            total: Decimal::new(2900, 2),
            created_at: 0,
        };

        let html = order_receipt(&order, Some("Table 4"));
        assert!(html.contains("<title>Order 01234567</title>"));
        assert!(html.contains("Table: Table 4"));
        assert!(html.contains("29.00"));
        assert!(html.contains("Status: paid"));
    }
}
