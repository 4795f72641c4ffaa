//! Búsqueda, ordenación y paginación de listados.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

use crate::api::{AppError, AppResult, ResultExt};
use crate::db::Direction;

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<Direction>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Entrada de la barra de páginas; `Gap` se serializa como `null`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageLink {
    Page(usize),
    Gap,
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub pages: Vec<PageLink>,
}

/// Barra de páginas: siempre la primera, la última y la actual con sus
/// vecinas; los saltos se marcan con `Gap`.
pub fn page_numbers(current: usize, total_pages: usize) -> Vec<PageLink> {
    if total_pages <= 7 {
        return (1..=total_pages.max(1)).map(PageLink::Page).collect();
    }

    let current = current.clamp(1, total_pages);
    let (start, end) = if current <= 3 {
        (2, 4)
    } else if current >= total_pages - 2 {
        (total_pages - 3, total_pages - 1)
    } else {
        (current - 1, current + 1)
    };

    let mut pages = vec![PageLink::Page(1)];
    if start > 2 {
        pages.push(PageLink::Gap);
    }
    pages.extend((start..=end).map(PageLink::Page));
    if end < total_pages - 1 {
        pages.push(PageLink::Gap);
    }
    pages.push(PageLink::Page(total_pages));
    pages
}

fn matches_search(row: &Value, needle: &str) -> bool {
    let Value::Object(fields) = row else {
        return false;
    };
    fields.values().any(|value| match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        _ => false,
    })
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Aplica búsqueda, orden y paginación sobre filas ya obtenidas
pub fn apply<T: Serialize>(rows: Vec<T>, params: &ListParams) -> AppResult<Page<T>> {
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);
    if per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(AppError::validation_field(
            "per_page",
            &format!("must be between 1 and {}", MAX_PER_PAGE),
        ));
    }
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(AppError::validation_field("page", "pages start at 1"));
    }

    let mut rows: Vec<(Value, T)> = rows
        .into_iter()
        .map(|row| serde_json::to_value(&row).map(|value| (value, row)))
        .collect::<Result<_, _>>()
        .map_err_internal("Error serializing rows")?;

    if let Some(needle) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = needle.to_lowercase();
        rows.retain(|(value, _)| matches_search(value, &needle));
    }

    if let Some(field) = params.sort.as_deref() {
        if let Some((Value::Object(first), _)) = rows.first() {
            if !first.contains_key(field) {
                return Err(AppError::validation_field("sort", &format!("unknown field '{}'", field)));
            }
        }
        let direction = params.order.unwrap_or_default();
        rows.sort_by(|(a, _), (b, _)| {
            let ordering = compare_values(
                a.get(field).unwrap_or(&Value::Null),
                b.get(field).unwrap_or(&Value::Null),
            );
            match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });
    }

    let total = rows.len();
    let total_pages = total.div_ceil(per_page).max(1);
    // Una página más allá de la última devuelve una lista vacía
    let offset = (page - 1).saturating_mul(per_page);
    let items = rows
        .into_iter()
        .skip(offset)
        .take(per_page)
        .map(|(_, row)| row)
        .collect();

    Ok(Page {
        items,
        total,
        page,
        per_page,
        total_pages,
        pages: page_numbers(page, total_pages),
    })
}
