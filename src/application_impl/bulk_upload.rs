//! Bulk upload sheets: a header line, then one record per line, comma
//! separated. No quoting or escaping; a comma always ends a field.

use crate::application_port::ApiError;
use crate::domain_model::*;
use std::collections::HashMap;
use std::str::FromStr;

struct Row<'a> {
    line: usize,
    fields: HashMap<&'a str, &'a str>,
}

impl<'a> Row<'a> {
    fn error(&self, reason: impl Into<String>) -> ApiError {
        ApiError::Csv {
            line: self.line,
            reason: reason.into(),
        }
    }

    fn text(&self, column: &str) -> Result<&'a str, ApiError> {
        self.fields
            .get(column)
            .copied()
            .ok_or_else(|| self.error(format!("missing column `{}`", column)))
    }

    fn optional_text(&self, column: &str) -> Option<&'a str> {
        self.fields.get(column).copied().filter(|v| !v.is_empty())
    }

    fn required(&self, column: &str) -> Result<&'a str, ApiError> {
        let value = self.text(column)?;
        if value.is_empty() {
            Err(self.error(format!("`{}` is empty", column)))
        } else {
            Ok(value)
        }
    }

    fn number<T: FromStr>(&self, column: &str) -> Result<T, ApiError> {
        let raw = self.required(column)?;
        raw.parse()
            .map_err(|_| self.error(format!("`{}` is not a number: {:?}", column, raw)))
    }

    fn optional_number(&self, column: &str) -> Result<Option<f64>, ApiError> {
        match self.optional_text(column) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| self.error(format!("`{}` is not a number: {:?}", column, raw))),
        }
    }
}

fn rows(text: &str) -> Result<Vec<Row<'_>>, ApiError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (header_line, header) = lines.next().ok_or(ApiError::Csv {
        line: 1,
        reason: "file is empty".to_string(),
    })?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    if columns.iter().any(|c| c.is_empty()) {
        return Err(ApiError::Csv {
            line: header_line,
            reason: "header has an empty column name".to_string(),
        });
    }

    lines
        .map(|(line, l)| {
            let values: Vec<&str> = l.split(',').map(str::trim).collect();
            if values.len() != columns.len() {
                return Err(ApiError::Csv {
                    line,
                    reason: format!("expected {} fields, found {}", columns.len(), values.len()),
                });
            }
            Ok(Row {
                line,
                fields: columns.iter().copied().zip(values).collect(),
            })
        })
        .collect()
}

fn non_empty<T>(items: Vec<T>) -> Result<Vec<T>, ApiError> {
    if items.is_empty() {
        Err(ApiError::Csv {
            line: 1,
            reason: "no records after the header".to_string(),
        })
    } else {
        Ok(items)
    }
}

/// Columns: name, quantity, unit, category, priority, price, minStockThreshold,
/// and optionally description. Missing unit/category/priority fall back to
/// the same defaults as the single-product form.
pub fn parse_products(text: &str) -> Result<Vec<NewProduct>, ApiError> {
    let products = rows(text)?
        .iter()
        .map(|row| {
            Ok(NewProduct {
                name: row.required("name")?.to_string(),
                quantity: row.number("quantity")?,
                unit: row.optional_text("unit").unwrap_or("kg").to_string(),
                category: row.optional_text("category").unwrap_or("Other").to_string(),
                priority: row.optional_text("priority").unwrap_or("Low").to_string(),
                price: row.number("price")?,
                min_stock_threshold: row.number("minStockThreshold")?,
                description: row.optional_text("description").unwrap_or("").to_string(),
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    non_empty(products)
}

/// Columns: productId, quantityCredited, costForQuantityCredited.
pub fn parse_restocks(text: &str) -> Result<Vec<Restock>, ApiError> {
    let restocks = rows(text)?
        .iter()
        .map(|row| {
            Ok(Restock {
                product_id: ProductId(row.required("productId")?.to_string()),
                quantity_credited: row.number("quantityCredited")?,
                cost_for_quantity_credited: row.number("costForQuantityCredited")?,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    non_empty(restocks)
}

/// Columns: productId, quantityDebited, quantityCredited, reason. Either
/// quantity may be blank, not both.
pub fn parse_adjustments(text: &str) -> Result<Vec<ManualAdjustment>, ApiError> {
    let adjustments = rows(text)?
        .iter()
        .map(|row| {
            let debited = row.optional_number("quantityDebited")?;
            let credited = row.optional_number("quantityCredited")?;
            if debited.is_none() && credited.is_none() {
                return Err(row.error("needs quantityDebited or quantityCredited"));
            }
            Ok(ManualAdjustment::new(
                ProductId(row.required("productId")?.to_string()),
                debited,
                credited,
                row.optional_text("reason").map(str::to_owned),
            ))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    non_empty(adjustments)
}
