// src/common/sorting.rs

use rust_decimal::Decimal;
use serde::Deserialize;
use std::cmp::Ordering;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Valor de uma célula da tabela, do ponto de vista da ordenação.
#[derive(Debug, Clone, PartialEq)]
pub enum SortCell<'a> {
    Number(Decimal),
    Text(&'a str),
    Empty,
}

/// Linhas que podem ser ordenadas por nome de coluna.
pub trait SortableRow {
    const SORTABLE_COLUMNS: &'static [&'static str];

    fn sort_cell(&self, column: &str) -> SortCell<'_>;
}

// Ordem entre tipos: números < textos < vazios, independente da direção.
fn kind_rank(cell: &SortCell<'_>) -> u8 {
    match cell {
        SortCell::Number(_) => 0,
        SortCell::Text(_) => 1,
        SortCell::Empty => 2,
    }
}

pub fn compare_cells(a: &SortCell<'_>, b: &SortCell<'_>, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (SortCell::Number(x), SortCell::Number(y)) => x.cmp(y),
        (SortCell::Text(x), SortCell::Text(y)) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        _ => return kind_rank(a).cmp(&kind_rank(b)),
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Ordenação estável: empates mantêm a ordem original.
pub fn sort_rows<T: SortableRow>(rows: &mut [T], column: &str, direction: SortDirection) {
    rows.sort_by(|a, b| compare_cells(&a.sort_cell(column), &b.sort_cell(column), direction));
}

pub fn is_sortable<T: SortableRow>(column: &str) -> bool {
    T::SORTABLE_COLUMNS.contains(&column)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(Option<&'static str>, Option<i64>);

    impl SortableRow for Row {
        const SORTABLE_COLUMNS: &'static [&'static str] = &["value"];

        fn sort_cell(&self, _column: &str) -> SortCell<'_> {
            match (self.0, self.1) {
                (Some(text), _) => SortCell::Text(text),
                (None, Some(n)) => SortCell::Number(Decimal::from(n)),
                (None, None) => SortCell::Empty,
            }
        }
    }

    fn labels(rows: &[Row]) -> Vec<String> {
        rows.iter()
            .map(|r| match (r.0, r.1) {
                (Some(t), _) => t.to_string(),
                (None, Some(n)) => n.to_string(),
                (None, None) => "-".to_string(),
            })
            .collect()
    }

    #[test]
    fn numbers_sort_numerically_not_lexically() {
        let mut rows = vec![Row(None, Some(10)), Row(None, Some(9)), Row(None, Some(100))];
        sort_rows(&mut rows, "value", SortDirection::Asc);
        assert_eq!(labels(&rows), ["9", "10", "100"]);
    }

    #[test]
    fn mixed_column_puts_text_after_numbers() {
        let mut rows = vec![
            Row(Some("beta"), None),
            Row(None, Some(3)),
            Row(Some("Alpha"), None),
            Row(None, None),
            Row(None, Some(1)),
        ];
        sort_rows(&mut rows, "value", SortDirection::Asc);
        assert_eq!(labels(&rows), ["1", "3", "Alpha", "beta", "-"]);
    }

    #[test]
    fn descending_keeps_text_after_numbers() {
        let mut rows = vec![
            Row(Some("alpha"), None),
            Row(None, Some(1)),
            Row(Some("beta"), None),
            Row(None, Some(3)),
        ];
        sort_rows(&mut rows, "value", SortDirection::Desc);
        assert_eq!(labels(&rows), ["3", "1", "beta", "alpha"]);
    }

    #[test]
    fn unknown_column_is_not_sortable() {
        assert!(is_sortable::<Row>("value"));
        assert!(!is_sortable::<Row>("other"));
    }
}
