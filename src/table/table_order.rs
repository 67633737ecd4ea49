use serde_json::Value;
use std::cmp::Ordering;

use super::types::{Row, SortConfig, SortDirection};

pub struct TableOrder;

impl TableOrder {
    /// Stable single-key sort. Ties keep their incoming order in both directions.
    pub fn sort(rows: &mut [&Row], config: &SortConfig) {
        let key = config.key.as_str();
        match config.direction {
            SortDirection::Asc => rows.sort_by(|a, b| Self::compare(Self::cell(a, key), Self::cell(b, key))),
            SortDirection::Desc => rows.sort_by(|a, b| Self::compare(Self::cell(b, key), Self::cell(a, key))),
        }
    }

    fn cell<'a>(row: &'a Row, key: &str) -> &'a Value {
        row.get(key).unwrap_or(&Value::Null)
    }

    /// Native ordering of JSON cells: null < bool < number < string < other.
    /// Values of the same kind compare by their natural order.
    pub fn compare(a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => {
                let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Null, Value::Null) => Ordering::Equal,
            _ => match Self::rank(a).cmp(&Self::rank(b)) {
                Ordering::Equal => a.to_string().cmp(&b.to_string()),
                other => other,
            },
        }
    }

    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sorted(rows: &[Row], key: &str, direction: SortDirection) -> Vec<i64> {
        let mut refs: Vec<&Row> = rows.iter().collect();
        TableOrder::sort(&mut refs, &SortConfig { key: key.into(), direction });
        refs.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn numbers_sort_numerically() {
        let rows = vec![json!({"id": 1, "n": 10}), json!({"id": 2, "n": 9}), json!({"id": 3, "n": 100})];
        assert_eq!(sorted(&rows, "n", SortDirection::Asc), vec![2, 1, 3]);
        assert_eq!(sorted(&rows, "n", SortDirection::Desc), vec![3, 1, 2]);
    }

    #[test]
    fn ties_are_stable_in_both_directions() {
        let rows = vec![
            json!({"id": 1, "f": "GI"}),
            json!({"id": 2, "f": "GC"}),
            json!({"id": 3, "f": "GI"}),
            json!({"id": 4, "f": "GC"}),
        ];
        assert_eq!(sorted(&rows, "f", SortDirection::Asc), vec![2, 4, 1, 3]);
        assert_eq!(sorted(&rows, "f", SortDirection::Desc), vec![1, 3, 2, 4]);
    }

    #[test]
    fn missing_values_sort_first() {
        let rows = vec![json!({"id": 1, "d": "2024-06-01"}), json!({"id": 2}), json!({"id": 3, "d": "2024-05-01"})];
        assert_eq!(sorted(&rows, "d", SortDirection::Asc), vec![2, 3, 1]);
    }
}
