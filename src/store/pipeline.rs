use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::{Map, Value};

use super::Order;

/// A read-only pipeline over one collection: an ordered list of stages
/// applied to the collection's documents. This covers exactly the
/// shapes the handlers need (left join on a foreign key, field
/// projection with newest-element extraction, single-field sort).
#[derive(Debug, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

#[derive(Debug)]
pub enum Stage {
    /// Left join: for each document, collect the documents of `from`
    /// whose `foreign_field` equals this document's `local_field`, and
    /// attach them as an array under `target`. Documents with no match
    /// get an empty array, never an error.
    Lookup {
        from: String,
        local_field: String,
        foreign_field: String,
        target: String,
    },
    Project(Projection),
    Sort { field: String, order: Order },
}

/// Keeps a fixed set of fields and optionally computes extra fields by
/// picking the newest element out of a joined array.
#[derive(Debug, Default)]
pub struct Projection {
    keep: Vec<String>,
    newest: Vec<NewestPick>,
}

#[derive(Debug)]
struct NewestPick {
    array: String,
    order_by: String,
    value: String,
    target: String,
}

impl Projection {
    pub fn keep<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keep: fields.into_iter().map(Into::into).collect(),
            newest: Vec::new(),
        }
    }

    /// Projects `target` as the `value` field of whichever element of
    /// `array` has the greatest `order_by` value. An empty or missing
    /// array leaves `target` absent.
    pub fn newest_of(
        mut self,
        array: impl Into<String>,
        order_by: impl Into<String>,
        value: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.newest.push(NewestPick {
            array: array.into(),
            order_by: order_by.into(),
            value: value.into(),
            target: target.into(),
        });
        self
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(
        mut self,
        from: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.stages.push(Stage::Lookup {
            from: from.into(),
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            target: target.into(),
        });
        self
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.stages.push(Stage::Project(projection));
        self
    }

    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.stages.push(Stage::Sort { field: field.into(), order: Order::Desc });
        self
    }

    pub(crate) fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

pub(crate) fn apply_lookup(
    docs: &mut [Value],
    joined: &[Value],
    local_field: &str,
    foreign_field: &str,
    target: &str,
) {
    let mut by_key: HashMap<&str, Vec<&Value>> = HashMap::new();
    for doc in joined {
        if let Some(key) = doc.get(foreign_field).and_then(Value::as_str) {
            by_key.entry(key).or_default().push(doc);
        }
    }

    for doc in docs.iter_mut() {
        let matches = doc
            .get(local_field)
            .and_then(Value::as_str)
            .and_then(|key| by_key.get(key))
            .map(|hits| hits.iter().map(|v| (*v).clone()).collect())
            .unwrap_or_default();

        if let Value::Object(map) = doc {
            map.insert(target.to_string(), Value::Array(matches));
        }
    }
}

pub(crate) fn apply_project(docs: &mut Vec<Value>, projection: &Projection) {
    for doc in docs.iter_mut() {
        let Value::Object(source) = doc else { continue };

        let mut projected = Map::new();
        for field in &projection.keep {
            if let Some(value) = source.get(field) {
                projected.insert(field.clone(), value.clone());
            }
        }

        for pick in &projection.newest {
            let newest = source
                .get(&pick.array)
                .and_then(Value::as_array)
                .and_then(|items| {
                    items
                        .iter()
                        .max_by(|a, b| compare_field(a, b, &pick.order_by))
                });

            if let Some(value) = newest.and_then(|item| item.get(&pick.value)) {
                if !value.is_null() {
                    projected.insert(pick.target.clone(), value.clone());
                }
            }
        }

        *doc = Value::Object(projected);
    }
}

pub(crate) fn apply_sort(docs: &mut [Value], field: &str, order: Order) {
    docs.sort_by(|a, b| {
        let ordering = compare_field(a, b, field);
        match order {
            Order::Asc => ordering,
            Order::Desc => ordering.reverse(),
        }
    });
}

// Timestamps are RFC 3339 strings, so string comparison orders them
// chronologically. Non-string values fall back to their JSON text.
fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    let left = a.get(field);
    let right = b.get(field);

    match (left.and_then(Value::as_str), right.and_then(Value::as_str)) {
        (Some(l), Some(r)) => l.cmp(r),
        _ => {
            let l = left.map(Value::to_string).unwrap_or_default();
            let r = right.map(Value::to_string).unwrap_or_default();
            l.cmp(&r)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lookup_attaches_matches_and_empty_arrays() {
        let mut docs = vec![
            json!({"id": "a", "name": "first"}),
            json!({"id": "b", "name": "second"}),
        ];
        let joined = vec![
            json!({"parent": "a", "note": "one"}),
            json!({"parent": "a", "note": "two"}),
            json!({"parent": "missing", "note": "orphan"}),
        ];

        apply_lookup(&mut docs, &joined, "id", "parent", "notes");

        assert_eq!(docs[0]["notes"].as_array().unwrap().len(), 2);
        assert_eq!(docs[1]["notes"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn project_picks_newest_by_order_field() {
        let mut docs = vec![json!({
            "id": "a",
            "name": "first",
            "extra": "dropped",
            "replies": [
                {"text": "old", "created_at": "2025-01-01T00:00:00Z"},
                {"text": "new", "created_at": "2025-06-01T00:00:00Z"},
            ],
        })];

        let projection = Projection::keep(["id", "name"])
            .newest_of("replies", "created_at", "text", "latest_reply");
        apply_project(&mut docs, &projection);

        assert_eq!(docs[0]["latest_reply"], json!("new"));
        assert_eq!(docs[0]["name"], json!("first"));
        assert!(docs[0].get("extra").is_none());
        assert!(docs[0].get("replies").is_none());
    }

    #[test]
    fn project_leaves_target_absent_without_matches() {
        let mut docs = vec![json!({"id": "a", "replies": []})];

        let projection =
            Projection::keep(["id"]).newest_of("replies", "created_at", "text", "latest_reply");
        apply_project(&mut docs, &projection);

        assert!(docs[0].get("latest_reply").is_none());
    }

    #[test]
    fn sort_desc_orders_newest_first() {
        let mut docs = vec![
            json!({"created_at": "2025-01-01T00:00:00Z"}),
            json!({"created_at": "2025-06-01T00:00:00Z"}),
        ];

        apply_sort(&mut docs, "created_at", Order::Desc);

        assert_eq!(docs[0]["created_at"], json!("2025-06-01T00:00:00Z"));
    }
}
