//! Translation of [`SearchRequest`]s into the OpenSearch/Elasticsearch query DSL.

use serde_json::{json, Map, Value};
use time::format_description::well_known::Rfc3339;

use crate::domain::models::{FieldCombinator, SearchFilter, SearchRequest};

/// A filter key and the index field its value is matched against.
pub struct TextField {
    pub index_field: &'static str,
    pub value: fn(&SearchFilter) -> Option<&str>,
}

/// Text filters in evaluation order. With [`FieldCombinator::AnyField`] the value of
/// the last populated entry becomes the shared full-text query.
pub const TEXT_FIELDS: &[TextField] = &[
    TextField {
        index_field: "name",
        value: name,
    },
    TextField {
        index_field: "description",
        value: description,
    },
    TextField {
        index_field: "address",
        value: address,
    },
    TextField {
        index_field: "businessType",
        value: business_type,
    },
    TextField {
        index_field: "status",
        value: status,
    },
];

/// Index field the `createdAfter`/`createdBefore` bounds apply to.
pub const CREATED_FIELD: &str = "createAt";

fn name(f: &SearchFilter) -> Option<&str> {
    f.name.as_deref()
}

fn description(f: &SearchFilter) -> Option<&str> {
    f.description.as_deref()
}

fn address(f: &SearchFilter) -> Option<&str> {
    f.address.as_deref()
}

fn business_type(f: &SearchFilter) -> Option<&str> {
    f.business_type.as_deref()
}

fn status(f: &SearchFilter) -> Option<&str> {
    f.status.as_deref()
}

/// `(index field, value)` for every text filter whose trimmed value is non-empty.
pub fn populated_text_fields(filter: &SearchFilter) -> Vec<(&'static str, &str)> {
    TEXT_FIELDS
        .iter()
        .filter_map(|field| {
            let value = (field.value)(filter)?.trim();
            (!value.is_empty()).then_some((field.index_field, value))
        })
        .collect()
}

/// One `match` clause per populated text field, plus a `range` clause for date bounds.
pub fn filter_clauses(filter: &SearchFilter) -> Vec<Value> {
    let mut clauses: Vec<Value> = populated_text_fields(filter)
        .into_iter()
        .map(|(field, value)| json!({ "match": keyed(field, json!(value)) }))
        .collect();

    if let Some(range) = range_clause(filter) {
        clauses.push(range);
    }

    clauses
}

fn range_clause(filter: &SearchFilter) -> Option<Value> {
    let mut bounds = Map::new();
    if let Some(after) = filter.created_after.and_then(|t| t.format(&Rfc3339).ok()) {
        bounds.insert("gte".to_string(), Value::String(after));
    }
    if let Some(before) = filter.created_before.and_then(|t| t.format(&Rfc3339).ok()) {
        bounds.insert("lte".to_string(), Value::String(before));
    }

    if bounds.is_empty() {
        return None;
    }
    Some(json!({ "range": keyed(CREATED_FIELD, Value::Object(bounds)) }))
}

/// Multi-field clauses appended by full-text search.
pub fn full_text_clauses(filter: &SearchFilter, combinator: FieldCombinator) -> Vec<Value> {
    let populated = populated_text_fields(filter);

    match combinator {
        FieldCombinator::AnyField => {
            let Some((_, query)) = populated.last() else {
                return Vec::new();
            };
            let fields: Vec<&str> = populated.iter().map(|(field, _)| *field).collect();
            vec![json!({ "multi_match": { "query": query, "fields": fields } })]
        }
        FieldCombinator::AllFields => populated
            .into_iter()
            .map(|(field, value)| json!({ "multi_match": { "query": value, "fields": [field] } }))
            .collect(),
    }
}

/// Parses `"<field>:<asc|desc>"` into a sort clause.
///
/// A missing or extra `:` and any direction other than `asc`/`desc` yield `None`.
pub fn parse_sort(spec: &str) -> Option<Value> {
    let mut parts = spec.split(':');
    let (Some(field), Some(order), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };

    let field = field.trim();
    let order = order.trim().to_ascii_lowercase();
    if field.is_empty() || !matches!(order.as_str(), "asc" | "desc") {
        return None;
    }

    Some(keyed(field, json!({ "order": order })))
}

/// Field-filtered query: every populated filter must match. Sort and projection are ignored.
pub fn build_field_query(request: &SearchRequest) -> Value {
    json!({
        "from": request.from(),
        "size": request.size,
        "query": { "bool": { "must": filter_clauses(&request.filters) } }
    })
}

/// Field filters plus a multi-field text clause, with optional sort and `_source` projection.
pub fn build_full_text_query(request: &SearchRequest) -> Value {
    let mut must = filter_clauses(&request.filters);
    must.extend(full_text_clauses(&request.filters, request.combinator));

    let mut body = json!({
        "from": request.from(),
        "size": request.size,
        "query": { "bool": { "must": must } }
    });

    if let Some(sort) = request.sort.as_deref().and_then(parse_sort) {
        body["sort"] = json!([sort]);
    }
    if !request.source.is_empty() {
        body["_source"] = json!(request.source);
    }

    body
}

fn keyed(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}
