//! Observability for structpath
//!
//! Lifecycle and data-loss events are emitted through `tracing` as
//! structured records carrying the event name and its fields. Installing a
//! subscriber is left to the embedding application.
//!
//! # Usage
//!
//! ```ignore
//! use structpath::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::FieldDropped, &[("field", "projects.p1.extra")]);
//! ```

mod events;

pub use events::{Event, Severity};

/// Log a lifecycle event with fields
///
/// Known keys become individual `tracing` fields. Any other keys are
/// rendered into `extra` in deterministic order (alphabetical by key).
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let f = EventFields::collect(fields);
    let extra = (!f.extra.is_empty()).then_some(f.extra.as_str());

    macro_rules! emit {
        ($level:ident) => {
            tracing::$level!(
                event = event.as_str(),
                actual = f.actual,
                count = f.count,
                depth = f.depth,
                dir = f.dir,
                dropped = f.dropped,
                expected = f.expected,
                field = f.field,
                key = f.key,
                max_nested_depth = f.max_nested_depth,
                path = f.path,
                paths = f.paths,
                schema = f.schema,
                skipped = f.skipped,
                table = f.table,
                extra = extra,
            )
        };
    }

    match event.severity() {
        Severity::Debug => emit!(debug),
        Severity::Info => emit!(info),
        Severity::Warn => emit!(warn),
        Severity::Error => emit!(error),
    }
}

/// Event fields split into the recorded keys and a rendered remainder
#[derive(Debug, Default, PartialEq)]
struct EventFields<'a> {
    actual: Option<&'a str>,
    count: Option<&'a str>,
    depth: Option<&'a str>,
    dir: Option<&'a str>,
    dropped: Option<&'a str>,
    expected: Option<&'a str>,
    field: Option<&'a str>,
    key: Option<&'a str>,
    max_nested_depth: Option<&'a str>,
    path: Option<&'a str>,
    paths: Option<&'a str>,
    schema: Option<&'a str>,
    skipped: Option<&'a str>,
    table: Option<&'a str>,
    extra: String,
}

impl<'a> EventFields<'a> {
    fn collect(fields: &[(&'a str, &'a str)]) -> Self {
        let mut collected = Self::default();
        let mut unknown = Vec::new();

        for &(name, value) in fields {
            let slot = match name {
                "actual" => &mut collected.actual,
                "count" => &mut collected.count,
                "depth" => &mut collected.depth,
                "dir" => &mut collected.dir,
                "dropped" => &mut collected.dropped,
                "expected" => &mut collected.expected,
                "field" => &mut collected.field,
                "key" => &mut collected.key,
                "max_nested_depth" => &mut collected.max_nested_depth,
                "path" => &mut collected.path,
                "paths" => &mut collected.paths,
                "schema" => &mut collected.schema,
                "skipped" => &mut collected.skipped,
                "table" => &mut collected.table,
                _ => {
                    unknown.push((name, value));
                    continue;
                }
            };
            *slot = Some(value);
        }

        unknown.sort_by_key(|(k, _)| *k);
        collected.extra = unknown
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        collected
    }
}
