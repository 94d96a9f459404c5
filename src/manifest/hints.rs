pub(crate) const YAML_HINTS: [(&str, &str); 5] = [
    (
        "did not find expected '-'",
        "Start list items with '-' and ensure proper indentation.",
    ),
    (
        "expected ':'",
        "Ensure each key is followed by ':' separating key and value.",
    ),
    (
        "mapping values are not allowed",
        "Check for a stray ':' or quote glob patterns such as \"*.go\".",
    ),
    (
        "found character that cannot start any token",
        "Quote patterns starting with '*', '[' or '{'; YAML reserves those characters.",
    ),
    (
        "unknown escape character",
        "Use single quotes for patterns containing '\\' escapes.",
    ),
];

pub(crate) const DATA_HINTS: [(&str, &str); 4] = [
    (
        "unknown variant",
        "Module `kind` must be `go_binary` or `js_bundle`.",
    ),
    (
        "missing field `kind`",
        "Every module needs a `kind` key.",
    ),
    (
        "unknown field",
        "Module properties are camelCase, e.g. `testPkg`, `srcsExclude`, `vendorFirst`.",
    ),
    (
        "modgraph_version",
        "Declare the format version at the top, e.g. `modgraph_version: \"1.0.0\"`.",
    ),
];
