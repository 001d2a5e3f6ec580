//! Identifier quoting for the Firebird dialect.
//!
//! Unquoted identifiers are folded to upper case by Firebird, while the local
//! side stores them in lower case. A lower case identifier can therefore be
//! sent bare and will match the remote upper case name. Anything else has to
//! be quoted to keep its case and stay syntactically valid.

use std::borrow::Cow;

/// Firebird reserved words, sorted for binary search.
const RESERVED_KEYWORDS: &[&str] = &[
    "add", "admin", "all", "alter", "and", "any", "as", "at", "avg", "begin", "between",
    "bigint", "bit_length", "blob", "boolean", "both", "by", "case", "cast", "char",
    "char_length", "character", "character_length", "check", "close", "collate", "column",
    "commit", "connect", "constraint", "corr", "count", "covar_pop", "covar_samp", "create",
    "cross", "current", "current_connection", "current_date", "current_role", "current_time",
    "current_timestamp", "current_transaction", "current_user", "cursor", "date", "day", "dec",
    "decimal", "declare", "default", "delete", "deleting", "deterministic", "disconnect",
    "distinct", "double", "drop", "else", "end", "escape", "execute", "exists", "external",
    "extract", "false", "fetch", "filter", "float", "for", "foreign", "from", "full",
    "function", "gdscode", "global", "grant", "group", "having", "hour", "in", "index", "inner",
    "insensitive", "insert", "inserting", "int", "integer", "into", "is", "join", "leading",
    "left", "like", "long", "lower", "max", "merge", "min", "minute", "month", "national",
    "natural", "nchar", "no", "not", "null", "numeric", "octet_length", "of", "offset", "on",
    "only", "open", "or", "order", "outer", "over", "parameter", "plan", "position",
    "post_event", "precision", "primary", "procedure", "real", "record_version", "recreate",
    "recursive", "references", "regr_avgx", "regr_avgy", "regr_count", "regr_intercept",
    "regr_r2", "regr_slope", "regr_sxx", "regr_sxy", "regr_syy", "release", "return",
    "returning_values", "returns", "revoke", "right", "rollback", "row", "row_count", "rows",
    "savepoint", "scroll", "second", "select", "sensitive", "set", "similar", "smallint",
    "some", "sqlcode", "sqlstate", "start", "stddev_pop", "stddev_samp", "sum", "table", "then",
    "time", "timestamp", "to", "trailing", "trigger", "trim", "true", "union", "unique",
    "unknown", "update", "updating", "upper", "user", "using", "value", "values", "var_pop",
    "var_samp", "varchar", "variable", "varying", "view", "when", "where", "while", "with",
    "year",
];

fn is_reserved_keyword(ident: &str) -> bool {
    RESERVED_KEYWORDS.binary_search(&ident).is_ok()
}

/// Quote `ident` for use in Firebird SQL if it needs it.
///
/// An identifier is left bare when it starts with a lower case letter or an
/// underscore, contains only lower case letters, digits and underscores, and
/// is not a reserved word. With `force` set it is always quoted. Embedded
/// double quotes are doubled.
pub fn quote_identifier(ident: &str, force: bool) -> Cow<'_, str> {
    let mut chars = ident.chars();
    let safe_start = matches!(chars.next(), Some('a'..='z' | '_'));
    let safe = !force
        && safe_start
        && chars.all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        && !is_reserved_keyword(ident);

    if safe {
        return Cow::Borrowed(ident);
    }

    let mut quoted = String::with_capacity(ident.len() + 2);
    quoted.push('"');
    for c in ident.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');

    Cow::Owned(quoted)
}
