/// Domain-aware logging macros.
///
/// Each macro injects a `domain` field so callers never spell the string
/// literal. Domains used by this crate: `check`, `conf`, `report`.
///
/// ```ignore
/// sap_info!(report, status = %status, issues = n, "validation finished");
/// ```

#[doc(hidden)]
macro_rules! sap_log {
    ($level:ident, $domain:ident, $($field:tt)*) => {
        tracing::$level!(domain = stringify!($domain), $($field)*)
    };
}

macro_rules! sap_warn {
    ($domain:ident, $($rest:tt)*) => {
        sap_log!(warn, $domain, $($rest)*)
    };
}

macro_rules! sap_info {
    ($domain:ident, $($rest:tt)*) => {
        sap_log!(info, $domain, $($rest)*)
    };
}

macro_rules! sap_debug {
    ($domain:ident, $($rest:tt)*) => {
        sap_log!(debug, $domain, $($rest)*)
    };
}
