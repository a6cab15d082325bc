//! The API endpoints URIs.

/// The route for the spending report of a period.
pub const PERIOD_COST: &str = "/api/analysis/{period}/{group_by}/{page}";
/// The route for the per-item breakdown of one category over a period.
pub const PERIOD_COST_DEEP: &str = "/api/analysis/deep/{category}/{period}/{group_by}/{page}";
/// The route for the pie charts of a category.
pub const PIE: &str = "/api/pie/{category}";

/// Replace each parameter in `endpoint_path` with the next value of `values`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/pie/{category}', '{category}' is the parameter.
///
/// Parameters left over once `values` runs out are kept as is.
pub fn format_endpoint(endpoint_path: &str, values: &[&str]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut values = values.iter();
    let mut rest = endpoint_path;

    while let Some(start) = rest.find('{') {
        let Some(length) = rest[start..].find('}') else {
            break;
        };
        let Some(value) = values.next() else {
            break;
        };

        formatted.push_str(&rest[..start]);
        formatted.push_str(value);
        rest = &rest[start + length + 1..];
    }

    formatted.push_str(rest);
    formatted
}
